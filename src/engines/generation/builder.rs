use super::agents::{CenterStarAgent, GapShiftAgent, SmithWatermanAgent};
use super::checkpoint::{CheckpointStore, FileCheckpoint};
use super::evolution_engine::EvolutionEngine;
use super::fitness::{MatchCount, SumOfPairs};
use crate::config::AppConfig;
use crate::error::Result;
use crate::scoring::ScoringMatrix;
use std::sync::Arc;

/// Assembles an [`EvolutionEngine`] with the objectives, agents and
/// checkpoint store described by an [`AppConfig`].
pub struct EngineBuilder {
    config: AppConfig,
    checkpoint: Option<Box<dyn CheckpointStore>>,
}

impl EngineBuilder {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            config: config.clone(),
            checkpoint: None,
        }
    }

    /// Use `store` instead of the configured checkpoint file.
    pub fn with_checkpoint<S: CheckpointStore + 'static>(mut self, store: S) -> Self {
        self.checkpoint = Some(Box::new(store));
        self
    }

    pub fn build(self) -> Result<EvolutionEngine> {
        self.config.validate()?;
        let mut engine = EvolutionEngine::new(self.config.evolution.clone());

        for name in &self.config.scoring.objectives {
            engine.add_fitness_criteria(SumOfPairs::for_matrix(ScoringMatrix::by_name(name)?))?;
        }
        if self.config.scoring.include_match_count {
            engine.add_fitness_criteria(MatchCount)?;
        }

        let alignment = &self.config.alignment;
        let costs = alignment.costs();
        for &fraction in &alignment.window_fractions {
            engine.add_agent(SmithWatermanAgent::new(fraction, costs))?;
        }
        if alignment.center_star {
            let matrix = ScoringMatrix::by_name(&alignment.center_star_matrix)?;
            engine.add_agent(CenterStarAgent::new(
                Arc::new(matrix),
                alignment.center_star_fraction,
                costs,
            ))?;
        }
        if alignment.gap_shift {
            engine.add_agent(GapShiftAgent)?;
        }

        let store = match self.checkpoint {
            Some(store) => Some(store),
            None if self.config.checkpoint.enabled => {
                let file = FileCheckpoint::new(&self.config.checkpoint.path);
                Some(Box::new(file) as Box<dyn CheckpointStore>)
            }
            None => None,
        };
        engine.set_checkpoint(store);

        log::info!(
            "Engine ready: objectives [{}], agents [{}]",
            engine.objective_names().collect::<Vec<_>>().join(", "),
            engine.agent_names().collect::<Vec<_>>().join(", ")
        );
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registrations() {
        let mut config = AppConfig::default();
        config.checkpoint.enabled = false;
        let engine = EngineBuilder::from_config(&config).build().unwrap();
        assert_eq!(
            engine.objective_names().collect::<Vec<_>>(),
            vec!["blosum62_score", "hydropathy_score", "volume_score"]
        );
        assert_eq!(
            engine.agent_names().collect::<Vec<_>>(),
            vec!["smith_waterman_50", "smith_waterman_25", "smith_waterman_12.5"]
        );
    }

    #[test]
    fn test_optional_agents_and_objectives() {
        let mut config = AppConfig::default();
        config.checkpoint.enabled = false;
        config.scoring.objectives = vec!["45".to_string()];
        config.scoring.include_match_count = true;
        config.alignment.window_fractions = vec![1.0];
        config.alignment.center_star = true;
        config.alignment.gap_shift = true;

        let engine = EngineBuilder::from_config(&config).build().unwrap();
        assert_eq!(
            engine.objective_names().collect::<Vec<_>>(),
            vec!["blosum45_score", "match_count"]
        );
        assert_eq!(
            engine.agent_names().collect::<Vec<_>>(),
            vec!["smith_waterman_100", "center_star", "gap_shift"]
        );
    }
}
