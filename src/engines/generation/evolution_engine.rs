use crate::alignment::AlignmentMatrix;
use crate::config::EvolutionConfig;
use crate::engines::generation::{
    agents::{Agent, FnAgent},
    checkpoint::{CheckpointOutcome, CheckpointStore},
    fitness::{FitnessFunction, FitnessVector, Objective},
    population::Population,
    progress::{EvolutionSummary, ProgressCallback, StatusReport},
};
use crate::error::{EvoAlignError, Result};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::sync::Arc;

/// Multi-objective evolutionary search over candidate alignments.
///
/// Owns its objectives, agents, population and RNG; independent engines never
/// share state except through a [`CheckpointStore`].
pub struct EvolutionEngine {
    config: EvolutionConfig,
    objectives: Vec<Objective>,
    agents: Vec<Box<dyn Agent>>,
    population: Population,
    checkpoint: Option<Box<dyn CheckpointStore>>,
    rng: StdRng,
}

fn fires(interval: usize, iteration: usize) -> bool {
    interval > 0 && iteration % interval == 0
}

impl EvolutionEngine {
    pub fn new(config: EvolutionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            config,
            objectives: Vec::new(),
            agents: Vec::new(),
            population: Population::new(),
            checkpoint: None,
            rng,
        }
    }

    pub fn with_checkpoint<S: CheckpointStore + 'static>(mut self, store: S) -> Self {
        self.checkpoint = Some(Box::new(store));
        self
    }

    pub fn set_checkpoint(&mut self, store: Option<Box<dyn CheckpointStore>>) {
        self.checkpoint = store;
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn into_population(self) -> Population {
        self.population
    }

    pub fn objective_names(&self) -> impl Iterator<Item = &str> {
        self.objectives.iter().map(|o| o.name())
    }

    pub fn agent_names(&self) -> impl Iterator<Item = &str> {
        self.agents.iter().map(|a| a.name())
    }

    /// Register a criterion to maximize.
    pub fn add_fitness_criteria<F: FitnessFunction + 'static>(
        &mut self,
        function: F,
    ) -> Result<()> {
        self.add_objective(Objective::maximize(Arc::new(function)))
    }

    /// Register an objective. A name that is already registered is replaced
    /// in place. Existing members are re-scored under the new objective set;
    /// if any member fails to score, the error is returned and neither the
    /// objectives nor the population change.
    pub fn add_objective(&mut self, objective: Objective) -> Result<()> {
        let name = objective.name().to_string();
        let mut objectives = self.objectives.clone();
        let replaced = match objectives.iter_mut().find(|o| o.name() == objective.name()) {
            Some(existing) => {
                *existing = objective;
                true
            }
            None => {
                objectives.push(objective);
                false
            }
        };

        let mut rescored = Population::new();
        for (_, alignment) in self.population.iter() {
            let fitness = score_with(&objectives, alignment)?;
            rescored.insert(fitness, alignment.clone());
        }

        if replaced {
            log::warn!("Replacing fitness criterion '{}'", name);
        }
        self.objectives = objectives;
        self.population = rescored;
        Ok(())
    }

    /// Register an agent. Fails if its arity is outside `1..=max_agent_arity`.
    /// A name that is already registered is replaced in place.
    pub fn add_agent<A: Agent + 'static>(&mut self, agent: A) -> Result<()> {
        self.add_boxed_agent(Box::new(agent))
    }

    pub fn add_boxed_agent(&mut self, agent: Box<dyn Agent>) -> Result<()> {
        let arity = agent.arity();
        if arity == 0 || arity > self.config.max_agent_arity {
            return Err(EvoAlignError::AgentArityMismatch {
                agent: agent.name().to_string(),
                arity,
            });
        }
        match self.agents.iter_mut().find(|a| a.name() == agent.name()) {
            Some(existing) => {
                log::warn!("Replacing agent '{}'", agent.name());
                *existing = agent;
            }
            None => self.agents.push(agent),
        }
        Ok(())
    }

    pub fn add_agent_fn<F>(&mut self, name: &str, arity: usize, f: F) -> Result<()>
    where
        F: Fn(Vec<AlignmentMatrix>, &mut dyn RngCore) -> Result<Option<AlignmentMatrix>>
            + Send
            + Sync
            + 'static,
    {
        self.add_agent(FnAgent::new(name, arity, f))
    }

    /// Fitness vector of `alignment` under every objective, in registration order.
    pub fn evaluate(&self, alignment: &AlignmentMatrix) -> Result<FitnessVector> {
        score_with(&self.objectives, alignment)
    }

    /// Score and insert a candidate. On error the population is untouched.
    pub fn add_solution(&mut self, alignment: AlignmentMatrix) -> Result<FitnessVector> {
        alignment.validate()?;
        let fitness = self.evaluate(&alignment)?;
        if self
            .population
            .insert(fitness.clone(), alignment)
            .is_some()
        {
            log::debug!("Replaced member with identical fitness {}", fitness);
        }
        Ok(fitness)
    }

    /// `k` independent copies drawn uniformly with replacement.
    pub fn get_random_solutions(&mut self, k: usize) -> Vec<AlignmentMatrix> {
        self.population.sample(k, &mut self.rng)
    }

    /// Run one named agent. `Ok(None)` when the agent declined.
    pub fn run_agent(&mut self, name: &str) -> Result<Option<FitnessVector>> {
        let index = self
            .agents
            .iter()
            .position(|a| a.name() == name)
            .ok_or_else(|| EvoAlignError::UnknownAgent(name.to_string()))?;
        self.run_agent_at(index)
    }

    fn run_agent_at(&mut self, index: usize) -> Result<Option<FitnessVector>> {
        if self.population.is_empty() {
            return Err(EvoAlignError::EmptyPopulation);
        }
        let agent = &self.agents[index];
        let inputs = self.population.sample(agent.arity(), &mut self.rng);
        let candidate = agent.apply(inputs, &mut self.rng)?;

        match candidate {
            Some(alignment) => self.add_solution(alignment).map(Some),
            None => Ok(None),
        }
    }

    /// Prune dominated members. Returns how many were removed.
    pub fn remove_dominated(&mut self) -> usize {
        let removed = self.population.remove_dominated();
        if removed > 0 {
            log::debug!(
                "Pruned {} dominated solutions, {} remain",
                removed,
                self.population.len()
            );
        }
        removed
    }

    /// Load, merge, prune, store. `None` when no store is attached.
    ///
    /// Load and store failures are recorded in the outcome, never returned.
    pub fn sync_checkpoint(&mut self) -> Option<CheckpointOutcome> {
        let store = self.checkpoint.as_ref()?;
        let mut outcome = CheckpointOutcome::default();

        match store.load() {
            Ok(Some(mut loaded)) => {
                let names: Vec<&str> = self.objectives.iter().map(|o| o.name()).collect();
                let before = loaded.len();
                loaded.retain(|fitness, _| fitness.names().eq(names.iter().copied()));
                if loaded.len() < before {
                    log::warn!(
                        "Ignoring {} checkpoint entries scored on other objectives",
                        before - loaded.len()
                    );
                }
                outcome.loaded = loaded.len();
                outcome.merged = self.population.merge(loaded);
            }
            Ok(None) => {}
            Err(e) => {
                log::warn!("Could not read checkpoint, continuing without it: {}", e);
                outcome.error = Some(e.to_string());
            }
        }

        outcome.pruned = self.population.remove_dominated();

        match store.store(&self.population) {
            Ok(()) => outcome.stored = true,
            Err(e) => {
                log::warn!("Could not write checkpoint: {}", e);
                outcome.error = Some(match outcome.error.take() {
                    Some(prev) => format!("{}; {}", prev, e),
                    None => e.to_string(),
                });
            }
        }

        Some(outcome)
    }

    /// Run `iterations` rounds of agent application, with periodic pruning,
    /// checkpoint synchronization and reporting, then one final prune.
    pub fn evolve<C: ProgressCallback + ?Sized>(
        &mut self,
        iterations: usize,
        callback: &mut C,
    ) -> Result<EvolutionSummary> {
        if self.agents.is_empty() {
            return Err(EvoAlignError::Configuration(
                "No agents registered".to_string(),
            ));
        }
        if self.objectives.is_empty() {
            return Err(EvoAlignError::Configuration(
                "No fitness criteria registered".to_string(),
            ));
        }

        let mut summary = EvolutionSummary {
            iterations,
            ..Default::default()
        };

        for iteration in 1..=iterations {
            let pick = self.rng.gen_range(0..self.agents.len());
            match self.run_agent_at(pick) {
                Ok(Some(fitness)) => {
                    summary.inserted += 1;
                    log::debug!(
                        "Iteration {}: {} produced {}",
                        iteration,
                        self.agents[pick].name(),
                        fitness
                    );
                }
                Ok(None) => summary.declined += 1,
                Err(e) if e.is_recoverable() => {
                    summary.skipped += 1;
                    log::warn!(
                        "Iteration {}: skipped {}: {}",
                        iteration,
                        self.agents[pick].name(),
                        e
                    );
                }
                Err(e) => return Err(e),
            }

            if fires(self.config.dominance_interval, iteration) {
                self.remove_dominated();
            }

            if fires(self.config.checkpoint_interval, iteration) {
                if let Some(outcome) = self.sync_checkpoint() {
                    summary.checkpoints += 1;
                    callback.on_checkpoint(iteration, &outcome);
                }
            }

            if fires(self.config.report_interval, iteration) {
                let report = self.status_report(iteration, callback.wants_snapshot());
                callback.on_report(&report);
            }
        }

        self.remove_dominated();

        summary.final_population = self.population.len();
        summary.best = self
            .population
            .best_by_ranking::<&str>(&[])?
            .map(|(fitness, _)| fitness.clone());
        callback.on_complete(&summary);
        Ok(summary)
    }

    pub fn status_report(&self, iteration: usize, snapshot: bool) -> StatusReport {
        StatusReport {
            iteration,
            population_size: self.population.len(),
            front: snapshot.then(|| self.population.entries()),
        }
    }

    /// See [`Population::best_by_ranking`].
    pub fn best_by_ranking<S: AsRef<str>>(
        &self,
        ranking: &[S],
    ) -> Result<Option<(&FitnessVector, &AlignmentMatrix)>> {
        self.population.best_by_ranking(ranking)
    }
}

fn score_with(objectives: &[Objective], alignment: &AlignmentMatrix) -> Result<FitnessVector> {
    let scores = objectives
        .iter()
        .map(|o| Ok((o.name().to_string(), o.evaluate(alignment)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(FitnessVector::new(scores))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::fitness::{FnFitness, MatchCount};
    use crate::engines::generation::progress::NoopProgress;

    fn config() -> EvolutionConfig {
        EvolutionConfig {
            seed: Some(17),
            ..Default::default()
        }
    }

    fn width_fitness() -> FnFitness<impl Fn(&AlignmentMatrix) -> Result<f64> + Send + Sync> {
        FnFitness::new("narrow", |a: &AlignmentMatrix| Ok(-(a.width() as f64)))
    }

    #[test]
    fn test_arity_validated_at_registration() {
        let mut engine = EvolutionEngine::new(config());
        let err = engine
            .add_agent_fn("none", 0, |_, _| Ok(None))
            .unwrap_err();
        assert!(matches!(err, EvoAlignError::AgentArityMismatch { arity: 0, .. }));
        assert!(engine.add_agent_fn("huge", 9, |_, _| Ok(None)).is_err());
        assert!(engine.add_agent_fn("pair", 2, |_, _| Ok(None)).is_ok());
        assert_eq!(engine.agent_names().collect::<Vec<_>>(), vec!["pair"]);
    }

    #[test]
    fn test_reregistration_replaces_in_place() {
        let mut engine = EvolutionEngine::new(config());
        engine.add_fitness_criteria(MatchCount).unwrap();
        engine.add_fitness_criteria(width_fitness()).unwrap();
        engine.add_fitness_criteria(MatchCount).unwrap();
        assert_eq!(
            engine.objective_names().collect::<Vec<_>>(),
            vec!["match_count", "narrow"]
        );
    }

    #[test]
    fn test_get_random_solutions_edge_cases() {
        let mut engine = EvolutionEngine::new(config());
        assert!(engine.get_random_solutions(3).is_empty());
        engine.add_fitness_criteria(MatchCount).unwrap();
        engine
            .add_solution(AlignmentMatrix::from_strs(&["AC", "AC"]).unwrap())
            .unwrap();
        assert!(engine.get_random_solutions(0).is_empty());
        assert_eq!(engine.get_random_solutions(2).len(), 2);
    }

    #[test]
    fn test_failed_fitness_leaves_population_untouched() {
        let mut engine = EvolutionEngine::new(config());
        engine.add_fitness_criteria(FnFitness::new("fails_on_wide", |a: &AlignmentMatrix| {
            if a.width() > 2 {
                Err(EvoAlignError::Shape("too wide".to_string()))
            } else {
                Ok(1.0)
            }
        }))
        .unwrap();
        engine
            .add_solution(AlignmentMatrix::from_strs(&["AC"]).unwrap())
            .unwrap();
        let before = engine.population().clone();
        assert!(engine
            .add_solution(AlignmentMatrix::from_strs(&["ACD"]).unwrap())
            .is_err());
        assert_eq!(engine.population(), &before);
    }

    #[test]
    fn test_run_agent_on_empty_population() {
        let mut engine = EvolutionEngine::new(config());
        engine.add_fitness_criteria(MatchCount).unwrap();
        engine
            .add_agent_fn("copy", 1, |mut v, _| Ok(v.pop()))
            .unwrap();
        assert!(matches!(
            engine.run_agent("copy"),
            Err(EvoAlignError::EmptyPopulation)
        ));
        assert!(matches!(
            engine.run_agent("missing"),
            Err(EvoAlignError::UnknownAgent(_))
        ));
    }

    #[test]
    fn test_evolve_requires_registrations() {
        let mut engine = EvolutionEngine::new(config());
        assert!(engine.evolve(1, &mut NoopProgress).is_err());
        engine
            .add_agent_fn("copy", 1, |mut v, _| Ok(v.pop()))
            .unwrap();
        assert!(engine.evolve(1, &mut NoopProgress).is_err());
    }

    #[test]
    fn test_evolve_skips_iterations_on_empty_population() {
        let mut engine = EvolutionEngine::new(config());
        engine.add_fitness_criteria(MatchCount).unwrap();
        engine
            .add_agent_fn("copy", 1, |mut v, _| Ok(v.pop()))
            .unwrap();
        let summary = engine.evolve(5, &mut NoopProgress).unwrap();
        assert_eq!(summary.skipped, 5);
        assert_eq!(summary.final_population, 0);
        assert!(summary.best.is_none());
    }

    #[test]
    fn test_adding_objective_rescores_members() {
        let mut engine = EvolutionEngine::new(config());
        engine.add_fitness_criteria(MatchCount).unwrap();
        engine
            .add_solution(AlignmentMatrix::from_strs(&["ACD", "ACD"]).unwrap())
            .unwrap();
        engine.add_fitness_criteria(width_fitness()).unwrap();

        let keys: Vec<_> = engine.population().keys().cloned().collect();
        assert_eq!(
            keys,
            vec![FitnessVector::new(vec![
                ("match_count".into(), 3.0),
                ("narrow".into(), -3.0)
            ])]
        );
    }

    #[test]
    fn test_failing_new_objective_changes_nothing() {
        let mut engine = EvolutionEngine::new(config());
        engine.add_fitness_criteria(MatchCount).unwrap();
        engine
            .add_solution(AlignmentMatrix::from_strs(&["ACD", "ACD"]).unwrap())
            .unwrap();
        let before = engine.population().clone();

        let err = engine
            .add_fitness_criteria(FnFitness::new("broken", |_: &AlignmentMatrix| {
                Err(EvoAlignError::Shape("cannot score".to_string()))
            }))
            .unwrap_err();
        assert!(matches!(err, EvoAlignError::Shape(_)));
        assert_eq!(engine.population(), &before);
        assert_eq!(engine.objective_names().collect::<Vec<_>>(), vec!["match_count"]);
    }

    #[test]
    fn test_interval_firing() {
        assert!(!fires(0, 10));
        assert!(fires(5, 10));
        assert!(!fires(5, 11));
        assert!(fires(1, 1));
    }
}
