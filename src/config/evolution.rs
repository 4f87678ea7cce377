use super::traits::ConfigSection;
use crate::error::{EvoAlignError, Result};
use serde::{Deserialize, Serialize};

/// Iteration count and the periods of the engine's recurring actions.
///
/// An interval fires after iteration `i` (counting from 1) when
/// `i % interval == 0`. An interval of 0 disables the action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub iterations: usize,
    pub dominance_interval: usize,
    pub report_interval: usize,
    pub checkpoint_interval: usize,
    pub seed: Option<u64>,
    pub max_agent_arity: usize,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            dominance_interval: 100,
            report_interval: 100,
            checkpoint_interval: 1000,
            seed: None,
            max_agent_arity: 8,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<()> {
        if self.max_agent_arity == 0 {
            return Err(EvoAlignError::Configuration(
                "max_agent_arity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
