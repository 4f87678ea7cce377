use super::traits::ConfigSection;
use crate::error::{EvoAlignError, Result};
use crate::scoring::ScoringMatrix;
use serde::{Deserialize, Serialize};

/// Which sum-of-pairs objectives to optimize, in registration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Matrix names accepted by [`ScoringMatrix::by_name`].
    pub objectives: Vec<String>,
    /// Also maximize the number of fully conserved columns.
    pub include_match_count: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            objectives: vec![
                "blosum62".to_string(),
                "hydropathy".to_string(),
                "volume".to_string(),
            ],
            include_match_count: false,
        }
    }
}

impl ConfigSection for ScoringConfig {
    fn section_name() -> &'static str {
        "scoring"
    }

    fn validate(&self) -> Result<()> {
        if self.objectives.is_empty() && !self.include_match_count {
            return Err(EvoAlignError::Configuration(
                "At least one objective is required".to_string(),
            ));
        }
        for name in &self.objectives {
            ScoringMatrix::by_name(name)?;
        }
        Ok(())
    }
}
