use super::traits::ConfigSection;
use crate::engines::pairwise::AlignmentCosts;
use crate::error::{EvoAlignError, Result};
use crate::scoring::ScoringMatrix;
use serde::{Deserialize, Serialize};

/// Pairwise costs and the set of mutation agents to register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    pub match_score: f64,
    pub mismatch_penalty: f64,
    pub insertion_penalty: f64,
    pub deletion_penalty: f64,
    /// One windowed Smith-Waterman agent per fraction of the width.
    pub window_fractions: Vec<f64>,
    pub gap_shift: bool,
    pub center_star: bool,
    pub center_star_matrix: String,
    pub center_star_fraction: f64,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        let costs = AlignmentCosts::default();
        Self {
            match_score: costs.match_score,
            mismatch_penalty: costs.mismatch_penalty,
            insertion_penalty: costs.insertion_penalty,
            deletion_penalty: costs.deletion_penalty,
            window_fractions: vec![0.5, 0.25, 0.125],
            gap_shift: false,
            center_star: false,
            center_star_matrix: "blosum62".to_string(),
            center_star_fraction: 0.5,
        }
    }
}

impl AlignmentConfig {
    pub fn costs(&self) -> AlignmentCosts {
        AlignmentCosts {
            match_score: self.match_score,
            mismatch_penalty: self.mismatch_penalty,
            insertion_penalty: self.insertion_penalty,
            deletion_penalty: self.deletion_penalty,
        }
    }
}

fn valid_fraction(f: f64) -> bool {
    f > 0.0 && f <= 1.0
}

impl ConfigSection for AlignmentConfig {
    fn section_name() -> &'static str {
        "alignment"
    }

    fn validate(&self) -> Result<()> {
        let costs = [
            self.match_score,
            self.mismatch_penalty,
            self.insertion_penalty,
            self.deletion_penalty,
        ];
        if costs.iter().any(|c| !c.is_finite()) {
            return Err(EvoAlignError::Configuration(
                "Alignment costs must be finite".to_string(),
            ));
        }
        if let Some(f) = self.window_fractions.iter().find(|&&f| !valid_fraction(f)) {
            return Err(EvoAlignError::Configuration(format!(
                "Window fraction {} must be in (0, 1]",
                f
            )));
        }
        if self.center_star {
            if !valid_fraction(self.center_star_fraction) {
                return Err(EvoAlignError::Configuration(format!(
                    "Center-star fraction {} must be in (0, 1]",
                    self.center_star_fraction
                )));
            }
            ScoringMatrix::by_name(&self.center_star_matrix)?;
        }
        if self.window_fractions.is_empty() && !self.gap_shift && !self.center_star {
            return Err(EvoAlignError::Configuration(
                "At least one agent must be enabled".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_pairwise_costs() {
        let config = AlignmentConfig::default();
        assert_eq!(config.costs(), AlignmentCosts::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_fraction_rejected() {
        let config = AlignmentConfig {
            window_fractions: vec![0.5, 1.5],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_no_agents_rejected() {
        let config = AlignmentConfig {
            window_fractions: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
