use super::traits::ConfigSection;
use crate::error::{EvoAlignError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointConfig {
    pub enabled: bool,
    /// Shared JSON file. Every engine pointed at the same path cooperates.
    pub path: PathBuf,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from("solutions.json"),
        }
    }
}

impl ConfigSection for CheckpointConfig {
    fn section_name() -> &'static str {
        "checkpoint"
    }

    fn validate(&self) -> Result<()> {
        if self.enabled && self.path.as_os_str().is_empty() {
            return Err(EvoAlignError::Configuration(
                "Checkpoint path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
