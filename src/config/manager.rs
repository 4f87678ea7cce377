use super::{
    alignment::AlignmentConfig, checkpoint::CheckpointConfig, evolution::EvolutionConfig,
    scoring::ScoringConfig, traits::ConfigSection,
};
use crate::error::{EvoAlignError, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment prefix for overrides, e.g. `EVOALIGN_EVOLUTION__ITERATIONS=500`.
pub const ENV_PREFIX: &str = "EVOALIGN";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub scoring: ScoringConfig,
    pub alignment: AlignmentConfig,
    pub checkpoint: CheckpointConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        fn section<S: ConfigSection>(s: &S) -> Result<()> {
            s.validate().map_err(|e| match e {
                EvoAlignError::Configuration(msg) => {
                    EvoAlignError::Configuration(format!("[{}] {}", S::section_name(), msg))
                }
                other => other,
            })
        }
        section(&self.evolution)?;
        section(&self.scoring)?;
        section(&self.alignment)?;
        section(&self.checkpoint)?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: AppConfig,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Defaults, then the TOML file (if given), then `EVOALIGN_*` variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("scoring.objectives")
                .with_list_parse_key("alignment.window_fractions"),
        );

        let config: AppConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| EvoAlignError::Configuration(format!("Failed to load config: {}", e)))?;
        config.validate()?;
        Ok(Self { config })
    }

    /// Replace the current configuration with the contents of a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| EvoAlignError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = toml::from_str(&contents)
            .map_err(|e| EvoAlignError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        self.config = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_str = toml::to_string_pretty(&self.config)
            .map_err(|e| EvoAlignError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| EvoAlignError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> &AppConfig {
        &self.config
    }

    pub fn into_inner(self) -> AppConfig {
        self.config
    }

    /// Apply `f` to a copy and keep it only if it validates.
    pub fn update<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.clone();
        f(&mut config);
        config.validate()?;
        self.config = config;
        Ok(())
    }
}
