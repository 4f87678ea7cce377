pub mod alignment;
pub mod checkpoint;
pub mod evolution;
pub mod manager;
pub mod scoring;
pub mod traits;

pub use alignment::AlignmentConfig;
pub use checkpoint::CheckpointConfig;
pub use evolution::EvolutionConfig;
pub use manager::{AppConfig, ConfigManager};
pub use scoring::ScoringConfig;
pub use traits::ConfigSection;
