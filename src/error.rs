use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvoAlignError {
    #[error("Shape error: {0}")]
    Shape(String),

    #[error("Population is empty")]
    EmptyPopulation,

    #[error("Checkpoint IO error: {0}")]
    CheckpointIo(String),

    #[error("Agent '{agent}' declares arity {arity}, which the engine cannot satisfy")]
    AgentArityMismatch { agent: String, arity: usize },

    #[error("Invalid sequence: {0}")]
    InvalidSequence(String),

    #[error("Window [{start}, {end}) out of bounds for row {row} (len = {len})")]
    WindowOutOfBounds {
        row: usize,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Unknown objective: {0}")]
    UnknownObjective(String),

    #[error("Unknown scoring matrix: {0}")]
    UnknownMatrix(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("FASTA error: {0}")]
    Fasta(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl EvoAlignError {
    /// Errors the evolution loop can skip over without touching the population.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EvoAlignError::Shape(_)
                | EvoAlignError::EmptyPopulation
                | EvoAlignError::CheckpointIo(_)
                | EvoAlignError::WindowOutOfBounds { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, EvoAlignError>;
