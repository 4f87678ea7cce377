//! Evolutionary multiple sequence alignment of amino-acid sequences.
//!
//! Candidate alignments are mutated by Smith-Waterman based agents, scored
//! against several substitution-matrix objectives and pruned to their Pareto
//! front. Engines running in separate processes can cooperate through a
//! shared checkpoint file.

pub mod alignment;
pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod scoring;
pub mod types;

pub use alignment::{AlignmentMatrix, Row, Sequence};
pub use engines::generation::{EngineBuilder, EvolutionEngine, FitnessVector, Population};
pub use engines::pairwise::{AlignmentCosts, PairwiseAlignment, SmithWaterman};
pub use error::{EvoAlignError, Result};
pub use scoring::ScoringMatrix;
