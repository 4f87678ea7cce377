//! Multi-objective evolutionary search over alignments.

pub mod agents;
pub mod builder;
pub mod checkpoint;
pub mod evolution_engine;
pub mod fitness;
pub mod pareto;
pub mod population;
pub mod progress;

pub use agents::{Agent, CenterStarAgent, FnAgent, GapShiftAgent, SmithWatermanAgent};
pub use builder::EngineBuilder;
pub use checkpoint::{CheckpointOutcome, CheckpointStore, FileCheckpoint, MemoryCheckpoint};
pub use evolution_engine::EvolutionEngine;
pub use fitness::{FitnessFunction, FitnessVector, FnFitness, MatchCount, Objective, SumOfPairs};
pub use pareto::{dominates, non_dominated_indices, OptimizationDirection};
pub use population::{Population, PopulationEntry};
pub use progress::{
    ChannelProgressCallback, ConsoleProgressCallback, EvolutionSummary, NoopProgress,
    ProgressCallback, ProgressMessage, StatusReport,
};
