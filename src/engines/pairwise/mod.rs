pub mod smith_waterman;
pub mod traceback;

pub use smith_waterman::{AlignmentCosts, DpTable, Operation, PairwiseAlignment, SmithWaterman};
pub use traceback::{Traceback, TracebackStop};
