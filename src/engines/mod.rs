pub mod generation;
pub mod pairwise;
