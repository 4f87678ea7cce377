//! Alignment data model: sequences, labelled rows and the padded
//! [`AlignmentMatrix`] that every agent and fitness function works on.

pub mod columns;
pub mod matrix;
pub mod sequence;

pub use columns::{Column, ColumnView, Columns};
pub use matrix::{AlignmentMatrix, PairSplit, Row};
pub use sequence::Sequence;
