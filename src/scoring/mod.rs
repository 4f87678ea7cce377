//! Substitution matrices and the alignment-level scores built on them.

pub mod blosum;
pub mod matrix;
pub mod properties;
pub mod sum_pairs;

pub use matrix::ScoringMatrix;
pub use sum_pairs::{
    match_count, pairwise_comparison_score, pairwise_score_table, star_center, sum_pairs_score,
};
