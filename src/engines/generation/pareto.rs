//! Pareto dominance over fitness vectors.
//!
//! Every objective is maximized. Objectives that should be minimized are
//! registered with [`OptimizationDirection::Minimize`], which negates the raw
//! score before it reaches the fitness vector.

use super::fitness::FitnessVector;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Whether a raw objective score should be maximized or minimized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationDirection {
    #[default]
    Maximize,
    Minimize,
}

impl OptimizationDirection {
    /// Map a raw score onto the higher-is-better scale used for dominance.
    pub fn orient(self, score: f64) -> f64 {
        match self {
            OptimizationDirection::Maximize => score,
            OptimizationDirection::Minimize => -score,
        }
    }
}

/// Check if score vector A dominates score vector B
/// A dominates B if A is no worse than B in all objectives and strictly better in at least one
pub fn dominates_scores(a_scores: &[f64], b_scores: &[f64]) -> bool {
    if a_scores.len() != b_scores.len() || a_scores.is_empty() {
        return false;
    }

    let mut at_least_one_better = false;

    for (&a_val, &b_val) in a_scores.iter().zip(b_scores) {
        match a_val.partial_cmp(&b_val) {
            // B is better here (or the scores are incomparable), so A does not dominate B
            Some(Ordering::Less) | None => return false,
            Some(Ordering::Greater) => at_least_one_better = true,
            Some(Ordering::Equal) => {}
        }
    }

    at_least_one_better
}

/// `p` dominates `q`. Vectors over different objective sets never dominate.
pub fn dominates(p: &FitnessVector, q: &FitnessVector) -> bool {
    if !p.same_objectives(q) {
        return false;
    }
    let p_scores: Vec<f64> = p.scores().collect();
    let q_scores: Vec<f64> = q.scores().collect();
    dominates_scores(&p_scores, &q_scores)
}

/// Indices of the vectors not dominated by any other vector in the slice.
pub fn non_dominated_indices(vectors: &[&FitnessVector]) -> Vec<usize> {
    let n = vectors.len();
    let mut dominated = vec![false; n];

    // Compare all pairs
    for i in 0..n {
        if dominated[i] {
            continue;
        }
        for j in 0..n {
            if i == j || dominated[j] {
                continue;
            }
            if dominates(vectors[i], vectors[j]) {
                dominated[j] = true;
            }
        }
    }

    (0..n).filter(|&i| !dominated[i]).collect()
}
