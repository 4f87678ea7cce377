//! Smith-Waterman local alignment.
//!
//! The fill step is shared by two traceback variants:
//! - [`SmithWaterman::align_local`] starts at the best-scoring cell and stops
//!   at the first zero cell (classic local alignment).
//! - [`SmithWaterman::align_anchored`] starts at the bottom-right corner and
//!   walks until either sequence is exhausted, prepending whatever is left of
//!   the other as overhang. The evolutionary agents use this one so that no
//!   residue of a realigned window is lost.

use super::traceback::{Traceback, TracebackStop};
use crate::scoring::ScoringMatrix;
use crate::types::{Symbol, GAP};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Per-operation scores. Penalties are added, so they are normally negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentCosts {
    pub match_score: f64,
    pub mismatch_penalty: f64,
    pub insertion_penalty: f64,
    pub deletion_penalty: f64,
}

impl AlignmentCosts {
    /// Two-parameter scheme: `±match_score` for (mis)matches and `-gap_cost`
    /// for either gap.
    pub fn simple(match_score: f64, gap_cost: f64) -> Self {
        Self {
            match_score,
            mismatch_penalty: -match_score,
            insertion_penalty: -gap_cost,
            deletion_penalty: -gap_cost,
        }
    }
}

impl Default for AlignmentCosts {
    fn default() -> Self {
        Self {
            match_score: 2.0,
            mismatch_penalty: -1.0,
            insertion_penalty: -1.0,
            deletion_penalty: -1.0,
        }
    }
}

/// Which candidate produced a DP cell. Declared in ascending tie-break
/// priority: on equal values the later variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    Zero,
    Deletion,
    Insertion,
    Match,
}

#[derive(Debug, Clone, Copy)]
enum Substitution<'m> {
    Costs(AlignmentCosts),
    Matrix {
        matrix: &'m ScoringMatrix,
        gap_cost: f64,
    },
}

/// Score table `S` and operation table `Op`, both `(m+1) × (n+1)`.
#[derive(Debug, Clone)]
pub struct DpTable {
    cols: usize,
    scores: Vec<f64>,
    ops: Vec<Operation>,
}

impl DpTable {
    fn new(rows: usize, cols: usize) -> Self {
        Self {
            cols,
            scores: vec![0.0; rows * cols],
            ops: vec![Operation::Zero; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.scores.len() / self.cols
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn score(&self, i: usize, j: usize) -> f64 {
        self.scores[i * self.cols + j]
    }

    #[inline]
    pub fn op(&self, i: usize, j: usize) -> Operation {
        self.ops[i * self.cols + j]
    }

    /// Highest-scoring cell. Among equal maxima the one closest to the
    /// bottom-right corner wins (last in row-major order).
    pub fn best_cell(&self) -> (usize, usize, f64) {
        let mut best = (0, 0, f64::NEG_INFINITY);
        for (idx, &score) in self.scores.iter().enumerate() {
            if score >= best.2 {
                best = (idx / self.cols, idx % self.cols, score);
            }
        }
        best
    }
}

/// Two equal-length aligned strings plus where they came from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PairwiseAlignment {
    pub a: Vec<Symbol>,
    pub b: Vec<Symbol>,
    pub score: f64,
    /// Half-open window of the unaligned `a` covered by the alignment.
    pub a_window: Range<usize>,
    /// Half-open window of the unaligned `b` covered by the alignment.
    pub b_window: Range<usize>,
}

impl PairwiseAlignment {
    pub fn len(&self) -> usize {
        self.a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    pub fn gap_count(&self) -> usize {
        self.a
            .iter()
            .chain(self.b.iter())
            .filter(|&&s| s == GAP)
            .count()
    }

    pub fn a_str(&self) -> String {
        String::from_utf8_lossy(&self.a).into_owned()
    }

    pub fn b_str(&self) -> String {
        String::from_utf8_lossy(&self.b).into_owned()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SmithWaterman<'m> {
    substitution: Substitution<'m>,
}

impl SmithWaterman<'static> {
    pub fn with_costs(costs: AlignmentCosts) -> Self {
        Self {
            substitution: Substitution::Costs(costs),
        }
    }
}

impl<'m> SmithWaterman<'m> {
    /// Substitutions scored by `matrix`; both gap kinds cost `gap_cost`
    /// (a positive number that is subtracted).
    pub fn with_matrix(matrix: &'m ScoringMatrix, gap_cost: f64) -> Self {
        Self {
            substitution: Substitution::Matrix { matrix, gap_cost },
        }
    }

    #[inline]
    fn pair_score(&self, a: Symbol, b: Symbol) -> f64 {
        match self.substitution {
            Substitution::Costs(c) if a == b => c.match_score,
            Substitution::Costs(c) => c.mismatch_penalty,
            Substitution::Matrix { matrix, .. } => matrix.score(a, b),
        }
    }

    #[inline]
    fn insertion_cost(&self) -> f64 {
        match self.substitution {
            Substitution::Costs(c) => c.insertion_penalty,
            Substitution::Matrix { gap_cost, .. } => -gap_cost,
        }
    }

    #[inline]
    fn deletion_cost(&self) -> f64 {
        match self.substitution {
            Substitution::Costs(c) => c.deletion_penalty,
            Substitution::Matrix { gap_cost, .. } => -gap_cost,
        }
    }

    /// Fill the score and operation tables. Row 0 and column 0 stay at the
    /// zero floor.
    pub fn fill(&self, a: &[Symbol], b: &[Symbol]) -> DpTable {
        let (m, n) = (a.len(), b.len());
        let mut table = DpTable::new(m + 1, n + 1);
        let cols = n + 1;
        let insertion_cost = self.insertion_cost();
        let deletion_cost = self.deletion_cost();

        for i in 1..=m {
            for j in 1..=n {
                let deletion = table.scores[(i - 1) * cols + j] + deletion_cost;
                let insertion = table.scores[i * cols + j - 1] + insertion_cost;
                let matched =
                    table.scores[(i - 1) * cols + j - 1] + self.pair_score(a[i - 1], b[j - 1]);

                // Ascending priority with >=, so ties resolve to the later candidate.
                let mut best = (0.0, Operation::Zero);
                for candidate in [
                    (deletion, Operation::Deletion),
                    (insertion, Operation::Insertion),
                    (matched, Operation::Match),
                ] {
                    if candidate.0 >= best.0 {
                        best = candidate;
                    }
                }
                table.scores[i * cols + j] = best.0;
                table.ops[i * cols + j] = best.1;
            }
        }

        table
    }

    /// Classic local alignment from the best cell back to the first zero.
    pub fn align_local(&self, a: &[Symbol], b: &[Symbol]) -> PairwiseAlignment {
        if a.is_empty() || b.is_empty() {
            return PairwiseAlignment::default();
        }
        let table = self.fill(a, b);
        let (end_i, end_j, score) = table.best_cell();

        let mut trace = Traceback::new(&table, a, b, end_i, end_j, TracebackStop::AtZeroScore);
        let (mut aligned_a, mut aligned_b): (Vec<Symbol>, Vec<Symbol>) = trace.by_ref().unzip();
        let (start_i, start_j) = trace.position();
        aligned_a.reverse();
        aligned_b.reverse();

        PairwiseAlignment {
            a: aligned_a,
            b: aligned_b,
            score,
            a_window: start_i..end_i,
            b_window: start_j..end_j,
        }
    }

    /// Corner-anchored alignment covering all of `a` and `b`.
    ///
    /// Traceback runs from `S[m][n]` while both indices are positive. The
    /// unconsumed prefix of the other sequence is prepended unchanged, with
    /// the shorter prefix left-padded by gaps so both strings keep one length.
    pub fn align_anchored(&self, a: &[Symbol], b: &[Symbol]) -> PairwiseAlignment {
        if a.is_empty() || b.is_empty() {
            return PairwiseAlignment::default();
        }
        let (m, n) = (a.len(), b.len());
        let table = self.fill(a, b);

        let mut trace = Traceback::new(&table, a, b, m, n, TracebackStop::AtEitherEdge);
        let (tail_a, tail_b): (Vec<Symbol>, Vec<Symbol>) = trace.by_ref().unzip();
        let (i, j) = trace.position();

        let overhang = i.max(j);
        let aligned_a = with_overhang(&a[..i], overhang, tail_a);
        let aligned_b = with_overhang(&b[..j], overhang, tail_b);

        PairwiseAlignment {
            a: aligned_a,
            b: aligned_b,
            score: table.score(m, n),
            a_window: 0..m,
            b_window: 0..n,
        }
    }
}

fn with_overhang(prefix: &[Symbol], width: usize, mut reversed_tail: Vec<Symbol>) -> Vec<Symbol> {
    reversed_tail.reverse();
    let mut out = Vec::with_capacity(width + reversed_tail.len());
    out.resize(width - prefix.len(), GAP);
    out.extend_from_slice(prefix);
    out.extend(reversed_tail);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tie_break_prefers_match() {
        // Every candidate at (1,1) is 0 with these costs except the floor,
        // so the match wins the tie.
        let costs = AlignmentCosts {
            match_score: 0.0,
            mismatch_penalty: 0.0,
            insertion_penalty: 0.0,
            deletion_penalty: 0.0,
        };
        let table = SmithWaterman::with_costs(costs).fill(b"A", b"C");
        assert_eq!(table.op(1, 1), Operation::Match);
    }

    #[test]
    fn test_fill_identical_pair() {
        let costs = AlignmentCosts {
            match_score: 1.0,
            mismatch_penalty: -5.0,
            insertion_penalty: -1.0,
            deletion_penalty: -1.0,
        };
        let table = SmithWaterman::with_costs(costs).fill(b"AA", b"AA");
        assert_eq!(table.rows(), 3);
        assert_eq!(table.cols(), 3);
        assert_eq!(table.op(1, 1), Operation::Match);
        assert_eq!(table.op(1, 2), Operation::Match);
        assert_eq!(table.score(2, 2), 2.0);
    }

    #[test]
    fn test_zero_floor_when_everything_negative() {
        let table = SmithWaterman::with_costs(AlignmentCosts::default()).fill(b"A", b"C");
        assert_eq!(table.score(1, 1), 0.0);
        assert_eq!(table.op(1, 1), Operation::Zero);
    }

    #[test]
    fn test_equal_gap_candidates_prefer_insertion() {
        let costs = AlignmentCosts {
            match_score: 3.0,
            mismatch_penalty: -10.0,
            insertion_penalty: -1.0,
            deletion_penalty: -1.0,
        };
        // S[1][1] = 3. At (2,2) with a = "AC", b = "AG": deletion = S[1][2] - 1,
        // insertion = S[2][1] - 1. S[1][2] = max(0, S[0][2]-1, S[1][1]-1, 0-10) = 2 (Insertion),
        // S[2][1] = 2 (Deletion); both candidates at (2,2) are 1, mismatch is -7.
        let table = SmithWaterman::with_costs(costs).fill(b"AC", b"AG");
        assert_eq!(table.score(2, 2), 1.0);
        assert_eq!(table.op(2, 2), Operation::Insertion);
    }

    #[test]
    fn test_best_cell_prefers_bottom_right_maximum() {
        let sw = SmithWaterman::with_costs(AlignmentCosts::simple(1.0, 5.0));
        let table = sw.fill(b"AXA", b"A");
        // Both (1,1) and (3,1) score 1; the lower one wins.
        let (i, j, score) = table.best_cell();
        assert_eq!((i, j, score), (3, 1, 1.0));

        let out = sw.align_local(b"AXA", b"A");
        assert_eq!(out.a_window, 2..3);
        assert_eq!(out.b_window, 0..1);
    }

    #[test]
    fn test_empty_inputs() {
        let sw = SmithWaterman::with_costs(AlignmentCosts::default());
        assert!(sw.align_local(b"", b"ACD").is_empty());
        assert!(sw.align_anchored(b"ACD", b"").is_empty());
    }

    #[test]
    fn test_anchored_overhang_keeps_lengths_equal() {
        let sw = SmithWaterman::with_costs(AlignmentCosts::default());
        let out = sw.align_anchored(b"KLMN", b"AKLMN");
        assert_eq!(out.a_str(), "-KLMN");
        assert_eq!(out.b_str(), "AKLMN");
    }

    #[test]
    fn test_anchored_zero_cell_becomes_gap() {
        let sw = SmithWaterman::with_costs(AlignmentCosts::default());
        let out = sw.align_anchored(b"QA", b"WA");
        assert_eq!(out.a_str(), "-QA");
        assert_eq!(out.b_str(), "W-A");
    }

    #[test]
    fn test_matrix_variant_uses_matrix_scores() {
        let blosum = ScoringMatrix::blosum62();
        let sw = SmithWaterman::with_matrix(&blosum, 4.0);
        let out = sw.align_local(b"WW", b"WW");
        assert_eq!(out.score, 22.0);
        assert_eq!(out.a_str(), "WW");
    }
}
