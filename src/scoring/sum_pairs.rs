use super::matrix::ScoringMatrix;
use crate::alignment::{AlignmentMatrix, Sequence};
use crate::error::{EvoAlignError, Result};
use crate::types::{is_gap, Symbol};

/// Sum-of-pairs score: every unordered row pair in every column, scored
/// with `matrix`. O(width · N²).
pub fn sum_pairs_score(alignment: &AlignmentMatrix, matrix: &ScoringMatrix) -> Result<f64> {
    let view = alignment.column_view()?;
    let mut column: Vec<Symbol> = Vec::with_capacity(alignment.len());
    let mut score = 0.0;

    for col in &view {
        column.clear();
        column.extend(col.symbols());
        for i in 1..column.len() {
            let a = column[i];
            for &b in &column[..i] {
                score += matrix.score(a, b);
            }
        }
    }

    Ok(score)
}

/// Two-row special case of [`sum_pairs_score`].
pub fn pairwise_comparison_score(
    seq_a: &Sequence,
    seq_b: &Sequence,
    matrix: &ScoringMatrix,
) -> Result<f64> {
    if seq_a.len() != seq_b.len() {
        return Err(EvoAlignError::Shape(format!(
            "cannot compare sequences of length {} and {}",
            seq_a.len(),
            seq_b.len()
        )));
    }
    Ok(seq_a
        .as_slice()
        .iter()
        .zip(seq_b.as_slice())
        .map(|(&a, &b)| matrix.score(a, b))
        .sum())
}

/// Symmetric N×N table of pairwise comparison scores (diagonal 0).
pub fn pairwise_score_table(
    alignment: &AlignmentMatrix,
    matrix: &ScoringMatrix,
) -> Result<Vec<Vec<f64>>> {
    alignment.column_view()?;
    let rows = alignment.rows();
    let n = rows.len();
    let mut table = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let score = pairwise_comparison_score(&rows[i].sequence, &rows[j].sequence, matrix)?;
            table[i][j] = score;
            table[j][i] = score;
        }
    }
    Ok(table)
}

/// Index of the row with the largest summed similarity to all other rows.
/// Ties go to the lowest index.
pub fn star_center(alignment: &AlignmentMatrix, matrix: &ScoringMatrix) -> Result<usize> {
    let table = pairwise_score_table(alignment, matrix)?;
    let mut best = 0;
    let mut best_sum = f64::NEG_INFINITY;
    for (i, row) in table.iter().enumerate() {
        let sum: f64 = row.iter().sum();
        if sum > best_sum {
            best = i;
            best_sum = sum;
        }
    }
    Ok(best)
}

/// Number of columns in which every row holds the same residue.
pub fn match_count(alignment: &AlignmentMatrix) -> Result<usize> {
    let view = alignment.column_view()?;
    Ok(view
        .iter()
        .filter(|col| {
            let mut symbols = col.symbols();
            match symbols.next() {
                Some(first) if !is_gap(first) => symbols.all(|s| s == first),
                _ => false,
            }
        })
        .count())
}
