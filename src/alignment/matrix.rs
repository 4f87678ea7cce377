use super::columns::ColumnView;
use super::sequence::Sequence;
use crate::error::{EvoAlignError, Result};
use crate::types::{is_gap, is_residue, Symbol};
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One labelled row of an alignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Row {
    pub id: String,
    pub sequence: Sequence,
}

impl Row {
    pub fn new(id: impl Into<String>, sequence: Sequence) -> Self {
        Self {
            id: id.into(),
            sequence,
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// A candidate multiple sequence alignment.
///
/// All rows are right-padded with [`GAP`](crate::types::GAP) to a common width after every
/// mutation. Rows keep their ids and relative order through every operation.
/// Alignments deserialized from outside the crate should be checked with
/// [`AlignmentMatrix::validate`] before use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlignmentMatrix {
    rows: Vec<Row>,
}

/// Two rows lifted out of an alignment together with the rows held aside.
///
/// Produced by [`AlignmentMatrix::pick_random_pair`]; [`PairSplit::reassemble`]
/// puts replacement rows back at the positions the pair came from.
#[derive(Debug, Clone)]
pub struct PairSplit {
    pub first: Row,
    pub second: Row,
    pub rest: Vec<Row>,
    first_index: usize,
    second_index: usize,
}

impl PairSplit {
    pub fn indices(&self) -> (usize, usize) {
        (self.first_index, self.second_index)
    }

    /// Rebuild the full row list in the original order, with `first` and
    /// `second` standing in for the picked pair.
    pub fn reassemble(self, first: Row, second: Row) -> Vec<Row> {
        let total = self.rest.len() + 2;
        let mut rest = self.rest.into_iter();
        let mut first = Some(first);
        let mut second = Some(second);
        let mut rows = Vec::with_capacity(total);
        for i in 0..total {
            let row = if i == self.first_index {
                first.take()
            } else if i == self.second_index {
                second.take()
            } else {
                rest.next()
            };
            rows.extend(row);
        }
        rows
    }
}

impl AlignmentMatrix {
    /// Build an alignment from rows, padding every row to the longest one.
    pub fn new(rows: Vec<Row>) -> Result<Self> {
        if rows.is_empty() {
            return Err(EvoAlignError::Shape(
                "an alignment needs at least one row".to_string(),
            ));
        }
        let mut matrix = Self { rows };
        matrix.repad();
        Ok(matrix)
    }

    /// Convenience constructor from plain strings; ids are `seq1..seqN`.
    pub fn from_strs(sequences: &[&str]) -> Result<Self> {
        let rows = sequences
            .iter()
            .enumerate()
            .map(|(i, s)| Ok(Row::new(format!("seq{}", i + 1), Sequence::parse(s)?)))
            .collect::<Result<Vec<_>>>()?;
        Self::new(rows)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Common row length. Only meaningful when the matrix is rectangular.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Row::len).max().unwrap_or(0)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.id.as_str())
    }

    /// Row `index` with its gaps removed.
    pub fn ungapped(&self, index: usize) -> Option<Sequence> {
        self.rows.get(index).map(|r| r.sequence.ungapped())
    }

    pub fn is_rectangular(&self) -> bool {
        let width = self.width();
        self.rows.iter().all(|r| r.len() == width)
    }

    /// Fails with a shape error unless the matrix has rows, they share one
    /// width, and every symbol is a residue or a gap.
    pub fn validate(&self) -> Result<()> {
        if self.rows.is_empty() {
            return Err(EvoAlignError::Shape("alignment has no rows".to_string()));
        }
        self.ensure_rectangular()?;
        for row in &self.rows {
            if let Some(&bad) = row
                .sequence
                .as_slice()
                .iter()
                .find(|&&s| !is_residue(s) && !is_gap(s))
            {
                return Err(EvoAlignError::Shape(format!(
                    "row '{}' contains invalid symbol {:?}",
                    row.id, bad as char
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn ensure_rectangular(&self) -> Result<()> {
        let width = self.width();
        match self.rows.iter().find(|r| r.len() != width) {
            Some(row) => Err(EvoAlignError::Shape(format!(
                "row '{}' has length {}, expected {}",
                row.id,
                row.len(),
                width
            ))),
            None => Ok(()),
        }
    }

    /// Append gaps to every row shorter than `width`.
    ///
    /// Fails, leaving the matrix untouched, if any row is already longer.
    pub fn pad_to_width(&mut self, width: usize) -> Result<()> {
        if let Some(row) = self.rows.iter().find(|r| r.len() > width) {
            return Err(EvoAlignError::Shape(format!(
                "row '{}' has length {}, which exceeds width {}",
                row.id,
                row.len(),
                width
            )));
        }
        for row in &mut self.rows {
            row.sequence.pad_to(width)?;
        }
        Ok(())
    }

    /// Pad every row to the longest row.
    pub fn repad(&mut self) {
        let width = self.width();
        for row in &mut self.rows {
            row.sequence.extend_gaps_to(width);
        }
    }

    /// Pick two distinct rows uniformly at random.
    ///
    /// The rows are cloned out; `self` is not modified.
    pub fn pick_random_pair<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<PairSplit> {
        if self.rows.len() < 2 {
            return Err(EvoAlignError::Shape(format!(
                "need at least two rows to pick a pair, found {}",
                self.rows.len()
            )));
        }
        let picked = index::sample(rng, self.rows.len(), 2);
        self.split_pair(picked.index(0), picked.index(1))
    }

    /// Lift out rows `first_index` and `second_index` (which must differ).
    pub fn split_pair(&self, first_index: usize, second_index: usize) -> Result<PairSplit> {
        let n = self.rows.len();
        if first_index == second_index || first_index >= n || second_index >= n {
            return Err(EvoAlignError::Shape(format!(
                "invalid row pair ({first_index}, {second_index}) for {n} rows"
            )));
        }
        let rest = self
            .rows
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != first_index && *i != second_index)
            .map(|(_, r)| r.clone())
            .collect();
        Ok(PairSplit {
            first: self.rows[first_index].clone(),
            second: self.rows[second_index].clone(),
            rest,
            first_index,
            second_index,
        })
    }

    /// Replace `[window_start, window_end)` of a row with `replacement`, then
    /// re-pad the whole matrix.
    pub fn splice_window(
        &mut self,
        row_index: usize,
        window_start: usize,
        window_end: usize,
        replacement: &[Symbol],
    ) -> Result<()> {
        let len = match self.rows.get(row_index) {
            Some(row) => row.len(),
            None => {
                return Err(EvoAlignError::Shape(format!(
                    "row {} does not exist ({} rows)",
                    row_index,
                    self.rows.len()
                )))
            }
        };
        if window_start > window_end || window_end > len {
            return Err(EvoAlignError::WindowOutOfBounds {
                row: row_index,
                start: window_start,
                end: window_end,
                len,
            });
        }
        if let Some(&bad) = replacement.iter().find(|&&s| !is_residue(s) && !is_gap(s)) {
            return Err(EvoAlignError::InvalidSequence(format!(
                "replacement contains invalid symbol {:?}",
                bad as char
            )));
        }

        self.rows[row_index]
            .sequence
            .splice(window_start, window_end, replacement);
        self.repad();
        Ok(())
    }

    /// Produce a new alignment from a replacement row set (for example two
    /// realigned rows plus the untouched remainder), padded to a common width.
    ///
    /// The replacement must have as many rows as `self`.
    pub fn recombine(&self, rows: Vec<Row>) -> Result<AlignmentMatrix> {
        if rows.len() != self.rows.len() {
            return Err(EvoAlignError::Shape(format!(
                "recombination produced {} rows, expected {}",
                rows.len(),
                self.rows.len()
            )));
        }
        AlignmentMatrix::new(rows)
    }

    /// Columns of the alignment, for scoring. Fails on a ragged matrix.
    pub fn column_view(&self) -> Result<ColumnView<'_>> {
        self.ensure_rectangular()?;
        Ok(ColumnView::new(&self.rows, self.width()))
    }

    /// Drop every column made only of gaps. Residue order is untouched.
    pub fn compact(&mut self) {
        let width = self.width();
        let keep: Vec<bool> = (0..width)
            .map(|c| {
                self.rows
                    .iter()
                    .any(|r| r.sequence.get(c).is_some_and(|s| !is_gap(s)))
            })
            .collect();
        if keep.iter().all(|&k| k) {
            return;
        }
        for row in &mut self.rows {
            let symbols: Vec<Symbol> = row
                .sequence
                .as_slice()
                .iter()
                .zip(&keep)
                .filter(|(_, &k)| k)
                .map(|(&s, _)| s)
                .collect();
            row.sequence = Sequence::from_symbols(symbols);
        }
        self.repad();
    }

    /// Builder-style [`AlignmentMatrix::compact`].
    pub fn compacted(mut self) -> Self {
        self.compact();
        self
    }

    pub(crate) fn row_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }
}

impl fmt::Display for AlignmentMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "{}\t{}", row.id, row.sequence)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample() -> AlignmentMatrix {
        AlignmentMatrix::from_strs(&["ABCF", "ABDEH", "ABCD", "BD", "AB"]).unwrap()
    }

    #[test]
    fn test_new_pads_to_longest() {
        let m = sample();
        assert_eq!(m.len(), 5);
        assert_eq!(m.width(), 5);
        assert!(m.is_rectangular());
        assert_eq!(m.row(3).unwrap().sequence.to_string(), "BD---");
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(AlignmentMatrix::new(Vec::new()).is_err());
    }

    #[test]
    fn test_pad_to_width() {
        let mut m = sample();
        m.pad_to_width(8).unwrap();
        assert_eq!(m.width(), 8);
        assert!(m.is_rectangular());
        assert_eq!(m.row(1).unwrap().sequence.to_string(), "ABDEH---");

        let before = m.clone();
        assert!(matches!(m.pad_to_width(3), Err(EvoAlignError::Shape(_))));
        assert_eq!(m, before);
    }

    #[test]
    fn test_pick_random_pair_distinct_and_reassemble() {
        let m = sample();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let split = m.pick_random_pair(&mut rng).unwrap();
            let (a, b) = split.indices();
            assert_ne!(a, b);
            assert_eq!(split.rest.len(), 3);
            let first = split.first.clone();
            let second = split.second.clone();
            let rows = split.reassemble(first, second);
            assert_eq!(rows, m.rows());
        }
    }

    #[test]
    fn test_pick_random_pair_needs_two_rows() {
        let m = AlignmentMatrix::from_strs(&["ACD"]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(m.pick_random_pair(&mut rng).is_err());
    }

    #[test]
    fn test_splice_window_longer_replacement_repads() {
        let mut m = AlignmentMatrix::from_strs(&["ACDE", "ACDE"]).unwrap();
        m.splice_window(0, 1, 2, b"-C-").unwrap();
        assert_eq!(m.row(0).unwrap().sequence.to_string(), "A-C-DE");
        assert_eq!(m.row(1).unwrap().sequence.to_string(), "ACDE--");
        assert!(m.is_rectangular());
    }

    #[test]
    fn test_splice_window_shorter_replacement_repads_row() {
        let mut m = AlignmentMatrix::from_strs(&["A--CD", "AC---"]).unwrap();
        m.splice_window(0, 1, 3, b"").unwrap();
        assert_eq!(m.width(), 5);
        assert_eq!(m.row(0).unwrap().sequence.to_string(), "ACD--");
        assert_eq!(m.row(1).unwrap().sequence.to_string(), "AC---");
    }

    #[test]
    fn test_splice_window_keeps_padding() {
        let mut m = AlignmentMatrix::from_strs(&["AC", "AC"]).unwrap();
        m.pad_to_width(6).unwrap();
        m.splice_window(0, 0, 1, b"A").unwrap();
        assert_eq!(m.width(), 6);
        assert!(m.is_rectangular());
        assert_eq!(m.row(0).unwrap().sequence.to_string(), "AC----");
    }

    #[test]
    fn test_splice_window_out_of_bounds_leaves_matrix() {
        let mut m = sample();
        let before = m.clone();
        assert!(matches!(
            m.splice_window(0, 3, 9, b"A"),
            Err(EvoAlignError::WindowOutOfBounds { .. })
        ));
        assert!(m.splice_window(9, 0, 1, b"A").is_err());
        assert_eq!(m, before);
    }

    #[test]
    fn test_recombine_checks_row_count() {
        let m = sample();
        let rows = m.rows()[..4].to_vec();
        assert!(m.recombine(rows).is_err());

        let mut rows = m.rows().to_vec();
        rows[0].sequence = "ABC---F".parse().unwrap();
        let out = m.recombine(rows).unwrap();
        assert_eq!(out.width(), 7);
        assert!(out.is_rectangular());
    }

    #[test]
    fn test_column_view_is_restartable() {
        let m = AlignmentMatrix::from_strs(&["AC", "A-"]).unwrap();
        let view = m.column_view().unwrap();
        let first: Vec<Vec<u8>> = view.iter().map(|c| c.to_vec()).collect();
        let second: Vec<Vec<u8>> = view.iter().map(|c| c.to_vec()).collect();
        assert_eq!(first, vec![b"AA".to_vec(), b"C-".to_vec()]);
        assert_eq!(first, second);
        assert_eq!(view.iter().len(), 2);
    }

    #[test]
    fn test_column_view_rejects_ragged() {
        let m: AlignmentMatrix = serde_json::from_str(
            r#"{"rows":[{"id":"a","sequence":"ACD"},{"id":"b","sequence":"AC"}]}"#,
        )
        .unwrap();
        assert!(matches!(m.column_view(), Err(EvoAlignError::Shape(_))));
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_compact_drops_all_gap_columns() {
        let m = AlignmentMatrix::from_strs(&["A-C-", "A-D-"]).unwrap().compacted();
        assert_eq!(m.width(), 2);
        assert_eq!(m.row(0).unwrap().sequence.to_string(), "AC");
        assert_eq!(m.row(1).unwrap().sequence.to_string(), "AD");
    }
}
