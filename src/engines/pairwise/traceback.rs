use super::smith_waterman::{DpTable, Operation};
use crate::types::{Symbol, GAP};

/// When a traceback stops walking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracebackStop {
    /// At the first cell whose score is not positive, or at either edge.
    AtZeroScore,
    /// Only when either index reaches zero. A zero-floor cell is walked as a
    /// deletion, consuming one symbol of `a`.
    AtEitherEdge,
}

/// Iterative walk back through an operation table.
///
/// Yields aligned `(a, b)` symbol pairs in reverse order. Finite and
/// single-pass; [`Traceback::position`] reports where the walk ended.
pub struct Traceback<'t> {
    table: &'t DpTable,
    a: &'t [Symbol],
    b: &'t [Symbol],
    i: usize,
    j: usize,
    stop: TracebackStop,
}

impl<'t> Traceback<'t> {
    pub fn new(
        table: &'t DpTable,
        a: &'t [Symbol],
        b: &'t [Symbol],
        i: usize,
        j: usize,
        stop: TracebackStop,
    ) -> Self {
        Self {
            table,
            a,
            b,
            i,
            j,
            stop,
        }
    }

    /// Current `(i, j)`: after exhaustion, the first unconsumed prefix lengths.
    pub fn position(&self) -> (usize, usize) {
        (self.i, self.j)
    }
}

impl Iterator for Traceback<'_> {
    type Item = (Symbol, Symbol);

    fn next(&mut self) -> Option<Self::Item> {
        if self.i == 0 || self.j == 0 {
            return None;
        }
        if self.stop == TracebackStop::AtZeroScore && self.table.score(self.i, self.j) <= 0.0 {
            return None;
        }

        match self.table.op(self.i, self.j) {
            Operation::Match => {
                self.i -= 1;
                self.j -= 1;
                Some((self.a[self.i], self.b[self.j]))
            }
            Operation::Insertion => {
                self.j -= 1;
                Some((GAP, self.b[self.j]))
            }
            Operation::Deletion | Operation::Zero => {
                self.i -= 1;
                Some((self.a[self.i], GAP))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::pairwise::{AlignmentCosts, SmithWaterman};

    #[test]
    fn test_local_traceback_stops_at_zero() {
        let a = b"XXAC";
        let b = b"AC";
        let table = SmithWaterman::with_costs(AlignmentCosts::default()).fill(a, b);
        let mut trace = Traceback::new(&table, a, b, 4, 2, TracebackStop::AtZeroScore);
        let pairs: Vec<_> = trace.by_ref().collect();
        assert_eq!(pairs, vec![(b'C', b'C'), (b'A', b'A')]);
        assert_eq!(trace.position(), (2, 0));
        assert_eq!(trace.next(), None);
    }

    #[test]
    fn test_edge_traceback_steps_zero_cells_as_deletions() {
        let a = b"QA";
        let b = b"WA";
        let table = SmithWaterman::with_costs(AlignmentCosts::default()).fill(a, b);
        assert_eq!(table.op(1, 1), Operation::Zero);
        let mut trace = Traceback::new(&table, a, b, 2, 2, TracebackStop::AtEitherEdge);
        let pairs: Vec<_> = trace.by_ref().collect();
        assert_eq!(pairs, vec![(b'A', b'A'), (b'Q', GAP)]);
        assert_eq!(trace.position(), (0, 1));
    }
}
