use super::matrix::Row;
use crate::types::Symbol;

/// Read-only, restartable view over the columns of a rectangular alignment.
///
/// Each call to [`ColumnView::iter`] starts again from column 0. Nothing is
/// copied: columns borrow the rows they were built from.
#[derive(Debug, Clone, Copy)]
pub struct ColumnView<'a> {
    rows: &'a [Row],
    width: usize,
}

impl<'a> ColumnView<'a> {
    pub(crate) fn new(rows: &'a [Row], width: usize) -> Self {
        Self { rows, width }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn iter(&self) -> Columns<'a> {
        Columns {
            rows: self.rows,
            next: 0,
            width: self.width,
        }
    }
}

impl<'a> IntoIterator for ColumnView<'a> {
    type Item = Column<'a>;
    type IntoIter = Columns<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &ColumnView<'a> {
    type Item = Column<'a>;
    type IntoIter = Columns<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Columns<'a> {
    rows: &'a [Row],
    next: usize,
    width: usize,
}

impl<'a> Iterator for Columns<'a> {
    type Item = Column<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.width {
            return None;
        }
        let column = Column {
            rows: self.rows,
            index: self.next,
        };
        self.next += 1;
        Some(column)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.width - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Columns<'_> {}

/// The symbols at one position across every row.
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    rows: &'a [Row],
    index: usize,
}

impl<'a> Column<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of rows (symbols) in the column.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<Symbol> {
        self.rows.get(row).and_then(|r| r.sequence.get(self.index))
    }

    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + 'a {
        let index = self.index;
        // Rows are rectangular when a view is created, so the index is in range.
        self.rows
            .iter()
            .map(move |r| r.sequence.as_slice()[index])
    }

    pub fn to_vec(&self) -> Vec<Symbol> {
        self.symbols().collect()
    }
}
