//! Row types

/// One physical spreadsheet row as produced by a row-event decoder.
///
/// Cells are kept sorted by column and each column appears at most once.
/// Columns without a value are absent rather than stored as empty text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawRow {
    index: u32,
    cells: Vec<(u16, String)>,
}

impl RawRow {
    /// Create an empty row for the given 0-based row index
    pub fn new(index: u32) -> Self {
        Self {
            index,
            cells: Vec::new(),
        }
    }

    /// 0-based physical row index within the sheet
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Add a cell; a second value for the same column replaces the first.
    pub fn push(&mut self, col: u16, text: impl Into<String>) {
        let text = text.into();
        match self.cells.last() {
            Some((last, _)) if *last < col => self.cells.push((col, text)),
            None => self.cells.push((col, text)),
            Some(_) => match self.cells.binary_search_by_key(&col, |(c, _)| *c) {
                Ok(pos) => self.cells[pos].1 = text,
                Err(pos) => self.cells.insert(pos, (col, text)),
            },
        }
    }

    /// Get the text of a cell by column index
    pub fn get(&self, col: u16) -> Option<&str> {
        self.cells
            .binary_search_by_key(&col, |(c, _)| *c)
            .ok()
            .map(|pos| self.cells[pos].1.as_str())
    }

    /// Iterate cells in column order
    pub fn cells(&self) -> impl Iterator<Item = (u16, &str)> {
        self.cells.iter().map(|(c, t)| (*c, t.as_str()))
    }

    /// Check if row has any cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of cells in row
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}
