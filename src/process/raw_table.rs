use anyhow::{anyhow, Result};

/// One CSV member of the archive, parsed but not yet reshaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    /// File stem of the archive entry, e.g. `Alcohol_specific_deaths_2019`.
    pub name: String,
    /// Column names from the header row. Empty header cells become `Unnamed: <index>`.
    pub headers: Vec<String>,
    /// Each data row, padded to `headers.len()`. An empty cell is a missing value.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    /// Like [`column_index`](Self::column_index) but a missing column is an error.
    pub fn require(&self, column: &str) -> Result<usize> {
        self.column_index(column).ok_or_else(|| {
            anyhow!(
                "table `{}` has no `{}` column (headers: {:?})",
                self.name,
                column,
                self.headers
            )
        })
    }

    /// All cells of column `idx`, in row order.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &str> {
        self.rows.iter().map(move |row| cell(row, idx))
    }
}

/// Cell `idx` of `row`, or `""` when the row is short.
pub fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}
