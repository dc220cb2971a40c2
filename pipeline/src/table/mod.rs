//! In-memory tabular value shared by every pipeline stage.
//!
//! A [`Table`] is an ordered header list plus rows of optional string cells.
//! `None` is a missing value; loaders map empty fields to `None` and the sink
//! writes `None` back as an empty field.
//!
//! ```text
//! headers: ["CountryCode", "Year", "Value"]
//! rows:    [Some("KOR"),   Some("2020"), Some("200")]
//!          [Some("KOR"),   Some("2021"), None       ]
//! ```

use serde::Serialize;

/// One table cell. `None` means missing.
pub type Cell = Option<String>;

/// Build a cell from raw text, mapping the empty string to missing.
pub fn cell(raw: &str) -> Cell {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Ordered table of optional string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given headers.
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Create a table from headers and rows. Rows are padded with missing
    /// cells or truncated to the header width.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let mut table = Self::new(headers);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Append a row, fitting it to the header width.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.headers.len(), None);
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Index of the column with exactly this name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of the column whose name matches ignoring whitespace, so
    /// `"Country Code"` and `"CountryCode"` resolve to the same column.
    pub fn column_index_loose(&self, name: &str) -> Option<usize> {
        let wanted = squash(name);
        self.headers.iter().position(|h| squash(h) == wanted)
    }

    /// Cell value at `row` in the named column.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }

    /// Values of the named column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r[idx].as_deref()).collect())
    }

    /// Rename the first column called `from`. Returns false if absent.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.column_index(from) {
            Some(idx) => {
                self.headers[idx] = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Drop the column at `idx` from headers and every row.
    pub fn drop_column(&mut self, idx: usize) {
        if idx >= self.headers.len() {
            return;
        }
        self.headers.remove(idx);
        for row in &mut self.rows {
            row.remove(idx);
        }
    }
}

fn squash(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows(
            vec!["Country Code".into(), "Region".into()],
            vec![
                vec![cell("KOR"), cell("East Asia & Pacific")],
                vec![cell("JPN")],
            ],
        )
    }

    #[test]
    fn test_rows_fit_header_width() {
        let table = sample();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1], vec![cell("JPN"), None]);

        let mut wide = Table::new(vec!["a".into()]);
        wide.push_row(vec![cell("1"), cell("2"), cell("3")]);
        assert_eq!(wide.rows()[0].len(), 1);
    }

    #[test]
    fn test_empty_string_is_missing() {
        assert_eq!(cell(""), None);
        assert_eq!(cell(" "), Some(" ".to_string()));
    }

    #[test]
    fn test_loose_column_lookup() {
        let table = sample();
        assert_eq!(table.column_index("CountryCode"), None);
        assert_eq!(table.column_index_loose("CountryCode"), Some(0));
        assert_eq!(table.column_index_loose("Country Code"), Some(0));
    }

    #[test]
    fn test_rename_and_get() {
        let mut table = sample();
        assert!(table.rename_column("Country Code", "CountryCode"));
        assert!(!table.rename_column("Nope", "Other"));
        assert_eq!(table.get(0, "CountryCode"), Some("KOR"));
        assert_eq!(table.get(1, "Region"), None);
        assert_eq!(
            table.column("CountryCode").unwrap(),
            vec![Some("KOR"), Some("JPN")]
        );
    }

    #[test]
    fn test_drop_column() {
        let mut table = sample();
        table.drop_column(1);
        assert_eq!(table.headers(), &["Country Code".to_string()]);
        assert_eq!(table.rows()[0], vec![cell("KOR")]);
    }
}
