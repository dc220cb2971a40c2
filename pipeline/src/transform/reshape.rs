//! Wide to long reshape (melt) of the indicator table.
//!
//! ```text
//! Wide input                                   Long output
//! ┌──────┬──────┬──────┬──────┬──────┐        ┌──────┬──────┬──────┐
//! │ ids… │ 2019 │ 2020 │ 2021 │      │   →    │ ids… │ Year │ Value│
//! │ KOR… │ 100  │ 200  │ 210  │      │        │ KOR… │ 2020 │ 200  │
//! └──────┴──────┴──────┴──────┴──────┘        │ KOR… │ 2021 │ 210  │
//!                                             └──────┴──────┴──────┘
//! ```
//!
//! Column names are checked once, before any row is produced: every
//! non-identifier column must parse as an integer year.

use serde::{Deserialize, Serialize};

use crate::error::{ReshapeError, ReshapeResult};
use crate::table::{Cell, Table};

pub const YEAR_COLUMN: &str = "Year";
pub const VALUE_COLUMN: &str = "Value";

/// The four identifier columns of the indicator table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdColumn {
    CountryName,
    CountryCode,
    IndicatorName,
    IndicatorCode,
}

impl IdColumn {
    pub const ALL: [IdColumn; 4] = [
        IdColumn::CountryName,
        IdColumn::CountryCode,
        IdColumn::IndicatorName,
        IdColumn::IndicatorCode,
    ];

    pub fn canonical(self) -> &'static str {
        match self {
            IdColumn::CountryName => "CountryName",
            IdColumn::CountryCode => "CountryCode",
            IdColumn::IndicatorName => "IndicatorName",
            IdColumn::IndicatorCode => "IndicatorCode",
        }
    }

    /// Header name of this column in `table`, matched ignoring whitespace.
    pub fn locate(self, table: &Table) -> Option<&str> {
        table
            .column_index_loose(self.canonical())
            .map(|idx| table.headers()[idx].as_str())
    }
}

/// Inclusive range of years kept after melting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::new(2020, 2023)
    }
}

/// Melt the wide indicator table into long form, keeping years in `years`.
///
/// Output rows are grouped by year column (in input column order), each
/// group listing the input rows in order.
pub fn melt_indicators(wide: &Table, years: YearRange) -> ReshapeResult<Table> {
    let mut id_indices = Vec::with_capacity(IdColumn::ALL.len());
    for id in IdColumn::ALL {
        let idx = wide.column_index_loose(id.canonical()).ok_or_else(|| {
            ReshapeError::MissingIdentifierColumn {
                column: id.canonical().to_string(),
            }
        })?;
        id_indices.push(idx);
    }

    let mut year_columns = Vec::new();
    for (idx, name) in wide.headers().iter().enumerate() {
        if id_indices.contains(&idx) {
            continue;
        }
        let year: i32 = name
            .trim()
            .parse()
            .map_err(|_| ReshapeError::MalformedYearColumn {
                column: name.clone(),
            })?;
        year_columns.push((idx, name.trim().to_string(), year));
    }

    if year_columns.is_empty() {
        return Err(ReshapeError::NoYearColumns);
    }

    let mut headers: Vec<String> = id_indices
        .iter()
        .map(|&i| wide.headers()[i].clone())
        .collect();
    headers.push(YEAR_COLUMN.to_string());
    headers.push(VALUE_COLUMN.to_string());

    let mut long = Table::new(headers);
    for (col_idx, label, year) in &year_columns {
        if !years.contains(*year) {
            continue;
        }
        for row in wide.rows() {
            let mut out: Vec<Cell> = id_indices.iter().map(|&i| row[i].clone()).collect();
            out.push(Some(label.clone()));
            out.push(row[*col_idx].clone());
            long.push_row(out);
        }
    }

    Ok(long)
}
