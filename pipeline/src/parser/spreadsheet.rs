//! Spreadsheet loader: the first worksheet of a workbook as a [`Table`].

use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

use super::ensure_exists;
use crate::error::{LoadError, LoadResult};
use crate::table::{Cell, Table};

/// Read the first sheet of an `.xls`, `.xlsx`, `.xlsm` or `.ods` workbook.
///
/// The first row is the header. Whole-number floats are rendered without a
/// fractional part so numeric codes stay joinable as text (`11.0` -> `11`).
pub fn read_spreadsheet(path: &Path) -> LoadResult<Table> {
    ensure_exists(path)?;

    let spreadsheet_err = |message: String| LoadError::Spreadsheet {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| spreadsheet_err(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| spreadsheet_err("workbook has no sheets".to_string()))?
        .map_err(|e| spreadsheet_err(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .enumerate()
            .map(|(i, c)| data_to_cell(c).unwrap_or_else(|| format!("Unnamed: {}", i)))
            .collect(),
        None => {
            return Err(LoadError::NoHeaders {
                path: path.to_path_buf(),
            })
        }
    };

    let mut table = Table::new(headers);
    for row in rows {
        table.push_row(row.iter().map(data_to_cell).collect());
    }
    Ok(table)
}

/// Render one spreadsheet cell as text.
pub fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(f) => Some(format_float(*f)),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
        other => Some(other.to_string()),
    }
}

fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}
