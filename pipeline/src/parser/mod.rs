//! Raw input loaders.
//!
//! - CSV files, with encoding auto-detection and an optional preamble skip
//! - [`spreadsheet`] - first sheet of an `.xls`/`.xlsx` workbook
//! - [`document`] - paragraph lines of a `.docx` document
//!
//! Every loader checks that its file exists first and reports
//! [`LoadError::MissingFile`] otherwise.

pub mod document;
pub mod spreadsheet;

use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::table::{cell, Table};

pub use document::{docx_paragraphs, read_docx_lines};
pub use spreadsheet::read_spreadsheet;

/// Detect the encoding of raw bytes. Valid UTF-8 (BOM included) wins,
/// otherwise chardet decides.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the given encoding, dropping a UTF-8 BOM.
///
/// Unknown encodings and invalid UTF-8 fall back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let text = match encoding.to_lowercase().as_str() {
        // WHATWG maps the latin-1 labels onto windows-1252, a superset of
        // ISO-8859-1 outside 0x80..=0x9F.
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        _ => match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => String::from_utf8_lossy(bytes).into_owned(),
        },
    };

    match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

/// Return the content after the first `lines` physical lines.
pub fn skip_lines(content: &str, lines: usize) -> &str {
    let mut offset = 0;
    for (skipped, chunk) in content.split_inclusive('\n').enumerate() {
        if skipped == lines {
            break;
        }
        offset += chunk.len();
    }
    &content[offset..]
}

/// Parse comma-separated text with a header row into a [`Table`].
///
/// Short rows are padded with missing cells and long rows truncated.
/// Unnamed headers become `Unnamed: <index>`.
pub fn parse_csv_str(content: &str) -> Result<Table, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if h.trim().is_empty() {
                format!("Unnamed: {}", i)
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut table = Table::new(headers);
    for record in reader.records() {
        let record = record?;
        table.push_row(record.iter().map(cell).collect());
    }

    Ok(table)
}

/// Drop the last column if it is unnamed and empty in every row, as left by
/// a trailing delimiter on each line. Returns true if a column was dropped.
pub fn drop_trailing_empty_column(table: &mut Table) -> bool {
    let Some(last) = table.width().checked_sub(1) else {
        return false;
    };
    let unnamed = table.headers()[last] == format!("Unnamed: {}", last);
    if unnamed && table.rows().iter().all(|row| row[last].is_none()) {
        table.drop_column(last);
        true
    } else {
        false
    }
}

/// Read a CSV file, skipping `preamble_lines` lines before the header row.
pub fn read_csv_file(path: &Path, preamble_lines: usize) -> LoadResult<Table> {
    ensure_exists(path)?;

    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let encoding = detect_encoding(&bytes);
    let content = decode_content(&bytes, &encoding);
    let body = skip_lines(&content, preamble_lines);

    if body.trim().is_empty() {
        return Err(LoadError::NoHeaders {
            path: path.to_path_buf(),
        });
    }

    parse_csv_str(body).map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the wide indicator CSV: skip the preamble and drop the empty column
/// its trailing delimiters produce.
pub fn read_indicator_csv(path: &Path, preamble_lines: usize) -> LoadResult<Table> {
    let mut table = read_csv_file(path, preamble_lines)?;
    drop_trailing_empty_column(&mut table);
    Ok(table)
}

/// Load any tabular input, choosing the reader from the file extension.
///
/// `.csv` goes through [`read_csv_file`]; everything else is treated as a
/// spreadsheet workbook.
pub fn read_table(path: &Path) -> LoadResult<Table> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        read_csv_file(path, 0)
    } else {
        read_spreadsheet(path)
    }
}

pub(crate) fn ensure_exists(path: &Path) -> LoadResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(LoadError::MissingFile {
            path: path.to_path_buf(),
        })
    }
}
