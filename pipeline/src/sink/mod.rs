//! CSV sink for processed tables.
//!
//! UTF-8, comma-delimited, header row, no row index. Missing cells are
//! written as empty fields. Existing files are overwritten.

use std::io::Write;
use std::path::Path;

use crate::error::{SinkError, SinkResult};
use crate::table::Table;

/// Serialize `table` as CSV into any writer.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> csv::Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b',')
        .flexible(false)
        .from_writer(writer);

    if table.width() > 0 {
        wtr.write_record(table.headers())?;
        for row in table.rows() {
            wtr.write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))?;
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Write `table` to `path`, replacing any existing file.
pub fn write_table(table: &Table, path: &Path) -> SinkResult<()> {
    let file = std::fs::File::create(path).map_err(|source| SinkError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    write_csv(table, std::io::BufWriter::new(file)).map_err(|source| SinkError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::cell;
    use std::fs;
    use tempfile::tempdir;

    fn sample() -> Table {
        Table::from_rows(
            vec!["Country Name".into(), "Year".into(), "Value".into()],
            vec![
                vec![cell("Korea, Rep."), cell("2020"), cell("200")],
                vec![cell("Korea, Rep."), cell("2021"), None],
            ],
        )
    }

    #[test]
    fn test_missing_cells_written_empty() {
        let mut buf = Vec::new();
        write_csv(&sample(), &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "Country Name,Year,Value\n\"Korea, Rep.\",2020,200\n\"Korea, Rep.\",2021,\n"
        );
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("indicators.csv");
        fs::write(&path, "stale content that is longer than the new file\n".repeat(20)).unwrap();

        write_table(&Table::new(vec!["a".into()]), &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\n");
    }

    #[test]
    fn test_unwritable_path_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.csv");

        let err = write_table(&sample(), &path).unwrap_err();
        assert!(matches!(err, SinkError::Io { .. }));
    }

    #[test]
    fn test_same_input_same_bytes() {
        let mut first = Vec::new();
        let mut second = Vec::new();
        write_csv(&sample(), &mut first).unwrap();
        write_csv(&sample(), &mut second).unwrap();
        assert_eq!(first, second);
    }
}
