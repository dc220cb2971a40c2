//! Column renaming to the shared key vocabulary, and municipality line
//! parsing.

use serde::{Deserialize, Serialize};

use crate::logs::log_warning;
use crate::table::{cell, Table};

pub const COUNTRY_RENAMES: &[(&str, &str)] = &[
    ("Country Code", "CountryCode"),
    ("Country Name", "CountryName"),
];

pub const INDICATOR_RENAMES: &[(&str, &str)] = &[
    ("Indicator Code", "IndCode"),
    ("Indicator Name", "IndName"),
];

pub const MUNICIPAL_STATS_RENAMES: &[(&str, &str)] = &[("Code", "MunicipalityCode")];

pub const MUNICIPALITY_CODE: &str = "MunicipalityCode";
pub const MUNICIPALITY_NAME: &str = "MunicipalityName";

/// Rename columns by exact name. Absent source columns are skipped with a
/// warning; rows and column order are untouched.
pub fn rename_columns(mut table: Table, renames: &[(&str, &str)]) -> Table {
    for (from, to) in renames {
        if !table.rename_column(from, to) {
            log_warning(format!(
                "Column '{}' not found, '{}' will not be available for joins",
                from, to
            ));
        }
    }
    table
}

pub fn normalize_country_metadata(table: Table) -> Table {
    rename_columns(table, COUNTRY_RENAMES)
}

pub fn normalize_indicator_metadata(table: Table) -> Table {
    rename_columns(table, INDICATOR_RENAMES)
}

pub fn normalize_municipal_stats(table: Table) -> Table {
    rename_columns(table, MUNICIPAL_STATS_RENAMES)
}

/// One municipality from the document listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Municipality {
    pub code: String,
    pub name: String,
}

/// Parse `code<TAB>name` lines. Splits on the first tab and trims both
/// sides; lines without a tab are skipped.
pub fn parse_municipality_lines<I, S>(lines: I) -> Vec<Municipality>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| {
            let (code, name) = line.as_ref().split_once('\t')?;
            Some(Municipality {
                code: code.trim().to_string(),
                name: name.trim().to_string(),
            })
        })
        .collect()
}

/// Build the `MunicipalityCode, MunicipalityName` table.
pub fn municipality_table(municipalities: &[Municipality]) -> Table {
    Table::from_rows(
        vec![MUNICIPALITY_CODE.to_string(), MUNICIPALITY_NAME.to_string()],
        municipalities
            .iter()
            .map(|m| vec![cell(&m.code), cell(&m.name)])
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_municipality_lines() {
        let lines = ["001\tSeoul", "no tab here", "002\tBusan"];
        let parsed = parse_municipality_lines(lines);

        assert_eq!(
            parsed,
            vec![
                Municipality {
                    code: "001".into(),
                    name: "Seoul".into()
                },
                Municipality {
                    code: "002".into(),
                    name: "Busan".into()
                },
            ]
        );
    }

    #[test]
    fn test_split_on_first_tab_and_trim() {
        let parsed = parse_municipality_lines(vec![" 11 \t Jongno-gu\tSeoul ".to_string()]);
        assert_eq!(parsed[0].code, "11");
        assert_eq!(parsed[0].name, "Jongno-gu\tSeoul");
    }

    #[test]
    fn test_municipality_table() {
        let table = municipality_table(&parse_municipality_lines(["001\tSeoul"]));
        assert_eq!(table.headers(), &["MunicipalityCode", "MunicipalityName"]);
        assert_eq!(table.get(0, "MunicipalityName"), Some("Seoul"));
    }

    #[test]
    fn test_rename_preserves_rows_and_order() {
        let input = Table::from_rows(
            vec!["Country Code".into(), "Region".into(), "Country Name".into()],
            vec![
                vec![cell("KOR"), cell("East Asia"), cell("Korea, Rep.")],
                vec![cell("JPN"), None, cell("Japan")],
            ],
        );

        let output = normalize_country_metadata(input.clone());
        assert_eq!(output.headers(), &["CountryCode", "Region", "CountryName"]);
        assert_eq!(output.rows(), input.rows());
    }

    #[test]
    fn test_missing_source_column_is_noop() {
        let input = Table::from_rows(
            vec!["Indicator Code".into(), "SOURCE_NOTE".into()],
            vec![vec![cell("NY.GDP.MKTP.CD"), cell("GDP at purchaser's prices")]],
        );

        let output = normalize_indicator_metadata(input);
        assert_eq!(output.headers(), &["IndCode", "SOURCE_NOTE"]);

        let stats = normalize_municipal_stats(Table::new(vec!["Region".into()]));
        assert_eq!(stats.headers(), &["Region"]);
    }
}
