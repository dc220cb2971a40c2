//! End-to-end refresh: load, reshape, normalize, join, write.
//!
//! Each processed table is written as soon as it is produced, in this order:
//!
//! ```text
//! indicators.csv → country_metadata.csv → indicator_metadata.csv
//!   → municipal_stats.csv → municipality_metadata.csv → merged_dataset.csv
//! ```
//!
//! A fatal error stops the run; files written before it stay on disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use statrefresh::{run_pipeline, PipelineConfig};
//!
//! let report = run_pipeline(&PipelineConfig::default())?;
//! println!("{} outputs", report.outputs.len());
//! ```

use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use super::join::{inner_join, left_join};
use super::normalize::{
    municipality_table, normalize_country_metadata, normalize_indicator_metadata,
    normalize_municipal_stats, parse_municipality_lines, MUNICIPALITY_CODE,
};
use super::reshape::{melt_indicators, IdColumn};
use crate::acquire::DatasetClient;
use crate::config::{outputs, PipelineConfig, INDICATOR_PREAMBLE_LINES};
use crate::error::{LoadResult, PipelineError, PipelineResult, SinkResult};
use crate::logs::{log_info, log_success};
use crate::parser::{read_csv_file, read_docx_lines, read_indicator_csv, read_table};
use crate::sink::write_table;
use crate::table::Table;

const COUNTRY_KEY: &str = "CountryCode";
const INDICATOR_KEY: &str = "IndCode";

/// The five raw inputs, as loaded from disk.
#[derive(Debug, Clone)]
pub struct RawTables {
    pub indicators: Table,
    pub country_metadata: Table,
    pub indicator_metadata: Table,
    pub municipal_stats: Table,
    pub municipality_lines: Vec<String>,
}

/// One written output file
#[derive(Debug, Clone, Serialize)]
pub struct OutputSummary {
    pub name: String,
    pub path: PathBuf,
    pub rows: usize,
    pub columns: usize,
}

/// Summary of a pipeline run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub outputs: Vec<OutputSummary>,
}

impl RunReport {
    pub fn get(&self, name: &str) -> Option<&OutputSummary> {
        self.outputs.iter().find(|o| o.name == name)
    }
}

/// Read all raw inputs named in `config`.
pub fn load_raw_tables(config: &PipelineConfig) -> LoadResult<RawTables> {
    let inputs = &config.inputs;

    log_info("Reading raw files...");
    let indicators = read_indicator_csv(&config.raw_path(&inputs.indicators), INDICATOR_PREAMBLE_LINES)?;
    log_success(format!(
        "Indicators: {} rows x {} columns",
        indicators.len(),
        indicators.width()
    ));

    let country_metadata = read_csv_file(&config.raw_path(&inputs.country_metadata), 0)?;
    let indicator_metadata = read_csv_file(&config.raw_path(&inputs.indicator_metadata), 0)?;
    let municipal_stats = read_table(&config.raw_path(&inputs.municipal_stats))?;
    let municipality_lines = read_docx_lines(&config.raw_path(&inputs.municipalities))?;

    log_success(format!(
        "Metadata: {} countries, {} indicators, {} municipal rows, {} document lines",
        country_metadata.len(),
        indicator_metadata.len(),
        municipal_stats.len(),
        municipality_lines.len()
    ));

    Ok(RawTables {
        indicators,
        country_metadata,
        indicator_metadata,
        municipal_stats,
        municipality_lines,
    })
}

/// Join long indicators with country metadata, indicator metadata and
/// municipal statistics.
///
/// The first two joins are inner joins on the indicator's country code and
/// indicator code columns; the last is a left join on `MunicipalityCode`.
pub fn merge_dataset(
    long_indicators: &Table,
    country_metadata: &Table,
    indicator_metadata: &Table,
    municipal_stats: &Table,
) -> Table {
    let country_col = IdColumn::CountryCode
        .locate(long_indicators)
        .unwrap_or(IdColumn::CountryCode.canonical())
        .to_string();
    let indicator_col = IdColumn::IndicatorCode
        .locate(long_indicators)
        .unwrap_or(IdColumn::IndicatorCode.canonical())
        .to_string();

    let with_countries = inner_join(long_indicators, country_metadata, &country_col, COUNTRY_KEY);
    let with_indicators = inner_join(&with_countries, indicator_metadata, &indicator_col, INDICATOR_KEY);
    left_join(&with_indicators, municipal_stats, MUNICIPALITY_CODE)
}

/// Run the full refresh from the raw directory to the processed directory.
pub fn run_pipeline(config: &PipelineConfig) -> PipelineResult<RunReport> {
    prepare_directories(config)?;

    let raw = load_raw_tables(config)?;
    let mut report = RunReport::default();

    log_info(format!(
        "Reshaping indicators to long form ({}-{})...",
        config.years.start, config.years.end
    ));
    let long = melt_indicators(&raw.indicators, config.years)?;
    write_output(config, &mut report, outputs::INDICATORS, &long)?;

    log_info("Normalizing column names...");
    let country_metadata = normalize_country_metadata(raw.country_metadata);
    write_output(config, &mut report, outputs::COUNTRY_METADATA, &country_metadata)?;

    let indicator_metadata = normalize_indicator_metadata(raw.indicator_metadata);
    write_output(config, &mut report, outputs::INDICATOR_METADATA, &indicator_metadata)?;

    let municipal_stats = normalize_municipal_stats(raw.municipal_stats);
    write_output(config, &mut report, outputs::MUNICIPAL_STATS, &municipal_stats)?;

    let municipalities = municipality_table(&parse_municipality_lines(&raw.municipality_lines));
    write_output(config, &mut report, outputs::MUNICIPALITY_METADATA, &municipalities)?;

    log_info("Merging datasets...");
    let merged = merge_dataset(&long, &country_metadata, &indicator_metadata, &municipal_stats);
    write_output(config, &mut report, outputs::MERGED_DATASET, &merged)?;

    log_success(format!("Processed data saved to {}", config.processed_dir.display()));
    Ok(report)
}

/// Download the dataset into the raw directory, then run the pipeline.
pub fn refresh(config: &PipelineConfig, client: &DatasetClient) -> PipelineResult<RunReport> {
    prepare_directories(config)?;
    client.fetch_into(&config.dataset_id, &config.raw_dir)?;
    run_pipeline(config)
}

fn prepare_directories(config: &PipelineConfig) -> PipelineResult<()> {
    for dir in config.directories() {
        fs::create_dir_all(dir).map_err(|source| PipelineError::Directory {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

fn write_output(config: &PipelineConfig, report: &mut RunReport, name: &str, table: &Table) -> SinkResult<()> {
    let path = config.processed_path(name);
    write_table(table, &path)?;
    log_success(format!("{}: {} rows", name, table.len()));

    report.outputs.push(OutputSummary {
        name: name.to_string(),
        path,
        rows: table.len(),
        columns: table.width(),
    });
    Ok(())
}
