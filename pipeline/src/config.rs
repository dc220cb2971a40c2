//! Run configuration.
//!
//! Everything the pipeline needs to know about where files live is passed in
//! through [`PipelineConfig`]; nothing is read from globals.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::transform::reshape::YearRange;

pub const DEFAULT_RAW_DIR: &str = "data/raw";
pub const DEFAULT_PROCESSED_DIR: &str = "data/processed";
pub const DEFAULT_DATASET_ID: &str = "your-username/your-dataset-slug";
pub const DEFAULT_API_BASE: &str = "https://www.kaggle.com/api/v1";

/// Preamble lines before the header of the wide indicator file.
pub const INDICATOR_PREAMBLE_LINES: usize = 4;

/// Raw input file names, relative to the raw directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFiles {
    pub indicators: String,
    pub country_metadata: String,
    pub indicator_metadata: String,
    pub municipal_stats: String,
    pub municipalities: String,
}

impl Default for InputFiles {
    fn default() -> Self {
        Self {
            indicators: "API_KOR_DS2_en_csv_v2_15934.csv".to_string(),
            country_metadata: "Metadata_Country_API_KOR_DS2_en_csv_v2_15934.csv".to_string(),
            indicator_metadata: "Metadata_Indicator_API_KOR_DS2_en_csv_v2_15934.csv".to_string(),
            municipal_stats: "Korea Rep Data v2.xls".to_string(),
            municipalities: "AAA Municipality.docx".to_string(),
        }
    }
}

/// Output file names, relative to the processed directory.
pub mod outputs {
    pub const INDICATORS: &str = "indicators.csv";
    pub const COUNTRY_METADATA: &str = "country_metadata.csv";
    pub const INDICATOR_METADATA: &str = "indicator_metadata.csv";
    pub const MUNICIPAL_STATS: &str = "municipal_stats.csv";
    pub const MUNICIPALITY_METADATA: &str = "municipality_metadata.csv";
    pub const MERGED_DATASET: &str = "merged_dataset.csv";
}

/// Configuration for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory holding the raw inputs (and the unpacked download)
    pub raw_dir: PathBuf,

    /// Directory receiving the processed CSV files
    pub processed_dir: PathBuf,

    /// Dataset identifier on the host, `owner/slug`
    pub dataset_id: String,

    /// Base URL of the dataset host API
    pub api_base: String,

    /// Years kept in the long indicator table
    pub years: YearRange,

    pub inputs: InputFiles,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from(DEFAULT_RAW_DIR),
            processed_dir: PathBuf::from(DEFAULT_PROCESSED_DIR),
            dataset_id: DEFAULT_DATASET_ID.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            years: YearRange::default(),
            inputs: InputFiles::default(),
        }
    }
}

impl PipelineConfig {
    pub fn new(raw_dir: impl Into<PathBuf>, processed_dir: impl Into<PathBuf>, dataset_id: impl Into<String>) -> Self {
        Self {
            raw_dir: raw_dir.into(),
            processed_dir: processed_dir.into(),
            dataset_id: dataset_id.into(),
            ..Self::default()
        }
    }

    pub fn with_years(mut self, years: YearRange) -> Self {
        self.years = years;
        self
    }

    pub fn with_inputs(mut self, inputs: InputFiles) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn raw_path(&self, name: &str) -> PathBuf {
        self.raw_dir.join(name)
    }

    pub fn processed_path(&self, name: &str) -> PathBuf {
        self.processed_dir.join(name)
    }

    pub fn directories(&self) -> [&Path; 2] {
        [self.raw_dir.as_path(), self.processed_dir.as_path()]
    }
}
