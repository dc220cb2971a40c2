//! # Statrefresh - repeatable refresh of a country and municipal statistics dataset
//!
//! Statrefresh reads a wide indicator CSV, two metadata CSVs, a municipal
//! statistics spreadsheet and a municipality listing document, and writes a
//! set of tidy CSV tables plus one merged dataset.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Raw files  │────▶│   Parser    │────▶│  Transform  │────▶│  CSV sink   │
//! │ csv/xls/docx│     │  (loaders)  │     │ melt + join │     │ (processed) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use statrefresh::{run_pipeline, PipelineConfig};
//!
//! fn main() {
//!     let config = PipelineConfig::new("data/raw", "data/processed", "owner/slug");
//!     let report = run_pipeline(&config).unwrap();
//!     println!("Wrote {} files", report.outputs.len());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per stage
//! - [`config`] - Run configuration
//! - [`table`] - Tabular value shared by all stages
//! - [`parser`] - CSV, spreadsheet and document loaders
//! - [`transform`] - Reshape, normalize, join and the pipeline
//! - [`sink`] - CSV output
//! - [`acquire`] - Dataset download
//! - [`logs`] - Log helpers

// Core modules
pub mod config;
pub mod error;
pub mod logs;
pub mod table;

// Loading
pub mod acquire;
pub mod parser;

// Transformation
pub mod transform;

// Output
pub mod sink;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{AcquisitionError, LoadError, PipelineError, ReshapeError, SinkError, Step};

// =============================================================================
// Re-exports - Configuration and data model
// =============================================================================

pub use config::{InputFiles, PipelineConfig};
pub use table::{cell, Cell, Table};

// =============================================================================
// Re-exports - Loaders
// =============================================================================

pub use parser::{
    parse_csv_str, read_csv_file, read_docx_lines, read_indicator_csv, read_spreadsheet, read_table,
};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::{
    inner_join, left_join, load_raw_tables, melt_indicators, merge_dataset, municipality_table,
    normalize_country_metadata, normalize_indicator_metadata, normalize_municipal_stats,
    parse_municipality_lines, refresh, rename_columns, run_pipeline, IdColumn, Municipality,
    RunReport, YearRange,
};

// =============================================================================
// Re-exports - Output and acquisition
// =============================================================================

pub use acquire::{unpack_archive, Credentials, DatasetClient};
pub use sink::{write_csv, write_table};
