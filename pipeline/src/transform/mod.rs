//! Transformation module.
//!
//! - Reshape: wide indicator table to long form
//! - Normalize: shared key vocabulary and municipality lines
//! - Join: inner and left joins on key columns
//! - Pipeline: end-to-end refresh

pub mod join;
pub mod normalize;
pub mod pipeline;
pub mod reshape;

pub use join::{inner_join, left_join, merge, JoinKind};
pub use normalize::{
    municipality_table, normalize_country_metadata, normalize_indicator_metadata,
    normalize_municipal_stats, parse_municipality_lines, rename_columns, Municipality,
};
pub use pipeline::{load_raw_tables, merge_dataset, refresh, run_pipeline, OutputSummary, RawTables, RunReport};
pub use reshape::{melt_indicators, IdColumn, YearRange};
