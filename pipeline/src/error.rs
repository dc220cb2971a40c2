//! Error types for the statrefresh pipeline.
//!
//! Each stage has its own error enum:
//!
//! - [`AcquisitionError`] - dataset host authentication and download
//! - [`LoadError`] - reading raw CSV, spreadsheet and document inputs
//! - [`ReshapeError`] - wide to long indicator reshape
//! - [`SinkError`] - writing processed CSV files
//! - [`PipelineError`] - top-level run, tagged with the failing [`Step`]
//!
//! Conversion into [`PipelineError`] is automatic via `From`, so `?` works
//! across stage boundaries.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Acquisition Errors
// =============================================================================

/// Errors while fetching the raw dataset archive.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    /// No username/key pair could be resolved.
    #[error("Missing dataset host credentials: {0}")]
    MissingCredentials(String),

    /// Credentials file exists but cannot be parsed.
    #[error("Invalid credentials file {path}: {source}")]
    InvalidCredentials {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Transport-level HTTP failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The host answered with a non-success status.
    #[error("Dataset host returned {status} for '{dataset}': {body}")]
    Status {
        dataset: String,
        status: u16,
        body: String,
    },

    /// Downloaded payload is not a readable zip archive.
    #[error("Invalid dataset archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Archive entry would escape the destination directory.
    #[error("Refusing to extract unsafe archive entry: {0}")]
    UnsafeEntry(String),

    /// Local filesystem error while unpacking.
    #[error("IO error while unpacking: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Load Errors
// =============================================================================

/// Errors while reading a raw input file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// An expected raw file is absent.
    #[error("Missing raw file: {}", path.display())]
    MissingFile { path: PathBuf },

    /// Failed to read the file.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV content.
    #[error("Invalid CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// File has no header row after the skipped preamble.
    #[error("No header row found in {}", path.display())]
    NoHeaders { path: PathBuf },

    /// Spreadsheet cannot be opened or has no sheet.
    #[error("Invalid spreadsheet {}: {message}", path.display())]
    Spreadsheet { path: PathBuf, message: String },

    /// Document archive cannot be read.
    #[error("Invalid document {}: {message}", path.display())]
    Document { path: PathBuf, message: String },
}

// =============================================================================
// Reshape Errors
// =============================================================================

/// Schema errors found while melting the wide indicator table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReshapeError {
    /// A non-identifier column name is not an integer year.
    #[error("Column '{column}' is not a year")]
    MalformedYearColumn { column: String },

    /// One of the four identifier columns is absent.
    #[error("Missing identifier column '{column}'")]
    MissingIdentifierColumn { column: String },

    /// The wide table carries identifier columns only.
    #[error("No year columns to reshape")]
    NoYearColumns,
}

// =============================================================================
// Sink Errors
// =============================================================================

/// Errors while persisting a processed table.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Failed to create or write the target file.
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV serialization failed.
    #[error("Failed to serialize {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Pipeline stage, used to name the failing step in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Prepare,
    Acquire,
    Load,
    Reshape,
    Write,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Prepare => "prepare",
            Step::Acquire => "acquire",
            Step::Load => "load",
            Step::Reshape => "reshape",
            Step::Write => "write",
        };
        f.write_str(name)
    }
}

/// Top-level error returned by [`crate::transform::pipeline::run_pipeline`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Output or raw directory could not be created.
    #[error("Step 'prepare' failed: cannot create {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Step 'acquire' failed: {0}")]
    Acquisition(#[from] AcquisitionError),

    #[error("Step 'load' failed: {0}")]
    Load(#[from] LoadError),

    #[error("Step 'reshape' failed: {0}")]
    Reshape(#[from] ReshapeError),

    #[error("Step 'write' failed: {0}")]
    Sink(#[from] SinkError),
}

impl PipelineError {
    /// The stage that produced this error.
    pub fn step(&self) -> Step {
        match self {
            PipelineError::Directory { .. } => Step::Prepare,
            PipelineError::Acquisition(_) => Step::Acquire,
            PipelineError::Load(_) => Step::Load,
            PipelineError::Reshape(_) => Step::Reshape,
            PipelineError::Sink(_) => Step::Write,
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

pub type AcquisitionResult<T> = Result<T, AcquisitionError>;

pub type LoadResult<T> = Result<T, LoadError>;

pub type ReshapeResult<T> = Result<T, ReshapeError>;

pub type SinkResult<T> = Result<T, SinkError>;

pub type PipelineResult<T> = Result<T, PipelineError>;
