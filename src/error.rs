//! Error types for Family Report.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading family records from a data source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The data source cannot supply a model.
    #[error("no model available at '{path}'")]
    MissingInput { path: PathBuf },

    /// Failed to read the input file from disk.
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The JSON snapshot does not match the expected layout.
    #[error("invalid snapshot: {source}")]
    InvalidSnapshot {
        #[from]
        source: serde_json::Error,
    },

    /// The STEP format is invalid or malformed.
    #[error("invalid STEP format: {message}")]
    InvalidStep { message: String },

    /// A system family type has no family-name key and the policy is `Fail`.
    #[error("system family type '{type_name}' has no family name")]
    MissingFamilyName { type_name: String },
}

/// Errors that can occur when writing or reading back a report.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failed to create the output file.
    #[error("failed to create file '{path}': {source}")]
    FileCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write data to the file.
    #[error("failed to write data: {message}")]
    Write { message: String },

    /// The XML writer or reader failed.
    #[error("XML error: {source}")]
    Xml {
        #[from]
        source: quick_xml::Error,
    },

    /// Failed to write CSV data.
    #[error("CSV write failed: {source}")]
    CsvWrite {
        #[from]
        source: csv::Error,
    },

    /// A report read back from XML does not have the expected shape.
    #[error("malformed report: {message}")]
    Malformed { message: String },
}

/// Errors in report configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A label cannot be used as an XML element name.
    #[error("label '{field}' is not a valid element name: '{value}'")]
    InvalidLabel { field: &'static str, value: String },

    #[error("comment must not contain '--'")]
    InvalidComment,
}

/// Any failure of a single report run.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
