//! Error types for pyr-core

use thiserror::Error;

/// Core error type for pyr
#[derive(Error, Debug)]
pub enum CoreError {
    /// P001: Configuration file not found
    #[error("[P001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// P002: Invalid configuration value
    #[error("[P002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// P003: Age-group label outside the canonical mapping
    #[error("[P003] Unknown age group '{value}'")]
    UnknownAgeGroup { value: String },

    /// P004: Sex label outside the canonical mapping
    #[error("[P004] Unknown sex '{value}' (expected male, female or persons)")]
    UnknownSex { value: String },

    /// P005: Required column missing from an input file
    #[error("[P005] Missing column '{column}' in {path}")]
    MissingColumn { column: String, path: String },

    /// P006: Cell could not be parsed as a number
    #[error("[P006] Invalid number '{value}' in column '{column}' at line {line}")]
    InvalidNumber {
        column: String,
        value: String,
        line: u64,
    },

    /// P007: Cell could not be parsed as a year
    #[error("[P007] Invalid year '{value}' at line {line}")]
    InvalidYear { value: String, line: u64 },

    /// P008: Two rows share the same (Year, AgeGroup, Sex) key
    #[error("[P008] Duplicate row for year {year}, age group '{age_group}', sex '{sex}'")]
    DuplicateKey {
        year: i32,
        age_group: String,
        sex: String,
    },

    /// P009: Row width does not match the table's column list
    #[error("[P009] Row has {found} values but the table has {expected} metric columns")]
    RowWidthMismatch { expected: usize, found: usize },

    /// P010: Selected metric column is absent from the table
    #[error("[P010] Metric '{column}' not found (available: {available})")]
    MetricNotFound { column: String, available: String },

    /// P011: Unrecognised selector label
    #[error("[P011] Invalid {kind} '{value}'")]
    InvalidSelection { kind: String, value: String },

    /// P012: IO error with file path context
    #[error("[P012] Failed to access '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// P013: CSV read/write error
    #[error("[P013] CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// P014: IO error
    #[error("[P014] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// P015: Config YAML parse error
    #[error("[P015] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
