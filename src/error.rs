use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EtlError>;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Unreadable path during glob expansion: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("Warehouse error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No input files match pattern '{pattern}'")]
    NoInputFiles { pattern: String },

    #[error("Schema mismatch in {}: {detail}", path.display())]
    SchemaMismatch { path: PathBuf, detail: String },

    #[error("Required column '{column}' is missing")]
    MissingColumn { column: String },

    #[error("Invalid date '{value}': {source}")]
    InvalidDate {
        value: String,
        source: chrono::ParseError,
    },

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("No surrogate key recorded for natural key '{key}'")]
    UnknownKey { key: String },

    #[error("Duplicate key violation in {table}: {detail}")]
    DuplicateKey { table: String, detail: String },
}
