use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while reading the employee table.
///
/// All variants are fatal at startup: the dashboard has nothing to show
/// without a dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data source not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("row {row}, column '{column}': {message}")]
    InvalidValue {
        row: usize,
        column: String,
        message: String,
    },

    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("arrow: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("{0}")]
    Malformed(String),
}

impl LoadError {
    pub(crate) fn invalid(row: usize, column: &str, message: impl Into<String>) -> Self {
        LoadError::InvalidValue {
            row,
            column: column.to_string(),
            message: message.into(),
        }
    }
}
