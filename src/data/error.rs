use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while turning a file into a
/// [`MeasurementTable`](super::model::MeasurementTable).
#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("unreadable column data: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("missing column '{0}'")]
    MissingColumn(&'static str),

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}

pub type Result<T> = std::result::Result<T, DataError>;
