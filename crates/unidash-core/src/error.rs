// crates/unidash-core/src/error.rs

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("invalid year '{0}'")]
    InvalidYear(String),

    #[error("{0}")]
    InvalidDepartment(String),

    #[error("{0}")]
    InvalidMetric(String),

    #[error("unknown export format '{0}' (expected csv or parquet)")]
    InvalidFormat(String),
}
