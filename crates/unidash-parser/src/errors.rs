use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// A required header that was not found in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingColumn(pub &'static str);

impl fmt::Display for MissingColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.0)
    }
}

/// Every way a load can fail. Any of these aborts the whole load; no
/// records are returned alongside an error.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    #[error("missing required columns: {}", format_missing(missing))]
    MissingColumns { missing: Vec<MissingColumn> },

    #[error("data line {line} column '{column}' invalid: {message}")]
    DataRow {
        line: usize,
        column: &'static str,
        message: String,
    },
}

impl From<csv::Error> for LoadError {
    fn from(source: csv::Error) -> Self {
        LoadError::Csv { source }
    }
}

impl LoadError {
    pub fn missing_columns(&self) -> &[MissingColumn] {
        match self {
            LoadError::MissingColumns { missing } => missing,
            _ => &[],
        }
    }
}

fn format_missing(missing: &[MissingColumn]) -> String {
    missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
