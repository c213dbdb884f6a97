use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use unidash_parser::{load_reader, read_source, LoadError, Record};

/// The loaded dataset, shared read-only for the rest of the process.
///
/// Cloning is cheap: the records sit behind an `Arc`.
#[derive(Debug, Clone)]
pub struct DatasetSnapshot {
    records: Arc<[Record]>,
    source: Option<PathBuf>,
    source_hash: Option<String>,
    loaded_at: DateTime<Utc>,
    years: Vec<i32>,
    terms: Vec<String>,
}

/// Serializable description of a snapshot, without its rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotInfo {
    pub source: Option<String>,
    pub source_hash: Option<String>,
    pub loaded_at: DateTime<Utc>,
    pub records: usize,
    pub years: Vec<i32>,
    pub terms: Vec<String>,
}

impl DatasetSnapshot {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let bytes = read_source(path)?;
        let source_hash = blake3::hash(&bytes).to_hex().to_string();
        let records = load_reader(bytes.as_slice())?;

        let snapshot = Self::build(records, Some(path.to_path_buf()), Some(source_hash));
        info!(
            path = %path.display(),
            records = snapshot.len(),
            years = snapshot.years.len(),
            hash = snapshot.source_hash.as_deref().unwrap_or_default(),
            "Loaded dataset"
        );
        Ok(snapshot)
    }

    /// Wraps records that did not come from a file.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self::build(records, None, None)
    }

    fn build(records: Vec<Record>, source: Option<PathBuf>, source_hash: Option<String>) -> Self {
        let years = distinct_years(&records);
        let terms = distinct_terms(&records);
        Self {
            records: records.into(),
            source,
            source_hash,
            loaded_at: Utc::now(),
            years,
            terms,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct years present, ascending.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Distinct terms present, in order of first appearance.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn source_hash(&self) -> Option<&str> {
        self.source_hash.as_deref()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn info(&self) -> SnapshotInfo {
        SnapshotInfo {
            source: self.source.as_ref().map(|path| path.display().to_string()),
            source_hash: self.source_hash.clone(),
            loaded_at: self.loaded_at,
            records: self.len(),
            years: self.years.clone(),
            terms: self.terms.clone(),
        }
    }
}

pub fn distinct_years(records: &[Record]) -> Vec<i32> {
    records
        .iter()
        .map(|record| record.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn distinct_terms(records: &[Record]) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for record in records {
        if !terms.iter().any(|term| *term == record.term) {
            terms.push(record.term.clone());
        }
    }
    terms
}
