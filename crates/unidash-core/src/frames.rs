use std::fmt;
use std::path::Path;
use std::str::FromStr;

use polars::prelude::*;
use tempfile::NamedTempFile;
use tracing::info;
use unidash_parser::{schema, Department, Metric, Record};

use crate::aggregate::{mean_by_year, totals, Totals, YearMean};
use crate::error::{ExportError, SelectionError};
use crate::reshape::{
    by_term_enrollment, enrollment_by_department, satisfaction_by_term, DepartmentEnrollment,
    TermEnrollment, TermSatisfaction,
};
use crate::selection::Selection;
use crate::snapshot::DatasetSnapshot;

pub const DEPARTMENT: &str = "Department";
pub const ENROLLMENT: &str = "Enrollment";

/// Filtered records with the source table's column names, so an export
/// can be loaded again.
pub fn records_frame(records: &[Record]) -> PolarsResult<DataFrame> {
    let mut columns: Vec<Column> = vec![
        Series::new(schema::YEAR.into(), records.iter().map(|r| r.year).collect::<Vec<_>>()).into(),
        Series::new(
            schema::TERM.into(),
            records.iter().map(|r| r.term.as_str()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            schema::APPLICATIONS.into(),
            records.iter().map(|r| r.applications).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            schema::ADMITTED.into(),
            records.iter().map(|r| r.admitted).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            schema::ENROLLED.into(),
            records.iter().map(|r| r.enrolled).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            schema::RETENTION_RATE.into(),
            records.iter().map(|r| r.retention_rate).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            schema::SATISFACTION.into(),
            records.iter().map(|r| r.satisfaction).collect::<Vec<_>>(),
        )
        .into(),
    ];

    for dept in Department::ALL {
        let values: Vec<u64> = records.iter().map(|r| r.department_enrolled(dept)).collect();
        columns.push(Series::new(dept.column_name().into(), values).into());
    }

    DataFrame::new(columns)
}

pub fn totals_frame(totals: &Totals) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        Series::new(schema::APPLICATIONS.into(), vec![totals.applications]).into(),
        Series::new(schema::ADMITTED.into(), vec![totals.admitted]).into(),
        Series::new(schema::ENROLLED.into(), vec![totals.enrolled]).into(),
    ])
}

/// Two columns: `Year` and the metric's source column name.
pub fn year_means_frame(rows: &[YearMean], metric: Metric) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        Series::new(schema::YEAR.into(), rows.iter().map(|r| r.year).collect::<Vec<_>>()).into(),
        Series::new(
            metric.column_name().into(),
            rows.iter().map(|r| r.mean).collect::<Vec<_>>(),
        )
        .into(),
    ])
}

pub fn department_frame(rows: &[DepartmentEnrollment]) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        Series::new(schema::YEAR.into(), rows.iter().map(|r| r.year).collect::<Vec<_>>()).into(),
        Series::new(
            schema::TERM.into(),
            rows.iter().map(|r| r.term.as_str()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            DEPARTMENT.into(),
            rows.iter().map(|r| r.department.as_str()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            ENROLLMENT.into(),
            rows.iter().map(|r| r.enrollment).collect::<Vec<_>>(),
        )
        .into(),
    ])
}

pub fn term_frame(rows: &[TermEnrollment]) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        Series::new(schema::YEAR.into(), rows.iter().map(|r| r.year).collect::<Vec<_>>()).into(),
        Series::new(
            schema::TERM.into(),
            rows.iter().map(|r| r.term.as_str()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            schema::ENROLLED.into(),
            rows.iter().map(|r| r.enrolled).collect::<Vec<_>>(),
        )
        .into(),
    ])
}

pub fn satisfaction_frame(rows: &[TermSatisfaction]) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        Series::new(schema::YEAR.into(), rows.iter().map(|r| r.year).collect::<Vec<_>>()).into(),
        Series::new(
            schema::TERM.into(),
            rows.iter().map(|r| r.term.as_str()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            schema::SATISFACTION.into(),
            rows.iter().map(|r| r.satisfaction).collect::<Vec<_>>(),
        )
        .into(),
    ])
}

/// A view that can be materialized as a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Records,
    Totals,
    Retention,
    Satisfaction,
    Departments,
    Terms,
}

impl View {
    pub const ALL: [View; 6] = [
        View::Records,
        View::Totals,
        View::Retention,
        View::Satisfaction,
        View::Departments,
        View::Terms,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            View::Records => "records",
            View::Totals => "totals",
            View::Retention => "retention",
            View::Satisfaction => "satisfaction",
            View::Departments => "departments",
            View::Terms => "terms",
        }
    }

    pub fn frame(&self, snapshot: &DatasetSnapshot, selection: &Selection) -> PolarsResult<DataFrame> {
        let filtered = selection.apply(snapshot.records());
        match self {
            View::Records => records_frame(&filtered),
            View::Totals => totals_frame(&totals(&filtered)),
            View::Retention => year_means_frame(
                &mean_by_year(&filtered, Metric::RetentionRate),
                Metric::RetentionRate,
            ),
            View::Satisfaction => satisfaction_frame(&satisfaction_by_term(&filtered)),
            View::Departments => {
                department_frame(&enrollment_by_department(&filtered, selection.departments()))
            }
            View::Terms => term_frame(&by_term_enrollment(&filtered)),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        View::ALL
            .into_iter()
            .find(|view| view.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("unknown view '{trimmed}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Parquet,
}

impl ExportFormat {
    /// Guesses the format from a file extension, defaulting to CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("parquet") || ext.eq_ignore_ascii_case("pq") => {
                ExportFormat::Parquet
            }
            _ => ExportFormat::Csv,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Parquet => "parquet",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "parquet" | "pq" => Ok(ExportFormat::Parquet),
            other => Err(SelectionError::InvalidFormat(other.to_string())),
        }
    }
}

/// Writes `df` to `path`, replacing any existing file.
///
/// The frame is written to a temporary file beside `path` and renamed into
/// place, so a failed write leaves `path` untouched.
pub fn export_frame(df: &mut DataFrame, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
    let io_error = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir).map_err(io_error)?;

    match format {
        ExportFormat::Csv => {
            CsvWriter::new(staged.as_file_mut())
                .include_header(true)
                .finish(df)?;
        }
        ExportFormat::Parquet => {
            ParquetWriter::new(staged.as_file_mut()).finish(df)?;
        }
    }
    staged.persist(path).map_err(|err| io_error(err.error))?;

    info!(
        path = %path.display(),
        format = format.as_str(),
        rows = df.height(),
        "Exported frame"
    );
    Ok(())
}
