use std::fmt::Display;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::errors::{LoadError, MissingColumn};
use crate::model::{Department, DepartmentCounts, Record};
use crate::schema::{self, REQUIRED_COLUMNS};

/// Positions of the required headers within the source header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    year: usize,
    term: usize,
    applications: usize,
    admitted: usize,
    enrolled: usize,
    retention_rate: usize,
    satisfaction: usize,
    departments: [usize; 4],
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> Result<Self, LoadError> {
        let position = |name: &str| headers.iter().position(|header| header == name);

        let missing: Vec<MissingColumn> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|name| position(*name).is_none())
            .map(MissingColumn)
            .collect();
        if !missing.is_empty() {
            return Err(LoadError::MissingColumns { missing });
        }

        // Every lookup below succeeds once the missing check passed.
        let at = |name: &str| position(name).unwrap_or_default();
        Ok(Self {
            year: at(schema::YEAR),
            term: at(schema::TERM),
            applications: at(schema::APPLICATIONS),
            admitted: at(schema::ADMITTED),
            enrolled: at(schema::ENROLLED),
            retention_rate: at(schema::RETENTION_RATE),
            satisfaction: at(schema::SATISFACTION),
            departments: Department::ALL.map(|dept| at(dept.column_name())),
        })
    }

    fn department(&self, department: Department) -> usize {
        self.departments[department.index()]
    }
}

/// Reads the raw bytes of a source file.
pub fn read_source(path: &Path) -> Result<Vec<u8>, LoadError> {
    fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads every record from the file at `path`.
pub fn load_path(path: &Path) -> Result<Vec<Record>, LoadError> {
    let bytes = read_source(path)?;
    let records = load_reader(bytes.as_slice())?;
    debug!(path = %path.display(), rows = records.len(), "Parsed source file");
    Ok(records)
}

/// Loads every record from a comma-delimited table with a header row.
///
/// The header must contain all of [`REQUIRED_COLUMNS`], matched exactly;
/// extra columns are ignored and column order is free. Data cells are
/// trimmed, header names are not. Any malformed row fails the whole load.
pub fn load_reader<R: Read>(reader: R) -> Result<Vec<Record>, LoadError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::Fields)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let columns = ColumnIndex::resolve(&headers)?;

    let mut records = Vec::new();
    for (row_index, row) in csv_reader.records().enumerate() {
        let row = row?;
        records.push(parse_row(&row, &columns, row_index + 1)?);
    }

    Ok(records)
}

fn parse_row(row: &StringRecord, columns: &ColumnIndex, line: usize) -> Result<Record, LoadError> {
    let mut dept_enrolled = DepartmentCounts::default();
    for dept in Department::ALL {
        let value = parse_field(row, columns.department(dept), dept.column_name(), line)?;
        dept_enrolled.set(dept, value);
    }

    let term = cell(row, columns.term, schema::TERM, line)?;
    if term.is_empty() {
        return Err(LoadError::DataRow {
            line,
            column: schema::TERM,
            message: "empty value".to_string(),
        });
    }

    Ok(Record {
        year: parse_field(row, columns.year, schema::YEAR, line)?,
        term: term.to_string(),
        applications: parse_field(row, columns.applications, schema::APPLICATIONS, line)?,
        admitted: parse_field(row, columns.admitted, schema::ADMITTED, line)?,
        enrolled: parse_field(row, columns.enrolled, schema::ENROLLED, line)?,
        retention_rate: parse_rate(row, columns.retention_rate, schema::RETENTION_RATE, line)?,
        satisfaction: parse_rate(row, columns.satisfaction, schema::SATISFACTION, line)?,
        dept_enrolled,
    })
}

fn cell<'r>(
    row: &'r StringRecord,
    index: usize,
    column: &'static str,
    line: usize,
) -> Result<&'r str, LoadError> {
    row.get(index).ok_or_else(|| LoadError::DataRow {
        line,
        column,
        message: "missing value".to_string(),
    })
}

fn parse_field<T>(
    row: &StringRecord,
    index: usize,
    column: &'static str,
    line: usize,
) -> Result<T, LoadError>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = cell(row, index, column, line)?;
    raw.parse::<T>().map_err(|err| LoadError::DataRow {
        line,
        column,
        message: format!("'{raw}': {err}"),
    })
}

/// Percentages accept any finite float; `NaN` and infinities are rejected.
fn parse_rate(
    row: &StringRecord,
    index: usize,
    column: &'static str,
    line: usize,
) -> Result<f64, LoadError> {
    let value: f64 = parse_field(row, index, column, line)?;
    if !value.is_finite() {
        return Err(LoadError::DataRow {
            line,
            column,
            message: format!("'{value}': not a finite number"),
        });
    }
    Ok(value)
}
