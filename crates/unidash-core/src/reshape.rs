use serde::{Deserialize, Serialize};
use unidash_parser::{Department, Record};

/// One (record, department) cell of the long-format enrollment table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentEnrollment {
    pub year: i32,
    pub term: String,
    pub department: Department,
    pub enrollment: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermEnrollment {
    pub year: i32,
    pub term: String,
    pub enrolled: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermSatisfaction {
    pub year: i32,
    pub term: String,
    pub satisfaction: f64,
}

/// Unpivots the per-department enrollment columns into one row per
/// (record, department), record-major in input order. Yields
/// `records.len() * departments.len()` rows.
pub fn enrollment_by_department(
    records: &[Record],
    departments: &[Department],
) -> Vec<DepartmentEnrollment> {
    records
        .iter()
        .flat_map(|record| {
            departments.iter().map(move |&department| DepartmentEnrollment {
                year: record.year,
                term: record.term.clone(),
                department,
                enrollment: record.department_enrolled(department),
            })
        })
        .collect()
}

pub fn by_term_enrollment(records: &[Record]) -> Vec<TermEnrollment> {
    records
        .iter()
        .map(|record| TermEnrollment {
            year: record.year,
            term: record.term.clone(),
            enrolled: record.enrolled,
        })
        .collect()
}

pub fn satisfaction_by_term(records: &[Record]) -> Vec<TermSatisfaction> {
    records
        .iter()
        .map(|record| TermSatisfaction {
            year: record.year,
            term: record.term.clone(),
            satisfaction: record.satisfaction,
        })
        .collect()
}
