use serde::Serialize;
use unidash_parser::{Department, Metric};

use crate::aggregate::{mean_by_year, totals, Totals, YearMean};
use crate::reshape::{
    by_term_enrollment, enrollment_by_department, satisfaction_by_term, DepartmentEnrollment,
    TermEnrollment, TermSatisfaction,
};
use crate::selection::Selection;
use crate::snapshot::DatasetSnapshot;

/// Every view a dashboard page shows, computed over one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub record_count: usize,
    pub departments: Vec<Department>,
    pub totals: Totals,
    pub retention_by_year: Vec<YearMean>,
    pub satisfaction_by_year: Vec<YearMean>,
    pub satisfaction_by_term: Vec<TermSatisfaction>,
    pub enrollment_by_department: Vec<DepartmentEnrollment>,
    pub enrollment_by_term: Vec<TermEnrollment>,
}

impl Dashboard {
    pub fn build(snapshot: &DatasetSnapshot, selection: &Selection) -> Self {
        let filtered = selection.apply(snapshot.records());
        let departments = selection.departments().to_vec();

        Self {
            record_count: filtered.len(),
            totals: totals(&filtered),
            retention_by_year: mean_by_year(&filtered, Metric::RetentionRate),
            satisfaction_by_year: mean_by_year(&filtered, Metric::Satisfaction),
            satisfaction_by_term: satisfaction_by_term(&filtered),
            enrollment_by_department: enrollment_by_department(&filtered, &departments),
            enrollment_by_term: by_term_enrollment(&filtered),
            departments,
        }
    }
}
