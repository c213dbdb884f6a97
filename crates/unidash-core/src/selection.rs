use std::collections::BTreeSet;

use serde::Serialize;
use unidash_parser::{Department, Record};

use crate::error::SelectionError;
use crate::snapshot::{distinct_terms, distinct_years};

/// Keeps records whose year is in `years` and whose term is in `terms`.
///
/// Input order is preserved. An empty set on either axis excludes every
/// record.
pub fn filter(records: &[Record], years: &BTreeSet<i32>, terms: &BTreeSet<String>) -> Vec<Record> {
    records
        .iter()
        .filter(|record| years.contains(&record.year) && terms.contains(&record.term))
        .cloned()
        .collect()
}

/// A user's filter choice. `None` on an axis means every value present in
/// the data; `Some` of an empty set means nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub years: Option<BTreeSet<i32>>,
    pub terms: Option<BTreeSet<String>>,
    pub departments: Option<Vec<Department>>,
}

impl Selection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new<Y, T, D>(years: Y, terms: T, departments: D) -> Self
    where
        Y: IntoIterator<Item = i32>,
        T: IntoIterator,
        T::Item: Into<String>,
        D: IntoIterator<Item = Department>,
    {
        Self {
            years: Some(years.into_iter().collect()),
            terms: Some(terms.into_iter().map(Into::into).collect()),
            departments: Some(dedup_departments(departments)),
        }
    }

    pub fn with_years(mut self, years: impl IntoIterator<Item = i32>) -> Self {
        self.years = Some(years.into_iter().collect());
        self
    }

    pub fn with_terms<T>(mut self, terms: T) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
    {
        self.terms = Some(terms.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_departments(mut self, departments: impl IntoIterator<Item = Department>) -> Self {
        self.departments = Some(dedup_departments(departments));
        self
    }

    /// Builds a selection from comma-separated lists, as typed on a command
    /// line or in a query string. A missing list selects everything; an
    /// empty one selects nothing.
    pub fn parse_lists(
        years: Option<&str>,
        terms: Option<&str>,
        departments: Option<&str>,
    ) -> Result<Self, SelectionError> {
        let years = years
            .map(|list| {
                split_list(list)
                    .map(|item| {
                        item.parse::<i32>()
                            .map_err(|_| SelectionError::InvalidYear(item.to_string()))
                    })
                    .collect::<Result<BTreeSet<_>, _>>()
            })
            .transpose()?;

        let terms = terms.map(|list| split_list(list).map(str::to_string).collect());

        let departments = departments
            .map(|list| {
                split_list(list)
                    .map(|item| Department::try_from(item).map_err(SelectionError::InvalidDepartment))
                    .collect::<Result<Vec<_>, _>>()
                    .map(dedup_departments)
            })
            .transpose()?;

        Ok(Self {
            years,
            terms,
            departments,
        })
    }

    /// Departments to break enrollment down by, defaulting to all four.
    pub fn departments(&self) -> &[Department] {
        self.departments.as_deref().unwrap_or(&Department::ALL)
    }

    /// Filters `records`, resolving unset axes to the values present in
    /// `records` itself.
    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        let years = match &self.years {
            Some(years) => years.clone(),
            None => distinct_years(records).into_iter().collect(),
        };
        let terms = match &self.terms {
            Some(terms) => terms.clone(),
            None => distinct_terms(records).into_iter().collect(),
        };
        filter(records, &years, &terms)
    }
}

fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|item| !item.is_empty())
}

fn dedup_departments(departments: impl IntoIterator<Item = Department>) -> Vec<Department> {
    let mut unique = Vec::new();
    for dept in departments {
        if !unique.contains(&dept) {
            unique.push(dept);
        }
    }
    unique
}
