use std::sync::Arc;

use unidash_core::{DatasetSnapshot, Department, Selection, SelectionError};

use crate::api::routes::SelectionQuery;

/// Router state: one immutable snapshot shared by every request.
#[derive(Debug, Clone)]
pub struct AppState {
    snapshot: Arc<DatasetSnapshot>,
    default_departments: Option<Vec<Department>>,
}

impl AppState {
    pub fn new(snapshot: DatasetSnapshot) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            default_departments: None,
        }
    }

    pub fn with_default_departments(mut self, departments: Option<Vec<Department>>) -> Self {
        self.default_departments = departments;
        self
    }

    pub fn snapshot(&self) -> &DatasetSnapshot {
        &self.snapshot
    }

    /// Builds the request's selection, falling back to the configured
    /// department breakdown when the query does not name one.
    pub fn selection(&self, query: &SelectionQuery) -> Result<Selection, SelectionError> {
        let mut selection = Selection::parse_lists(
            query.years.as_deref(),
            query.terms.as_deref(),
            query.departments.as_deref(),
        )?;

        if selection.departments.is_none() {
            if let Some(defaults) = &self.default_departments {
                selection = selection.with_departments(defaults.iter().copied());
            }
        }
        Ok(selection)
    }
}
