pub mod aggregate;
pub mod dashboard;
pub mod error;
pub mod frames;
pub mod reshape;
pub mod selection;
pub mod snapshot;

pub use aggregate::{mean_by_year, totals, Totals, YearMean};
pub use dashboard::Dashboard;
pub use error::{ExportError, SelectionError};
pub use frames::{export_frame, ExportFormat, View};
pub use reshape::{
    by_term_enrollment, enrollment_by_department, satisfaction_by_term, DepartmentEnrollment,
    TermEnrollment, TermSatisfaction,
};
pub use selection::{filter, Selection};
pub use snapshot::{DatasetSnapshot, SnapshotInfo};

pub use unidash_parser::{Department, LoadError, Metric, Record};
