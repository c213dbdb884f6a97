use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::schema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Department {
    Engineering,
    Business,
    Arts,
    Science,
}

impl Department {
    pub const ALL: [Department; 4] = [
        Department::Engineering,
        Department::Business,
        Department::Arts,
        Department::Science,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Engineering => "Engineering",
            Department::Business => "Business",
            Department::Arts => "Arts",
            Department::Science => "Science",
        }
    }

    /// Source header holding this department's enrollment count.
    pub fn column_name(&self) -> &'static str {
        match self {
            Department::Engineering => schema::ENGINEERING_ENROLLED,
            Department::Business => schema::BUSINESS_ENROLLED,
            Department::Arts => schema::ARTS_ENROLLED,
            Department::Science => schema::SCIENCE_ENROLLED,
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Department::Engineering => 0,
            Department::Business => 1,
            Department::Arts => 2,
            Department::Science => 3,
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Department {
    type Error = String;

    /// Accepts the label (`"Arts"`) or the source column (`"Arts Enrolled"`),
    /// ignoring case and surrounding whitespace.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        Department::ALL
            .into_iter()
            .find(|dept| {
                dept.as_str().eq_ignore_ascii_case(trimmed)
                    || dept.column_name().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| format!("unknown department '{trimmed}'"))
    }
}

impl FromStr for Department {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Department::try_from(s)
    }
}

/// Per-department enrollment counts, one slot per [`Department`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentCounts([u64; 4]);

impl DepartmentCounts {
    pub fn new(engineering: u64, business: u64, arts: u64, science: u64) -> Self {
        Self([engineering, business, arts, science])
    }

    pub fn get(&self, department: Department) -> u64 {
        self.0[department.index()]
    }

    pub fn set(&mut self, department: Department, value: u64) {
        self.0[department.index()] = value;
    }
}

/// One (year, term) observation from the source table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub year: i32,
    pub term: String,
    pub applications: u64,
    pub admitted: u64,
    pub enrolled: u64,
    pub retention_rate: f64,
    pub satisfaction: f64,
    pub dept_enrolled: DepartmentCounts,
}

impl Record {
    pub fn department_enrolled(&self, department: Department) -> u64 {
        self.dept_enrolled.get(department)
    }
}

/// A numeric column of [`Record`] that can be averaged or plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Applications,
    Admitted,
    Enrolled,
    RetentionRate,
    Satisfaction,
    DepartmentEnrolled(Department),
}

impl Metric {
    pub fn all() -> Vec<Metric> {
        let mut metrics = vec![
            Metric::Applications,
            Metric::Admitted,
            Metric::Enrolled,
            Metric::RetentionRate,
            Metric::Satisfaction,
        ];
        metrics.extend(Department::ALL.into_iter().map(Metric::DepartmentEnrolled));
        metrics
    }

    pub fn column_name(&self) -> &'static str {
        match self {
            Metric::Applications => schema::APPLICATIONS,
            Metric::Admitted => schema::ADMITTED,
            Metric::Enrolled => schema::ENROLLED,
            Metric::RetentionRate => schema::RETENTION_RATE,
            Metric::Satisfaction => schema::SATISFACTION,
            Metric::DepartmentEnrolled(dept) => dept.column_name(),
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Metric::Applications => "applications",
            Metric::Admitted => "admitted",
            Metric::Enrolled => "enrolled",
            Metric::RetentionRate => "retention_rate",
            Metric::Satisfaction => "satisfaction",
            Metric::DepartmentEnrolled(Department::Engineering) => "engineering_enrolled",
            Metric::DepartmentEnrolled(Department::Business) => "business_enrolled",
            Metric::DepartmentEnrolled(Department::Arts) => "arts_enrolled",
            Metric::DepartmentEnrolled(Department::Science) => "science_enrolled",
        }
    }

    pub fn value(&self, record: &Record) -> f64 {
        match self {
            Metric::Applications => record.applications as f64,
            Metric::Admitted => record.admitted as f64,
            Metric::Enrolled => record.enrolled as f64,
            Metric::RetentionRate => record.retention_rate,
            Metric::Satisfaction => record.satisfaction,
            Metric::DepartmentEnrolled(dept) => record.department_enrolled(*dept) as f64,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl TryFrom<&str> for Metric {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        Metric::all()
            .into_iter()
            .find(|metric| metric.key().eq_ignore_ascii_case(trimmed) || metric.column_name() == trimmed)
            .ok_or_else(|| format!("unknown metric '{trimmed}'"))
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::try_from(s)
    }
}
