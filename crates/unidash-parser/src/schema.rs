pub const YEAR: &str = "Year";
pub const TERM: &str = "Term";
pub const APPLICATIONS: &str = "Applications";
pub const ADMITTED: &str = "Admitted";
pub const ENROLLED: &str = "Enrolled";
pub const RETENTION_RATE: &str = "Retention Rate (%)";
pub const SATISFACTION: &str = "Student Satisfaction (%)";
pub const ENGINEERING_ENROLLED: &str = "Engineering Enrolled";
pub const BUSINESS_ENROLLED: &str = "Business Enrolled";
pub const ARTS_ENROLLED: &str = "Arts Enrolled";
pub const SCIENCE_ENROLLED: &str = "Science Enrolled";

/// Header names a source table must carry. Matched exactly, case-sensitive.
pub const REQUIRED_COLUMNS: [&str; 11] = [
    YEAR,
    TERM,
    APPLICATIONS,
    ADMITTED,
    ENROLLED,
    RETENTION_RATE,
    SATISFACTION,
    ENGINEERING_ENROLLED,
    BUSINESS_ENROLLED,
    ARTS_ENROLLED,
    SCIENCE_ENROLLED,
];

pub const DEFAULT_DATA_FILE: &str = "university_student_dashboard_data.csv";
