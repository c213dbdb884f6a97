use std::path::PathBuf;

use crate::errors::LoadError;
use crate::model::{Department, Metric, Record};
use crate::schema::{self, REQUIRED_COLUMNS};
use crate::{load_path, load_reader};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

fn header() -> String {
    REQUIRED_COLUMNS.join(",")
}

#[test]
fn loads_dashboard_fixture() {
    let records = load_path(&fixture_path("university_student_dashboard_data.csv"))
        .expect("fixture load failed");

    assert_eq!(records.len(), 8);

    let first = &records[0];
    assert_eq!(first.year, 2015);
    assert_eq!(first.term, "Spring");
    assert_eq!(first.applications, 2500);
    assert_eq!(first.admitted, 1500);
    assert_eq!(first.enrolled, 600);
    assert_eq!(first.retention_rate, 85.0);
    assert_eq!(first.satisfaction, 78.0);
    assert_eq!(first.department_enrolled(Department::Engineering), 200);
    assert_eq!(first.department_enrolled(Department::Science), 125);

    let last = records.last().expect("fixture has rows");
    assert_eq!((last.year, last.term.as_str()), (2018, "Fall"));
}

#[test]
fn missing_admitted_column_is_fatal() {
    let err = load_path(&fixture_path("missing_admitted.csv")).unwrap_err();

    assert!(matches!(err, LoadError::MissingColumns { .. }));
    let missing: Vec<&str> = err.missing_columns().iter().map(|col| col.0).collect();
    assert_eq!(missing, vec![schema::ADMITTED]);
}

#[test]
fn reports_every_missing_column() {
    let content = "Year,Term\n2021,Fall\n";
    let err = load_reader(content.as_bytes()).unwrap_err();

    assert_eq!(err.missing_columns().len(), REQUIRED_COLUMNS.len() - 2);
    assert!(err.to_string().contains("'Retention Rate (%)'"));
}

#[test]
fn header_match_is_case_sensitive() {
    let content = header().replace("Year", "year") + "\n";
    let err = load_reader(content.as_bytes()).unwrap_err();

    let missing: Vec<&str> = err.missing_columns().iter().map(|col| col.0).collect();
    assert_eq!(missing, vec![schema::YEAR]);
}

#[test]
fn header_with_padding_is_missing_column() {
    let content = format!(
        "{}\n2021,Fall,100,50,40,80.0,90.0,10,10,10,10\n",
        header().replace("Year", " Year ")
    );
    let err = load_reader(content.as_bytes()).unwrap_err();

    let missing: Vec<&str> = err.missing_columns().iter().map(|col| col.0).collect();
    assert_eq!(missing, vec![schema::YEAR]);
}

#[test]
fn missing_file_is_io_error() {
    let err = load_path(&fixture_path("does_not_exist.csv")).unwrap_err();

    match err {
        LoadError::Io { path, .. } => assert!(path.ends_with("does_not_exist.csv")),
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn accepts_reordered_and_extra_columns() {
    let records = load_path(&fixture_path("reordered_extra_columns.csv"))
        .expect("reordered load failed");

    assert_eq!(records.len(), 2);
    let fall = &records[0];
    assert_eq!(fall.year, 2021);
    assert_eq!(fall.term, "Fall");
    assert_eq!(fall.applications, 100);
    assert_eq!(fall.admitted, 50);
    assert_eq!(fall.enrolled, 40);
    assert_eq!(fall.department_enrolled(Department::Engineering), 1);
    assert_eq!(fall.department_enrolled(Department::Business), 2);
    assert_eq!(fall.department_enrolled(Department::Arts), 3);
    assert_eq!(fall.department_enrolled(Department::Science), 4);
}

#[test]
fn unparseable_cell_fails_whole_load() {
    let content = format!(
        "{}\n2021,Fall,100,50,40,80.0,90.0,10,10,10,10\n2021,Spring,lots,100,80,85.0,92.0,20,20,20,20\n",
        header()
    );
    let err = load_reader(content.as_bytes()).unwrap_err();

    match err {
        LoadError::DataRow { line, column, .. } => {
            assert_eq!(line, 2);
            assert_eq!(column, schema::APPLICATIONS);
        }
        other => panic!("expected DataRow error, got {other:?}"),
    }
}

#[test]
fn negative_count_is_rejected() {
    let content = format!("{}\n2021,Fall,-5,50,40,80.0,90.0,10,10,10,10\n", header());
    let err = load_reader(content.as_bytes()).unwrap_err();

    assert!(matches!(
        err,
        LoadError::DataRow {
            column: schema::APPLICATIONS,
            ..
        }
    ));
}

#[test]
fn non_finite_rates_are_rejected() {
    for (retention, satisfaction, column) in [
        ("NaN", "90.0", schema::RETENTION_RATE),
        ("80.0", "inf", schema::SATISFACTION),
        ("-inf", "90.0", schema::RETENTION_RATE),
    ] {
        let content = format!(
            "{}\n2021,Fall,100,50,40,{retention},{satisfaction},10,10,10,10\n",
            header()
        );
        let err = load_reader(content.as_bytes()).unwrap_err();

        match err {
            LoadError::DataRow {
                line,
                column: reported,
                message,
            } => {
                assert_eq!(line, 1);
                assert_eq!(reported, column);
                assert!(message.contains("not a finite number"), "{message}");
            }
            other => panic!("expected DataRow error, got {other:?}"),
        }
    }
}

#[test]
fn short_row_is_csv_error() {
    let content = format!("{}\n2021,Fall,100\n", header());
    let err = load_reader(content.as_bytes()).unwrap_err();

    assert!(matches!(err, LoadError::Csv { .. }));
}

#[test]
fn domain_violations_are_not_validated() {
    let content = format!("{}\n2021,Fall,10,50,90,80.0,90.0,1,1,1,1\n", header());
    let records = load_reader(content.as_bytes()).expect("load should not validate domain rules");

    assert_eq!(records.len(), 1);
    assert!(records[0].admitted > records[0].applications);
}

#[test]
fn header_only_file_loads_empty() {
    let content = format!("{}\n", header());
    let records = load_reader(content.as_bytes()).expect("header-only load failed");

    assert!(records.is_empty());
}

#[test]
fn cells_are_trimmed() {
    let content = format!(
        "{}\n 2021 , Fall ,100,50,40, 80.5 ,90.0,10,10,10,10\n",
        header()
    );
    let records = load_reader(content.as_bytes()).expect("trimmed load failed");

    assert_eq!(records[0].year, 2021);
    assert_eq!(records[0].term, "Fall");
    assert_eq!(records[0].retention_rate, 80.5);
}

#[test]
fn department_parses_label_or_column() {
    assert_eq!(Department::try_from("arts"), Ok(Department::Arts));
    assert_eq!(
        Department::try_from("Engineering Enrolled"),
        Ok(Department::Engineering)
    );
    assert_eq!(" Science ".parse::<Department>(), Ok(Department::Science));
    assert!(Department::try_from("Medicine").is_err());
}

#[test]
fn metric_parses_key_or_column_and_reads_value() {
    let record = Record {
        year: 2021,
        term: "Fall".to_string(),
        applications: 100,
        admitted: 50,
        enrolled: 40,
        retention_rate: 80.0,
        satisfaction: 90.0,
        dept_enrolled: crate::DepartmentCounts::new(1, 2, 3, 4),
    };

    assert_eq!(Metric::try_from("retention_rate"), Ok(Metric::RetentionRate));
    assert_eq!(
        Metric::try_from("Student Satisfaction (%)"),
        Ok(Metric::Satisfaction)
    );
    assert_eq!(
        Metric::try_from("arts_enrolled"),
        Ok(Metric::DepartmentEnrolled(Department::Arts))
    );
    assert!(Metric::try_from("gpa").is_err());

    assert_eq!(Metric::RetentionRate.value(&record), 80.0);
    assert_eq!(Metric::Admitted.value(&record), 50.0);
    assert_eq!(
        Metric::DepartmentEnrolled(Department::Science).value(&record),
        4.0
    );
}
