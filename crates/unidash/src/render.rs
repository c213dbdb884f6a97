//! Plain-text tables for the `summary` command.
//!
//! Rounding happens here and nowhere earlier: the pipeline hands over full
//! precision and the tables show two decimals.

use std::collections::BTreeMap;
use std::fmt::Write;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{CellAlignment, Table};
use unidash_core::{
    Dashboard, Department, DepartmentEnrollment, TermEnrollment, TermSatisfaction, Totals,
    YearMean,
};

fn new_table(header: Vec<String>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

fn right_align(table: &mut Table, from_column: usize) {
    let count = table.column_count();
    for index in from_column..count {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
}

pub fn totals_table(totals: &Totals) -> Table {
    let mut table = new_table(vec![
        "Total Applications".to_string(),
        "Total Admitted".to_string(),
        "Total Enrolled".to_string(),
    ]);
    table.add_row(vec![
        totals.applications.to_string(),
        totals.admitted.to_string(),
        totals.enrolled.to_string(),
    ]);
    right_align(&mut table, 0);
    table
}

pub fn year_means_table(rows: &[YearMean], label: &str) -> Table {
    let mut table = new_table(vec!["Year".to_string(), label.to_string()]);
    for row in rows {
        table.add_row(vec![row.year.to_string(), format!("{:.2}", row.mean)]);
    }
    right_align(&mut table, 1);
    table
}

/// Terms in first-appearance order.
fn term_order<'a>(terms: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut order = Vec::new();
    for term in terms {
        if !order.contains(&term) {
            order.push(term);
        }
    }
    order
}

/// Year by term, summing enrollment where a (year, term) pair repeats.
pub fn term_comparison_table(rows: &[TermEnrollment]) -> Table {
    let terms = term_order(rows.iter().map(|row| row.term.as_str()));
    let mut sums: BTreeMap<i32, BTreeMap<&str, u64>> = BTreeMap::new();
    for row in rows {
        *sums
            .entry(row.year)
            .or_default()
            .entry(row.term.as_str())
            .or_default() += row.enrolled;
    }

    let mut header = vec!["Year".to_string()];
    header.extend(terms.iter().map(|term| term.to_string()));
    let mut table = new_table(header);

    for (year, by_term) in &sums {
        let mut cells = vec![year.to_string()];
        cells.extend(terms.iter().map(|term| {
            by_term
                .get(term)
                .map(|value| value.to_string())
                .unwrap_or_else(|| "-".to_string())
        }));
        table.add_row(cells);
    }
    right_align(&mut table, 1);
    table
}

/// Year by term, averaging satisfaction where a (year, term) pair repeats.
pub fn satisfaction_table(rows: &[TermSatisfaction]) -> Table {
    let terms = term_order(rows.iter().map(|row| row.term.as_str()));
    let mut groups: BTreeMap<i32, BTreeMap<&str, (f64, usize)>> = BTreeMap::new();
    for row in rows {
        let entry = groups
            .entry(row.year)
            .or_default()
            .entry(row.term.as_str())
            .or_insert((0.0, 0));
        entry.0 += row.satisfaction;
        entry.1 += 1;
    }

    let mut header = vec!["Year".to_string()];
    header.extend(terms.iter().map(|term| term.to_string()));
    let mut table = new_table(header);

    for (year, by_term) in &groups {
        let mut cells = vec![year.to_string()];
        cells.extend(terms.iter().map(|term| match by_term.get(term) {
            Some((sum, count)) => format!("{:.2}", sum / *count as f64),
            None => "-".to_string(),
        }));
        table.add_row(cells);
    }
    right_align(&mut table, 1);
    table
}

/// Year by department, summing across terms.
pub fn department_table(rows: &[DepartmentEnrollment], departments: &[Department]) -> Table {
    let mut sums: BTreeMap<i32, BTreeMap<Department, u64>> = BTreeMap::new();
    for row in rows {
        *sums
            .entry(row.year)
            .or_default()
            .entry(row.department)
            .or_default() += row.enrollment;
    }

    let mut header = vec!["Year".to_string()];
    header.extend(departments.iter().map(|dept| dept.to_string()));
    let mut table = new_table(header);

    for (year, by_dept) in &sums {
        let mut cells = vec![year.to_string()];
        cells.extend(
            departments
                .iter()
                .map(|dept| by_dept.get(dept).copied().unwrap_or_default().to_string()),
        );
        table.add_row(cells);
    }
    right_align(&mut table, 1);
    table
}

pub fn render_dashboard(dashboard: &Dashboard) -> String {
    let mut out = String::new();
    let sections: [(&str, Table); 5] = [
        ("Key Metrics", totals_table(&dashboard.totals)),
        (
            "Retention Rate Trends",
            year_means_table(&dashboard.retention_by_year, "Retention Rate (%)"),
        ),
        (
            "Student Satisfaction Trends",
            satisfaction_table(&dashboard.satisfaction_by_term),
        ),
        (
            "Enrollment Breakdown by Department",
            department_table(&dashboard.enrollment_by_department, &dashboard.departments),
        ),
        (
            "Spring vs Fall Enrollment Comparison",
            term_comparison_table(&dashboard.enrollment_by_term),
        ),
    ];

    let _ = writeln!(out, "Records selected: {}", dashboard.record_count);
    for (title, table) in sections {
        let _ = writeln!(out, "\n{title}\n{table}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn means_are_rounded_for_display_only() {
        let rows = [YearMean {
            year: 2021,
            mean: 241.0 / 3.0,
        }];
        let rendered = year_means_table(&rows, "Retention Rate (%)").to_string();

        assert!(rendered.contains("80.33"));
        assert!(!rendered.contains("80.333"));
    }

    #[test]
    fn term_comparison_pivots_terms_into_columns() {
        let rows = vec![
            TermEnrollment {
                year: 2021,
                term: "Spring".to_string(),
                enrolled: 80,
            },
            TermEnrollment {
                year: 2021,
                term: "Fall".to_string(),
                enrolled: 40,
            },
            TermEnrollment {
                year: 2022,
                term: "Fall".to_string(),
                enrolled: 55,
            },
        ];
        let mut table = term_comparison_table(&rows);

        assert_eq!(table.column_count(), 3);
        let rendered = table.to_string();
        let spring = rendered.find("Spring").expect("Spring header");
        let fall = rendered.find("Fall").expect("Fall header");
        assert!(spring < fall);
        assert!(rendered.contains('-'));
        assert!(rendered.contains("55"));
    }

    #[test]
    fn department_table_sums_terms() {
        let rows = vec![
            DepartmentEnrollment {
                year: 2021,
                term: "Fall".to_string(),
                department: Department::Arts,
                enrollment: 10,
            },
            DepartmentEnrollment {
                year: 2021,
                term: "Spring".to_string(),
                department: Department::Arts,
                enrollment: 15,
            },
        ];
        let rendered = department_table(&rows, &[Department::Arts]).to_string();

        assert!(rendered.contains("Arts"));
        assert!(rendered.contains("25"));
        assert!(!rendered.contains("Engineering"));
    }
}
