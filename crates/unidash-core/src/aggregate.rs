use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use unidash_parser::{Metric, Record};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub applications: u64,
    pub admitted: u64,
    pub enrolled: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearMean {
    pub year: i32,
    pub mean: f64,
}

/// Sums applications, admissions and enrollment. Zero for no records.
pub fn totals(records: &[Record]) -> Totals {
    records.iter().fold(Totals::default(), |acc, record| Totals {
        applications: acc.applications + record.applications,
        admitted: acc.admitted + record.admitted,
        enrolled: acc.enrolled + record.enrolled,
    })
}

/// Arithmetic mean of `metric` per year, ascending by year. Only years
/// present in `records` appear. Values are not rounded.
pub fn mean_by_year(records: &[Record], metric: Metric) -> Vec<YearMean> {
    let mut groups: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for record in records {
        let entry = groups.entry(record.year).or_insert((0.0, 0));
        entry.0 += metric.value(record);
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|(year, (sum, count))| YearMean {
            year,
            mean: sum / count as f64,
        })
        .collect()
}
