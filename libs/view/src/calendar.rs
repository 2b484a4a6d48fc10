//! Week header labels.

use chrono::{Datelike, Duration, NaiveDate};

/// First day of week `index`, counting from `start`.
pub fn week_start(start: NaiveDate, index: usize) -> NaiveDate {
    start + Duration::weeks(index as i64)
}

/// `M/D` labels for `count` consecutive weeks from `start`.
pub fn week_headers(start: NaiveDate, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let date = week_start(start, i);
            format!("{}/{}", date.month(), date.day())
        })
        .collect()
}
