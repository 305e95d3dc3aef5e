//! Formatted terminal output for `covid show`.
//!
//! We keep formatting code in one place so output changes stay localized.

use crate::app::pipeline::LoadOutput;
use crate::chart::group_thousands;
use crate::domain::Dataset;

/// Header block: source, window, row accounting and totals.
pub fn format_summary(load: &LoadOutput, source: &str) -> String {
    let ds = &load.dataset;
    let mut out = String::new();

    out.push_str("=== COVID-19 Daily New Cases in the US ===\n");
    out.push_str(&format!("Source: {source}\n"));
    out.push_str(&format!(
        "Rows: read={} | valid={} | dropped={}\n",
        load.rows_read,
        load.rows_valid(),
        load.rows_dropped
    ));

    match ds.date_extent() {
        Some((first, last)) => {
            out.push_str(&format!(
                "Window: last {} days -> {} records ({first} .. {last})\n",
                load.range.days(),
                ds.len(),
            ));
            out.push_str(&format!(
                "Totals: cases={} | deaths={} | peak day={}\n",
                group_thousands(ds.total_cases()),
                group_thousands(ds.total_deaths()),
                group_thousands(ds.max_cases().unwrap_or(0)),
            ));
        }
        None => out.push_str("Window: no records\n"),
    }

    out
}

/// One line per record, newest last.
pub fn format_table(ds: &Dataset) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<12} {:>12} {:>10}\n", "date", "new cases", "deaths"));
    for r in ds.records() {
        out.push_str(&format!(
            "{:<12} {:>12} {:>10}\n",
            r.date.format("%Y-%m-%d").to_string(),
            group_thousands(r.new_cases),
            group_thousands(r.new_deaths)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{DayRange, Record};

    fn load() -> LoadOutput {
        LoadOutput {
            dataset: Dataset::from_sorted(vec![
                Record {
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    new_cases: 1000,
                    new_deaths: 10,
                },
                Record {
                    date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                    new_cases: 2000,
                    new_deaths: 20,
                },
            ]),
            range: DayRange::Last30,
            rows_read: 3,
            rows_dropped: 1,
        }
    }

    #[test]
    fn summary_mentions_window_and_totals() {
        let s = format_summary(&load(), "fixture");
        assert!(s.contains("Source: fixture"));
        assert!(s.contains("read=3 | valid=2 | dropped=1"));
        assert!(s.contains("last 30 days -> 2 records (2024-01-01 .. 2024-01-02)"));
        assert!(s.contains("cases=3,000 | deaths=30 | peak day=2,000"));
    }

    #[test]
    fn summary_handles_empty_window() {
        let mut l = load();
        l.dataset = Dataset::default();
        assert!(format_summary(&l, "x").contains("no records"));
    }

    #[test]
    fn table_has_header_and_rows() {
        let t = format_table(&load().dataset);
        let lines: Vec<_> = t.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("2024-01-01"));
        assert!(lines[2].trim_end().ends_with("20"));
        assert!(lines[2].contains("2,000"));
    }
}
