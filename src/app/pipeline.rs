//! Shared "load pipeline" used by the CLI commands and the TUI.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch -> normalize -> window
//!
//! The front-ends can then focus on presentation (printing, SVG, widgets).

use tracing::{debug, info};

use crate::data::{DailySource, normalize, window};
use crate::domain::{Dataset, DayRange};
use crate::error::AppError;

/// Everything one load produced.
#[derive(Debug, Clone)]
pub struct LoadOutput {
    pub dataset: Dataset,
    pub range: DayRange,
    pub rows_read: usize,
    pub rows_dropped: usize,
}

impl LoadOutput {
    pub fn rows_valid(&self) -> usize {
        self.rows_read - self.rows_dropped
    }
}

/// Fetch the full series from `source` and keep the trailing `range`.
///
/// This is also what the widget's retry control re-runs.
pub fn load_dataset(source: &dyn DailySource, range: DayRange) -> Result<LoadOutput, AppError> {
    info!(source = %source.describe(), days = range.days(), "fetching daily series");
    let raw = source.fetch_raw()?;

    let ingested = normalize(&raw);
    if ingested.rows_dropped > 0 {
        debug!(
            dropped = ingested.rows_dropped,
            read = ingested.rows_read,
            "skipped rows with bad date or case count"
        );
    }

    let dataset = window(&ingested.records, range);
    info!(records = dataset.len(), "daily series loaded");

    Ok(LoadOutput {
        dataset,
        range,
        rows_read: ingested.rows_read,
        rows_dropped: ingested.rows_dropped,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    struct Static(Vec<Value>);

    impl DailySource for Static {
        fn fetch_raw(&self) -> Result<Vec<Value>, AppError> {
            Ok(self.0.clone())
        }

        fn describe(&self) -> String {
            "static".to_string()
        }
    }

    struct Failing;

    impl DailySource for Failing {
        fn fetch_raw(&self) -> Result<Vec<Value>, AppError> {
            Err(AppError::data_unavailable("COVID request failed with status 500."))
        }

        fn describe(&self) -> String {
            "failing".to_string()
        }
    }

    fn days(n: u32) -> Vec<Value> {
        // Newest first, like the upstream API.
        (1..=n)
            .rev()
            .map(|d| json!({"date": 20200300 + d, "positiveIncrease": d * 10, "deathIncrease": d}))
            .collect()
    }

    #[test]
    fn length_is_min_of_range_and_valid_rows() {
        let out = load_dataset(&Static(days(31)), DayRange::Last30).unwrap();
        assert_eq!(out.dataset.len(), 30);
        assert_eq!(out.rows_valid(), 31);
        assert_eq!(out.dataset.records()[0].new_cases, 20);

        let out = load_dataset(&Static(days(12)), DayRange::Last60).unwrap();
        assert_eq!(out.dataset.len(), 12);
    }

    #[test]
    fn output_is_ascending() {
        let out = load_dataset(&Static(days(20)), DayRange::Last90).unwrap();
        let recs = out.dataset.records();
        assert!(recs.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn failures_propagate_as_data_unavailable() {
        let err = load_dataset(&Failing, DayRange::Last30).unwrap_err();
        assert!(err.is_data_unavailable());
    }
}
