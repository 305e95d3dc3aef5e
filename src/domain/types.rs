//! Shared domain types.
//!
//! These types are intentionally kept small and serializable so they can be:
//!
//! - passed between the loader, the scene builder and the hosts
//! - dumped as JSON from `covid show --json`

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One day's case/death increase observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    pub new_cases: i64,
    pub new_deaths: i64,
}

/// The filtered, sorted, trailing window of records currently displayed.
///
/// Always ascending by date. Rebuilt from scratch on every fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Wrap records that are already sorted ascending by date.
    pub fn from_sorted(records: Vec<Record>) -> Self {
        debug_assert!(records.windows(2).all(|w| w[0].date <= w[1].date));
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Record> {
        self.records.get(idx)
    }

    /// `(first date, last date)`, or `None` for an empty dataset.
    pub fn date_extent(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.records.first()?.date, self.records.last()?.date))
    }

    pub fn max_cases(&self) -> Option<i64> {
        self.records.iter().map(|r| r.new_cases).max()
    }

    /// Sum of new cases, saturating at the `i64` bounds.
    pub fn total_cases(&self) -> i64 {
        self.records.iter().fold(0i64, |acc, r| acc.saturating_add(r.new_cases))
    }

    /// Sum of new deaths, saturating at the `i64` bounds.
    pub fn total_deaths(&self) -> i64 {
        self.records.iter().fold(0i64, |acc, r| acc.saturating_add(r.new_deaths))
    }
}

/// How many trailing days to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum DayRange {
    #[default]
    #[value(name = "30")]
    Last30,
    #[value(name = "60")]
    Last60,
    #[value(name = "90")]
    Last90,
}

impl DayRange {
    pub const ALL: [DayRange; 3] = [DayRange::Last30, DayRange::Last60, DayRange::Last90];

    pub fn days(self) -> usize {
        match self {
            DayRange::Last30 => 30,
            DayRange::Last60 => 60,
            DayRange::Last90 => 90,
        }
    }

    pub fn from_days(days: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.days() == days)
    }

    pub fn next(self) -> Self {
        match self {
            DayRange::Last30 => DayRange::Last60,
            DayRange::Last60 => DayRange::Last90,
            DayRange::Last90 => DayRange::Last90,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            DayRange::Last30 => DayRange::Last30,
            DayRange::Last60 => DayRange::Last30,
            DayRange::Last90 => DayRange::Last60,
        }
    }

    pub fn label(self) -> String {
        format!("{} Days", self.days())
    }
}

/// Light or dark presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

/// Canvas size in (virtual) pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

/// Fixed space reserved around the plot area for axes and titles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

pub const CHART_MARGIN: Margin = Margin {
    top: 40.0,
    right: 40.0,
    bottom: 80.0,
    left: 80.0,
};

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Plot area after subtracting margins; never negative.
    pub fn bounded(&self, margin: &Margin) -> Dimensions {
        Dimensions {
            width: (self.width - margin.left - margin.right).max(0.0),
            height: (self.height - margin.top - margin.bottom).max(0.0),
        }
    }
}

/// How the canvas size is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LayoutStrategy {
    /// 1200×600 regardless of the container.
    #[default]
    Fixed,
    /// Follow the container width; height = min(600, width × 0.6).
    Measured,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(y: i32, m: u32, d: u32, cases: i64) -> Record {
        Record {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            new_cases: cases,
            new_deaths: 0,
        }
    }

    #[test]
    fn day_range_round_trips_through_days() {
        for r in DayRange::ALL {
            assert_eq!(DayRange::from_days(r.days()), Some(r));
        }
        assert_eq!(DayRange::from_days(45), None);
        assert_eq!(DayRange::Last90.next(), DayRange::Last90);
        assert_eq!(DayRange::Last30.prev(), DayRange::Last30);
    }

    #[test]
    fn bounded_dimensions_saturate() {
        let dims = Dimensions::new(1200.0, 600.0).bounded(&CHART_MARGIN);
        assert_eq!(dims, Dimensions::new(1080.0, 480.0));

        let tiny = Dimensions::new(50.0, 50.0).bounded(&CHART_MARGIN);
        assert_eq!(tiny, Dimensions::new(0.0, 0.0));
    }

    #[test]
    fn dataset_extent_and_totals() {
        let ds = Dataset::from_sorted(vec![rec(2024, 1, 1, 5), rec(2024, 1, 3, 9)]);
        let (lo, hi) = ds.date_extent().unwrap();
        assert_eq!(lo, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(hi, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(ds.max_cases(), Some(9));
        assert_eq!(ds.total_cases(), 14);
        assert!(Dataset::default().date_extent().is_none());
    }

    #[test]
    fn totals_saturate_instead_of_overflowing() {
        let mut a = rec(2024, 1, 1, i64::MAX - 1);
        a.new_deaths = i64::MIN;
        let mut b = rec(2024, 1, 2, i64::MAX - 1);
        b.new_deaths = -1;
        let ds = Dataset::from_sorted(vec![a, b]);
        assert_eq!(ds.total_cases(), i64::MAX);
        assert_eq!(ds.total_deaths(), i64::MIN);
    }

    #[test]
    fn theme_toggles() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert!(Theme::Light.toggled().is_dark());
    }
}
