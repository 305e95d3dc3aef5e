//! Tick generation.
//!
//! Linear ticks use the usual 1/2/5 × 10^k steps. Time ticks pick a calendar
//! interval (days, weeks, months, years) whose length is closest to
//! `span / count`, then keep the dates inside the domain that fall on that
//! interval's boundaries.

use chrono::{Datelike, NaiveDate, Weekday};

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// `(first index, last index, increment)`; a negative increment means the
/// tick values are `i / -inc` (keeps small steps exact).
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor() as i32;
    let error = step / 10f64.powi(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0 {
        let m = 10f64.powi(-power) / factor;
        i1 = (start * m).round();
        i2 = (stop * m).round();
        if i1 / m < start {
            i1 += 1.0;
        }
        if i2 / m > stop {
            i2 -= 1.0;
        }
        inc = -m;
    } else {
        let m = 10f64.powi(power) * factor;
        i1 = (start / m).round();
        i2 = (stop / m).round();
        if i1 * m < start {
            i1 += 1.0;
        }
        if i2 * m > stop {
            i2 -= 1.0;
        }
        inc = m;
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Roughly `count` nicely rounded values covering `[start, stop]`.
pub fn linear_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let (lo, hi) = if stop < start { (stop, start) } else { (start, stop) };
    let (i1, i2, inc) = tick_spec(lo, hi, count as f64);
    if !(i2 >= i1) {
        return Vec::new();
    }

    let n = (i2 - i1) as usize + 1;
    let mut out: Vec<f64> = (0..n)
        .map(|i| {
            let k = i1 + i as f64;
            if inc < 0.0 { k / -inc } else { k * inc }
        })
        .collect();
    if stop < start {
        out.reverse();
    }
    out
}

/// Step between linear ticks; used to thin out year ticks.
fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let (_, _, inc) = tick_spec(start, stop, count as f64);
    if inc < 0.0 { 1.0 / -inc } else { inc }
}

/// Calendar interval used to place date ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeInterval {
    /// Every `n`th day of the month, starting on the 1st.
    Days(u32),
    /// Sundays.
    Weeks,
    /// First of every `n`th month, starting in January.
    Months(u32),
    /// January 1st of every `n`th year.
    Years(i32),
}

impl TimeInterval {
    fn contains(self, date: NaiveDate) -> bool {
        match self {
            TimeInterval::Days(n) => (date.day() - 1) % n == 0,
            TimeInterval::Weeks => date.weekday() == Weekday::Sun,
            TimeInterval::Months(n) => date.day() == 1 && date.month0() % n == 0,
            TimeInterval::Years(n) => date.ordinal() == 1 && date.year().rem_euclid(n) == 0,
        }
    }
}

/// Candidate intervals and their nominal length in days.
const INTERVALS: [(TimeInterval, f64); 5] = [
    (TimeInterval::Days(1), 1.0),
    (TimeInterval::Days(2), 2.0),
    (TimeInterval::Weeks, 7.0),
    (TimeInterval::Months(1), 30.0),
    (TimeInterval::Months(3), 90.0),
];
const YEAR_DAYS: f64 = 365.0;

/// Pick the interval whose length best matches `span_days / count`.
pub fn choose_interval(span_days: f64, count: usize) -> TimeInterval {
    let target = span_days / count.max(1) as f64;
    let upper = INTERVALS.iter().filter(|(_, len)| *len <= target).count();

    if upper == 0 {
        return INTERVALS[0].0;
    }
    if upper == INTERVALS.len() {
        if target < YEAR_DAYS {
            let (prev, prev_len) = INTERVALS[upper - 1];
            if target / prev_len < YEAR_DAYS / target {
                return prev;
            }
        }
        let years = span_days / YEAR_DAYS;
        let step = tick_increment(0.0, years, count).max(1.0);
        return TimeInterval::Years(step as i32);
    }

    let (prev, prev_len) = INTERVALS[upper - 1];
    let (next, next_len) = INTERVALS[upper];
    if target / prev_len < next_len / target { prev } else { next }
}

/// Dates in `[start, end]` falling on the chosen interval's boundaries.
pub fn time_ticks(start: NaiveDate, end: NaiveDate, count: usize) -> Vec<NaiveDate> {
    if count == 0 {
        return Vec::new();
    }
    let (lo, hi) = if end < start { (end, start) } else { (start, end) };
    if lo == hi {
        return vec![lo];
    }
    let interval = choose_interval((hi - lo).num_days() as f64, count);
    lo.iter_days()
        .take_while(|d| *d <= hi)
        .filter(|d| interval.contains(*d))
        .collect()
}
