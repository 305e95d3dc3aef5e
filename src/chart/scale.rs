//! Time (X) and value (Y) scales.
//!
//! Both scales are plain linear maps from a domain onto a pixel range. A
//! degenerate domain (start == end) maps everything onto the middle of the
//! range, which keeps a single-record chart centred instead of collapsing it
//! onto an edge.

use chrono::NaiveDate;

use super::ticks::{linear_ticks, time_ticks};

/// Linear value scale mapping `[d0, d1]` onto `[r0, r1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl LinearScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    #[inline]
    pub fn to_px(&self, v: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let span = d1 - d0;
        let t = if span != 0.0 { (v - d0) / span } else { 0.5 };
        r0 + t * (r1 - r0)
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        linear_ticks(self.domain[0], self.domain[1], count)
    }
}

/// Calendar time scale. Dates are whole days, so the map works on day offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    start: NaiveDate,
    end: NaiveDate,
    inner: LinearScale,
}

impl TimeScale {
    pub fn new(domain: (NaiveDate, NaiveDate), range: [f64; 2]) -> Self {
        let (start, end) = domain;
        let span = (end - start).num_days() as f64;
        Self {
            start,
            end,
            inner: LinearScale::new([0.0, span], range),
        }
    }

    pub fn domain(&self) -> (NaiveDate, NaiveDate) {
        (self.start, self.end)
    }

    #[inline]
    pub fn to_px(&self, date: NaiveDate) -> f64 {
        self.inner.to_px((date - self.start).num_days() as f64)
    }

    pub fn ticks(&self, count: usize) -> Vec<NaiveDate> {
        time_ticks(self.start, self.end, count)
    }
}
