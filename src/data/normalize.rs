//! Raw JSON rows -> validated, sorted `Record`s.
//!
//! Row-level problems never fail the whole load: bad rows are skipped and
//! counted so callers can report what happened.

use chrono::NaiveDate;
use serde_json::Value;

use crate::domain::{Dataset, DayRange, Record};

/// Normalized rows plus bookkeeping about what was skipped.
#[derive(Debug, Clone, Default)]
pub struct Ingested {
    /// Ascending by date.
    pub records: Vec<Record>,
    pub rows_read: usize,
    pub rows_dropped: usize,
}

/// Validate and sort raw rows.
///
/// - `date` must be an integer or string of exactly eight digits (`YYYYMMDD`)
/// - `positiveIncrease` missing/null/false counts as 0; non-numeric drops the row
/// - `deathIncrease` falls back to 0 whenever it is unusable
pub fn normalize(raw: &[Value]) -> Ingested {
    let mut records = Vec::with_capacity(raw.len());
    for row in raw {
        let Some(date) = parse_date(row.get("date")) else {
            continue;
        };
        let Some(new_cases) = coerce_count(row.get("positiveIncrease")) else {
            continue;
        };
        let new_deaths = coerce_count(row.get("deathIncrease")).unwrap_or(0);
        records.push(Record {
            date,
            new_cases,
            new_deaths,
        });
    }

    // Stable, so same-day duplicates keep their payload order.
    records.sort_by_key(|r| r.date);

    Ingested {
        rows_read: raw.len(),
        rows_dropped: raw.len() - records.len(),
        records,
    }
}

/// Keep the trailing `range.days()` records.
pub fn window(records: &[Record], range: DayRange) -> Dataset {
    let start = records.len().saturating_sub(range.days());
    Dataset::from_sorted(records[start..].to_vec())
}

fn parse_date(value: Option<&Value>) -> Option<NaiveDate> {
    let text = match value? {
        Value::Number(n) => n.as_u64()?.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(&text, "%Y%m%d").ok()
}

/// `None` means "not a number"; missing-ish values are zero.
fn coerce_count(value: Option<&Value>) -> Option<i64> {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Some(0),
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().and_then(round_finite)),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Some(0);
            }
            trimmed.parse::<f64>().ok().and_then(round_finite)
        }
        Some(_) => None,
    }
}

/// Rounded count, or `None` when it does not fit in an `i64`.
fn round_finite(v: f64) -> Option<i64> {
    let v = v.round();
    // `i64::MAX as f64` rounds up to 2^63, so the upper bound is exclusive.
    if v.is_finite() && v >= i64::MIN as f64 && v < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}
