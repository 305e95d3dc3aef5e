//! ASCII column chart for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid, one column per day),
//! optimized for:
//! - quick visual sanity checks in a terminal or a pipe
//! - deterministic output (helpful for golden tests)
//!
//! It uses the same value domain as the full chart, so the tallest column
//! never quite reaches the top row.

use crate::chart::LinearScale;
use crate::chart::scene::{Y_AXIS_TICKS, Y_HEADROOM, format_thousands_tick};
use crate::domain::Dataset;

const BAR: char = '#';
const GUTTER: usize = 8;

/// Render `ds` as a column chart `height` rows tall.
pub fn render_ascii_bars(ds: &Dataset, height: usize) -> String {
    let height = height.max(4);
    let Some(max_cases) = ds.max_cases() else {
        return "Plot: no data\n".to_string();
    };

    let y_max = if max_cases > 0 {
        max_cases as f64 * Y_HEADROOM
    } else {
        1.0
    };
    let ys = LinearScale::new([0.0, y_max], [0.0, height as f64]);
    let width = ds.len();

    let mut grid = vec![vec![' '; width]; height];
    for (col, r) in ds.records().iter().enumerate() {
        let filled = (ys.to_px(r.new_cases.max(0) as f64).round() as usize).min(height);
        for row in grid.iter_mut().rev().take(filled) {
            row[col] = BAR;
        }
    }

    // Tick labels keyed by the row they land on.
    let mut labels = vec![String::new(); height];
    for v in ys.ticks(Y_AXIS_TICKS) {
        let from_bottom = ys.to_px(v).round() as usize;
        if from_bottom == 0 || from_bottom > height {
            continue;
        }
        labels[height - from_bottom] = format_thousands_tick(v);
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {} days | y=[0, {}]\n",
        width,
        format_thousands_tick(y_max.round())
    ));
    for (row, label) in grid.iter().zip(&labels) {
        out.push_str(&format!("{label:>w$} |", w = GUTTER - 2));
        out.extend(row.iter());
        out.push('\n');
    }
    out.push_str(&format!("{:>w$} +{}\n", "0k", "-".repeat(width), w = GUTTER - 2));

    if let Some((first, last)) = ds.date_extent() {
        let first = first.format("%b %d").to_string();
        let last = last.format("%b %d").to_string();
        let pad = width.saturating_sub(first.len() + last.len());
        out.push_str(&format!(
            "{:w$}{first}{:pad$}{last}\n",
            "",
            "",
            w = GUTTER,
            pad = pad
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::Record;

    fn ds(cases: &[i64]) -> Dataset {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Dataset::from_sorted(
            cases
                .iter()
                .enumerate()
                .map(|(i, &c)| Record {
                    date: start + chrono::Duration::days(i as i64),
                    new_cases: c,
                    new_deaths: 0,
                })
                .collect(),
        )
    }

    #[test]
    fn tallest_column_leaves_headroom() {
        let plot = render_ascii_bars(&ds(&[1000, 2000]), 11);
        let rows: Vec<_> = plot.lines().skip(1).take(11).collect();
        // 2000 of 2200 over 11 rows -> 10 filled
        let col = |row: &str, c: usize| row.chars().nth(GUTTER + c).unwrap();
        assert_eq!(col(rows[0], 1), ' ');
        assert_eq!(col(rows[1], 1), BAR);
        assert_eq!(col(rows[10], 0), BAR);
        assert_eq!(rows.iter().filter(|r| col(r, 0) == BAR).count(), 5);
    }

    #[test]
    fn is_deterministic() {
        let d = ds(&[5, 1, 9, 3]);
        assert_eq!(render_ascii_bars(&d, 8), render_ascii_bars(&d, 8));
    }

    #[test]
    fn empty_dataset() {
        assert_eq!(render_ascii_bars(&Dataset::default(), 10), "Plot: no data\n");
    }
}
