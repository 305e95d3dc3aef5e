//! Pointer-following tooltip.
//!
//! The tooltip is a plain value owned by whoever hosts the chart; nothing
//! here touches a drawing surface.

use crate::domain::Record;

/// Size and offsets of the floating tooltip, in the host's units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipGeometry {
    pub width: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for TooltipGeometry {
    fn default() -> Self {
        Self {
            width: 180.0,
            offset_x: 10.0,
            offset_y: 10.0,
        }
    }
}

/// The visible tooltip: which bar it describes and where it sits.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub index: usize,
    pub record: Record,
    pub left: f64,
    pub top: f64,
}

/// Top-left corner for a tooltip next to `pointer`.
///
/// Sits right of and slightly above the pointer, and flips to the left side
/// when it would run past `viewport_width`.
pub fn place_tooltip(pointer: (f64, f64), viewport_width: f64, geometry: &TooltipGeometry) -> (f64, f64) {
    let (px, py) = pointer;
    let right = px + geometry.offset_x;
    let left = if right + geometry.width > viewport_width {
        px - geometry.width - geometry.offset_x
    } else {
        right
    };
    (left, py - geometry.offset_y)
}

/// Text shown inside the tooltip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipContent {
    pub title: String,
    pub rows: Vec<(String, String)>,
}

impl TooltipContent {
    pub fn for_record(record: &Record) -> Self {
        Self {
            title: record.date.format("%B %d, %Y").to_string(),
            rows: vec![
                ("New Cases:".to_string(), group_thousands(record.new_cases)),
                ("Deaths:".to_string(), group_thousands(record.new_deaths)),
            ],
        }
    }

    /// Single-line form, e.g. for SVG `<title>` elements.
    pub fn to_plain(&self) -> String {
        let mut out = self.title.clone();
        for (k, v) in &self.rows {
            out.push('\n');
            out.push_str(k);
            out.push(' ');
            out.push_str(v);
        }
        out
    }
}

/// `1234567` -> `"1,234,567"`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
