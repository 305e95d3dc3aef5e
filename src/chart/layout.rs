//! Canvas sizing for the two layout strategies.

use crate::domain::{Dimensions, LayoutStrategy};

pub const FIXED_WIDTH: f64 = 1200.0;
pub const FIXED_HEIGHT: f64 = 600.0;

/// Measured layouts never grow taller than this.
pub const MAX_MEASURED_HEIGHT: f64 = 600.0;
pub const MEASURED_ASPECT: f64 = 0.6;

/// Canvas size for `strategy`.
///
/// `container_width` is ignored by the fixed layout. A measured layout that
/// has not been measured yet falls back to the fixed size.
pub fn canvas_dimensions(strategy: LayoutStrategy, container_width: Option<f64>) -> Dimensions {
    match (strategy, container_width) {
        (LayoutStrategy::Measured, Some(width)) => measured(width),
        _ => Dimensions::new(FIXED_WIDTH, FIXED_HEIGHT),
    }
}

fn measured(width: f64) -> Dimensions {
    let width = width.max(0.0);
    Dimensions::new(width, MAX_MEASURED_HEIGHT.min(width * MEASURED_ASPECT))
}
