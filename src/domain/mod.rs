//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - observations (`Record`) and the displayed window (`Dataset`)
//! - view knobs (`DayRange`, `Theme`, `LayoutStrategy`)
//! - canvas geometry (`Dimensions`, `Margin`)

pub mod types;

pub use types::*;
