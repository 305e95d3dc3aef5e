//! Text reports for the non-interactive commands.

pub mod format;

pub use format::{format_summary, format_table};
