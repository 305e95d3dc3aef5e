//! `covid-bars` library crate.
//!
//! The binary (`covid`) is a thin wrapper around this library so that:
//!
//! - the chart geometry and widget state are testable without a terminal
//! - the same scene feeds the TUI, the SVG writer and the text report

pub mod app;
pub mod chart;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod logging;
pub mod plot;
pub mod report;
pub mod tui;
pub mod widget;
