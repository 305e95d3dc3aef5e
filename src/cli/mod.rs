//! Command-line parsing for the COVID bar chart.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! loading and drawing code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DayRange, LayoutStrategy};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "covid", version, about = "COVID-19 daily new cases in the US, as a bar chart")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive chart (default).
    Tui(TuiArgs),
    /// Write the chart as a standalone SVG file.
    Render(RenderArgs),
    /// Print a summary, a table and an ASCII chart of the current window.
    Show(ShowArgs),
}

/// Options shared by every command.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// How many trailing days to show.
    #[arg(short = 'd', long = "days", value_enum, default_value_t = DayRange::Last30)]
    pub days: DayRange,

    /// Override the data endpoint (defaults to $COVID_API_URL, then the public API).
    #[arg(long)]
    pub url: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Start in dark mode.
    #[arg(long)]
    pub dark: bool,

    /// Canvas sizing: a fixed 1200x600 canvas or one that follows the terminal width.
    #[arg(long, value_enum, default_value_t = LayoutStrategy::Measured)]
    pub layout: LayoutStrategy,

    /// Write logs to this file (the TUI does not log otherwise).
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output SVG path.
    #[arg(short, long, default_value = "covid.svg")]
    pub out: PathBuf,

    /// Use the dark palette.
    #[arg(long)]
    pub dark: bool,

    /// Container width in pixels; enables the measured layout.
    #[arg(long)]
    pub width: Option<f64>,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Height of the ASCII chart (rows).
    #[arg(long, default_value_t = 16)]
    pub rows: usize,

    /// Print the dataset as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}
