//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - dispatches to the TUI, the SVG writer or the text report

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use crate::chart::{Palette, build_scene, canvas_dimensions, render_svg};
use crate::cli::{Command, RenderArgs, ShowArgs, TuiArgs};
use crate::data::{CovidClient, DailySource};
use crate::domain::{LayoutStrategy, Theme};
use crate::error::{AppError, EXIT_DATA, EXIT_USAGE};
use crate::logging::{self, LogTarget};

pub mod pipeline;

/// Entry point for the `covid` binary.
pub fn run() -> Result<(), AppError> {
    // We want `covid` and `covid -d 60` to behave like `covid tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Render(args) => handle_render(args),
        Command::Show(args) => handle_show(args),
    }
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    let target = match &args.log_file {
        Some(path) => LogTarget::File(path.clone()),
        None => LogTarget::Off,
    };
    logging::init(target)?;

    let client = CovidClient::from_env(args.source.url.as_deref())?;
    let source: Arc<dyn DailySource> = Arc::new(client);
    crate::tui::run(&args, source)
}

fn handle_render(args: RenderArgs) -> Result<(), AppError> {
    logging::init(LogTarget::Stderr)?;

    if let Some(width) = args.width {
        if !(width.is_finite() && width > 0.0) {
            return Err(AppError::new(EXIT_USAGE, "--width must be a positive number."));
        }
    }

    let client = CovidClient::from_env(args.source.url.as_deref())?;
    let load = pipeline::load_dataset(&client, args.source.days)?;

    let theme = if args.dark { Theme::Dark } else { Theme::Light };
    let layout = if args.width.is_some() {
        LayoutStrategy::Measured
    } else {
        LayoutStrategy::Fixed
    };
    let dims = canvas_dimensions(layout, args.width);
    let scene = build_scene(&load.dataset, &Palette::for_theme(theme), dims);
    let svg = render_svg(&scene, &load.dataset);

    std::fs::write(&args.out, svg).map_err(|e| {
        AppError::new(
            EXIT_DATA,
            format!("Failed to write '{}': {e}", args.out.display()),
        )
    })?;
    info!(path = %args.out.display(), bars = scene.bars.len(), "wrote chart");
    println!("{}", args.out.display());
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    logging::init(LogTarget::Stderr)?;

    let client = CovidClient::from_env(args.source.url.as_deref())?;
    let load = pipeline::load_dataset(&client, args.source.days)?;

    if args.json {
        let json = serde_json::to_string_pretty(load.dataset.records())
            .map_err(|e| AppError::new(EXIT_DATA, format!("Failed to encode JSON: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    println!("{}", crate::report::format_summary(&load, &client.describe()));
    println!("{}", crate::plot::render_ascii_bars(&load.dataset, args.rows));
    println!("{}", crate::report::format_table(&load.dataset));
    Ok(())
}

/// Rewrite argv so `covid` defaults to `covid tui`.
///
/// Rules:
/// - `covid`                      -> `covid tui`
/// - `covid -d 60 ...`            -> `covid tui -d 60 ...`
/// - `covid --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "render" | "show");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;
    use crate::domain::DayRange;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_launches_tui() {
        assert_eq!(rewrite_args(argv(&["covid"])), argv(&["covid", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["covid", "-d", "60"])),
            argv(&["covid", "tui", "-d", "60"])
        );
        assert_eq!(rewrite_args(argv(&["covid", "--help"])), argv(&["covid", "--help"]));
        assert_eq!(
            rewrite_args(argv(&["covid", "show", "--json"])),
            argv(&["covid", "show", "--json"])
        );
    }

    #[test]
    fn parses_day_ranges_and_layout() {
        let cli = Cli::parse_from(rewrite_args(argv(&["covid", "-d", "90", "--dark"])));
        let Command::Tui(args) = cli.command else {
            panic!("expected tui");
        };
        assert_eq!(args.source.days, DayRange::Last90);
        assert!(args.dark);
        assert_eq!(args.layout, LayoutStrategy::Measured);

        assert!(Cli::try_parse_from(argv(&["covid", "show", "-d", "45"])).is_err());
    }

    #[test]
    fn render_defaults() {
        let cli = Cli::parse_from(argv(&["covid", "render", "--width", "800"]));
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.out.to_str(), Some("covid.svg"));
        assert_eq!(args.width, Some(800.0));
        assert_eq!(args.source.days, DayRange::Last30);
    }
}
