//! CLI argument parsing using clap.

use clap::{
    Parser,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Generate documentation data for a component, hook and utility library
#[derive(Parser, Debug)]
#[command(
    name = "docgen",
    version = env!("CARGO_PKG_VERSION"),
    about = "Generate documentation data for a component, hook and utility library",
    long_about = "Extracts components, hooks, utilities and documents into typed data modules.\n\
                  With --watch, keeps the output current as sources change.",
    next_line_help = true,
    styles = clap_cargo_style()
)]
pub struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Path to a docgen.toml (defaults to <root>/docgen.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output directory for generated modules (overrides config)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Keep running and regenerate on changes
    #[arg(short, long)]
    pub watch: bool,

    /// Show progress and timing output
    #[arg(long)]
    pub debug: bool,
}
