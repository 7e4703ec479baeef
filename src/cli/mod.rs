//! Command-line entry point: argument parsing and the top-level run.

pub mod args;
mod run;

pub use args::Cli;
pub use run::run;
