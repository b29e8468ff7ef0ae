//! Command-line interface for dito
//!
//! - `args`: clap argument definitions
//! - `run`: entry point, runtime setup and error output
//! - `commands`: `analyze` and `debug` implementations

pub mod args;
mod commands;
mod run;

pub use args::{Cli, Commands, build_cli};
pub use commands::{AnalyzeOutcome, analyze_project, debug_file};
pub use run::run;
