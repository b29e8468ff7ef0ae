//! CLI entry point and dispatch logic
//!
//! `run()` parses arguments, sets up tracing and the tokio runtime, dispatches
//! to a command, and owns all error output.

use clap::Parser;

use super::args::{Cli, Commands, build_cli};
use super::commands;
use crate::{DitoError, ExitCode};

/// Main CLI execution function.
///
/// Returns `Err(ExitCode)` after printing the error; `main` only maps the code
/// to the process exit status.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    if let Err(e) = dito_utils::logging::init_tracing(cli.verbose) {
        eprintln!("Warning: failed to initialise logging: {e}");
    }

    let Some(command) = cli.command.clone() else {
        if build_cli().print_help().is_err() {
            return Err(ExitCode::INTERNAL);
        }
        println!();
        return Ok(());
    };

    let cli_args = cli.config_overrides();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("✗ Failed to create async runtime: {e}");
            return Err(ExitCode::INTERNAL);
        }
    };

    let result = rt.block_on(async {
        match &command {
            Commands::Analyze { directory } => {
                commands::execute_analyze_command(directory, &cli_args, cli.verbose).await
            }
            Commands::Debug { file, hint } => {
                commands::execute_debug_command(file, hint.as_deref(), &cli_args, cli.verbose)
                    .await
            }
        }
    });

    if let Err(error) = result {
        if let Some(dito_error) = error.downcast_ref::<DitoError>() {
            tracing::debug!(category = %dito_error.category(), "Command failed");
            eprintln!("{}", dito_error.display_for_user());
            return Err(dito_error.to_exit_code());
        }

        eprintln!("✗ Unexpected error: {error:#}");
        eprintln!("\n  Run with --verbose for more detailed output");
        return Err(ExitCode::INTERNAL);
    }

    Ok(())
}
