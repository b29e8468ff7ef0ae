//! Tracing setup and structured log helpers.

use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set. Otherwise verbose mode logs dito's own debug
/// events and the compact default keeps to info and above.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            if verbose {
                EnvFilter::try_new("dito=debug,info")
            } else {
                EnvFilter::try_new("dito=info,warn")
            }
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // Logs go to stderr; stdout carries the user-facing summary.
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_line_number(false)
                .with_file(false)
                .compact(),
        )
        .try_init()?;

    Ok(())
}

/// Log completion of one pipeline stage (crawl, pack, submit, persist).
pub fn log_stage_complete(stage: &str, duration_ms: u128) {
    info!(stage = %stage, duration_ms = %duration_ms, "Stage completed");
}
