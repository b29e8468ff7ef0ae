//! `dito debug`: single-file debugging help

use anyhow::Result;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

use dito_config::{CliArgs, Config};
use dito_llm::LlmBackend;
use dito_packet::ContextPacker;
use dito_prompt_template::build_debug_prompt;
use dito_utils::error::DitoError;
use dito_utils::logging::log_stage_complete;
use dito_utils::types::SourceFile;

use super::common::{build_invocation, print_effective_config, resolve_path};

/// Ask the model to explain and fix the bug in `file`; returns its answer.
pub async fn debug_file(
    file: &Path,
    hint: Option<&str>,
    config: &Config,
    backend: &dyn LlmBackend,
) -> Result<String, DitoError> {
    let content = std::fs::read_to_string(file).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DitoError::FileNotFound {
            path: file.display().to_string(),
        },
        _ => DitoError::Io(e),
    })?;

    let source = SourceFile::new(file.display().to_string(), content);
    let packed = ContextPacker::new(config.max_chars).pack(std::slice::from_ref(&source));
    debug!(
        chars = packed.usage().chars_used,
        truncated = packed.usage().is_lossy(),
        "Packed debug context"
    );

    let instructions = build_debug_prompt(hint);
    let invocation = build_invocation(config, &instructions, packed.content());

    let stage = Instant::now();
    let result = backend.invoke(invocation).await?;
    log_stage_complete("submit", stage.elapsed().as_millis());

    Ok(result.raw_response)
}

/// Entry point for `dito debug <file> [hint]`.
///
/// Configuration is read from the directory containing the file.
pub async fn execute_debug_command(
    file: &Path,
    hint: Option<&str>,
    cli_args: &CliArgs,
    verbose: bool,
) -> Result<()> {
    let target = resolve_path(file);
    if !target.is_file() {
        return Err(DitoError::FileNotFound {
            path: target.display().to_string(),
        }
        .into());
    }

    let config_dir = target.parent().unwrap_or_else(|| Path::new("."));
    let config = Config::discover_from(config_dir, cli_args).map_err(DitoError::from)?;

    println!("\n🐛 DITO DEBUGGER: Analyzing {}", target.display());
    if let Some(hint) = hint {
        println!("   Hint: \"{hint}\"");
    }
    println!();
    if verbose {
        print_effective_config(&config);
    }

    let backend = dito_llm::from_config(&config.llm).map_err(DitoError::from)?;
    let answer = debug_file(&target, hint, &config, backend.as_ref()).await?;

    println!("──── Debugger Output ────\n");
    println!("{answer}");
    Ok(())
}
