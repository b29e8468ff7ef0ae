//! Helpers shared by the command implementations

use camino::Utf8PathBuf;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dito_config::Config;
use dito_llm::{LlmInvocation, Message};
use dito_prompt_template::{SYSTEM_PROMPT, compose_user_message};
use dito_utils::error::DitoError;

/// Absolute form of a user-supplied path; falls back to the path as given.
pub(super) fn resolve_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

pub(super) fn to_utf8(path: PathBuf) -> Result<Utf8PathBuf, DitoError> {
    Utf8PathBuf::from_path_buf(path).map_err(|p| DitoError::Crawl {
        root: p.display().to_string(),
        reason: "path is not valid UTF-8".to_string(),
    })
}

/// System prompt plus one user message holding instructions and packed context.
pub(super) fn build_invocation(config: &Config, instructions: &str, context: &str) -> LlmInvocation {
    LlmInvocation::new(
        config.llm.model.clone(),
        Duration::from_secs(config.llm.timeout_secs),
        vec![
            Message::system(SYSTEM_PROMPT),
            Message::user(compose_user_message(instructions, context)),
        ],
    )
}

/// Print the effective configuration with the layer each value came from.
pub(super) fn print_effective_config(config: &Config) {
    println!("Effective configuration:");
    if let Some(path) = &config.config_path {
        println!("  (from {})", path.display());
    }
    for (key, (value, source)) in config.effective_config() {
        println!("  {key} = {value} [{source}]");
    }
    println!();
}
