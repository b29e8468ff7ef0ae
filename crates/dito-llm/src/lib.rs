//! Model backend abstraction for dito
//!
//! Every provider implements [`LlmBackend`], so the CLI submits a prompt without
//! knowing whether it goes to Groq, another OpenAI-compatible endpoint, or the
//! offline mock.

mod chat_backend;
pub(crate) mod http_client;
mod mock_backend;
mod types;

pub use chat_backend::{ChatCompletionsBackend, ChatParams};
pub use dito_utils::error::LlmError;
pub use mock_backend::{MOCK_RESPONSE, MockBackend};
pub use types::{LlmBackend, LlmInvocation, LlmResult, Message, Role};

use dito_config::LlmSettings;
use tracing::info;

/// Environment variable that forces the offline mock backend.
pub const MOCK_ENV_VAR: &str = "MOCK_AI";

/// Whether a `MOCK_AI` value asks for the mock backend: any non-blank value does.
#[must_use]
pub fn mock_requested(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Construct the backend selected by `settings` and the process environment.
///
/// `MOCK_AI` or provider `mock` yields [`MockBackend`]. Otherwise the API key is
/// read from the environment variable named by `settings.api_key_env` and
/// handed to [`ChatCompletionsBackend::new`].
///
/// # Errors
///
/// Returns `LlmError::Misconfiguration` if the key variable is unset or empty,
/// and `LlmError::Unsupported` for an unknown provider.
pub fn from_config(settings: &LlmSettings) -> Result<Box<dyn LlmBackend>, LlmError> {
    let mock_env = std::env::var(MOCK_ENV_VAR).ok();
    if mock_requested(mock_env.as_deref()) || settings.provider == "mock" {
        info!("Using mock backend");
        return Ok(Box::new(MockBackend::canned()));
    }

    match settings.provider.as_str() {
        "groq" | "openai" => {
            let api_key = read_api_key(&settings.api_key_env)?;
            let backend = ChatCompletionsBackend::new(settings, api_key)?;
            info!(
                provider = %settings.provider,
                model = %settings.model,
                "Using chat completions backend"
            );
            Ok(Box::new(backend))
        }
        other => Err(LlmError::Unsupported(format!(
            "Unknown provider '{other}'. Supported providers: groq, openai, mock"
        ))),
    }
}

fn read_api_key(var_name: &str) -> Result<String, LlmError> {
    match std::env::var(var_name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(LlmError::Misconfiguration(format!(
            "API key not found in environment variable '{var_name}'. \
             Export it, point 'apiKeyEnv' in .ditorc.json at another variable, \
             or set {MOCK_ENV_VAR}=1 to run offline."
        ))),
    }
}
