use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::exit_codes::ExitCode;

/// Library-level error type with user-friendly reporting.
///
/// `DitoError` is returned by the orchestration layer (`dito analyze`,
/// `dito debug`). The packer and splitter never fail; everything that can
/// go wrong lives here: configuration, the remote model, and the filesystem.
///
/// # Exit Code Mapping
///
/// | Exit Code | Error Type |
/// |-----------|------------|
/// | 2 | Configuration/CLI argument errors |
/// | 10 | Model request timed out |
/// | 70 | Model provider failure |
/// | 1 | Other errors |
#[derive(Error, Debug)]
pub enum DitoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("LLM backend error: {0}")]
    Llm(#[from] LlmError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to crawl {root}: {reason}")]
    Crawl { root: String, reason: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Artifact write failed at {path}: {reason}")]
    ArtifactWriteFailed { path: String, reason: String },
}

/// Trait for providing user-friendly error reporting with context and suggestions
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get contextual information about the error
    fn context(&self) -> Option<String>;

    /// Get suggested actions to resolve the error
    fn suggestions(&self) -> Vec<String>;

    /// Get the error category for grouping similar errors
    fn category(&self) -> ErrorCategory;
}

/// Categories of errors for better organization and handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    ModelIntegration,
    FileSystem,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::ModelIntegration => write!(f, "Model Integration"),
            Self::FileSystem => write!(f, "File System"),
        }
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

impl UserFriendlyError for ConfigError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidFile(reason) => format!("Configuration file could not be read: {reason}"),
            Self::InvalidValue { key, value } => {
                format!("Configuration '{key}' has invalid value: {value}")
            }
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::InvalidFile(_) => Some(
                "dito reads .ditorc.json from the root of the analysed directory.".to_string(),
            ),
            Self::InvalidValue { key, .. } => Some(format!(
                "The '{key}' option has specific format requirements."
            )),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidFile(_) => vec![
                "Check the file permissions of .ditorc.json".to_string(),
                "Delete the file to fall back to built-in defaults".to_string(),
            ],
            Self::InvalidValue { key, .. } => match key.as_str() {
                "strictness" => vec!["Use one of 'chill', 'standard' or 'strict'".to_string()],
                "maxChars" => vec![
                    "Use a positive integer value".to_string(),
                    "The default budget is 30000 characters".to_string(),
                ],
                "timeoutSecs" => vec!["Use a positive number of seconds".to_string()],
                _ => vec!["Remove the option to use the default value".to_string()],
            },
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

/// Errors that can occur while talking to the remote model
#[derive(Debug, Error)]
pub enum LlmError {
    /// Transport-level failure (HTTP connectivity, malformed response)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Provider authentication failure (401, 403, missing API key)
    #[error("Provider authentication error: {0}")]
    ProviderAuth(String),

    /// Provider quota/rate limit exceeded (429)
    #[error("Provider quota exceeded: {0}")]
    ProviderQuota(String),

    /// Provider service outage (5xx errors)
    #[error("Provider outage: {0}")]
    ProviderOutage(String),

    /// Invocation timed out
    #[error("Timeout after {duration:?}")]
    Timeout { duration: Duration },

    /// Configuration error
    #[error("Misconfiguration: {0}")]
    Misconfiguration(String),

    /// Unsupported feature or provider
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl UserFriendlyError for LlmError {
    fn user_message(&self) -> String {
        match self {
            Self::Transport(msg) => format!("LLM transport error: {msg}"),
            Self::ProviderAuth(msg) => format!("LLM provider authentication failed: {msg}"),
            Self::ProviderQuota(msg) => format!("LLM provider quota exceeded: {msg}"),
            Self::ProviderOutage(msg) => format!("LLM provider service outage: {msg}"),
            Self::Timeout { duration } => format!("LLM request timed out after {duration:?}"),
            Self::Misconfiguration(msg) => format!("LLM configuration error: {msg}"),
            Self::Unsupported(msg) => format!("LLM feature not supported: {msg}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Transport(_) => {
                Some("The model endpoint could not be reached or answered unexpectedly.".to_string())
            }
            Self::ProviderAuth(_) => {
                Some("Authentication errors indicate a missing or invalid API key.".to_string())
            }
            Self::ProviderQuota(_) => {
                Some("Quota errors occur when rate limits or usage limits are exceeded.".to_string())
            }
            Self::ProviderOutage(_) => {
                Some("Provider outages are temporary service disruptions.".to_string())
            }
            Self::Timeout { .. } => {
                Some("Large projects produce large prompts and slow answers.".to_string())
            }
            Self::Misconfiguration(_) | Self::Unsupported(_) => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Transport(_) => vec![
                "Check your network connection".to_string(),
                "Run with --verbose to see detailed error information".to_string(),
            ],
            Self::ProviderAuth(_) | Self::Misconfiguration(_) => vec![
                "Export the API key variable named by 'apiKeyEnv' (default GROQ_API_KEY)"
                    .to_string(),
                "Set MOCK_AI=1 to try dito without a provider".to_string(),
            ],
            Self::ProviderQuota(_) | Self::ProviderOutage(_) => vec![
                "Wait a few minutes and try again".to_string(),
                "Set MOCK_AI=1 to try dito without a provider".to_string(),
            ],
            Self::Timeout { .. } => vec![
                "Increase the timeout with --timeout-secs".to_string(),
                "Lower the context budget with --max-chars".to_string(),
            ],
            Self::Unsupported(_) => vec!["Use provider 'groq', 'openai' or 'mock'".to_string()],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::ModelIntegration
    }
}

impl DitoError {
    /// Render the error for a terminal: message, context, and suggestions.
    #[must_use]
    pub fn display_for_user(&self) -> String {
        let (message, context, suggestions) = match self {
            Self::Config(err) => (err.user_message(), err.context(), err.suggestions()),
            Self::Llm(err) => (err.user_message(), err.context(), err.suggestions()),
            Self::Io(err) => (format!("I/O failure: {err}"), None, Vec::new()),
            Self::Crawl { root, reason } => (
                format!("Could not read project files under {root}: {reason}"),
                None,
                vec!["Check that the directory exists and is readable".to_string()],
            ),
            Self::FileNotFound { path } => (
                format!("File not found: {path}"),
                None,
                vec!["Check the path and try again".to_string()],
            ),
            Self::ArtifactWriteFailed { path, reason } => (
                format!("Could not write {path}: {reason}"),
                None,
                vec!["Check that the project directory is writable".to_string()],
            ),
        };

        let mut out = format!("✗ {message}");
        if let Some(context) = context {
            out.push_str(&format!("\n  {context}"));
        }
        if !suggestions.is_empty() {
            out.push_str("\n\nSuggestions:");
            for suggestion in suggestions {
                out.push_str(&format!("\n  • {suggestion}"));
            }
        }
        out
    }

    /// Category used for grouping in logs.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(err) => err.category(),
            Self::Llm(err) => err.category(),
            Self::Io(_)
            | Self::Crawl { .. }
            | Self::FileNotFound { .. }
            | Self::ArtifactWriteFailed { .. } => ErrorCategory::FileSystem,
        }
    }

    /// Map this error to the CLI exit code.
    #[must_use]
    pub fn to_exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_) => ExitCode::CLI_ARGS,
            Self::Llm(LlmError::Timeout { .. }) => ExitCode::LLM_TIMEOUT,
            Self::Llm(LlmError::Misconfiguration(_) | LlmError::Unsupported(_)) => {
                ExitCode::CLI_ARGS
            }
            Self::Llm(_) => ExitCode::LLM_FAILURE,
            Self::FileNotFound { .. } => ExitCode::CLI_ARGS,
            Self::Io(_) | Self::Crawl { .. } | Self::ArtifactWriteFailed { .. } => {
                ExitCode::INTERNAL
            }
        }
    }
}
