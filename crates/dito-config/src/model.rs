use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use dito_packet::DEFAULT_MAX_CHARS;
use dito_prompt_template::Strictness;
use dito_utils::types::ConfigSource;

/// Name of the per-project configuration file.
pub const CONFIG_FILE_NAME: &str = ".ditorc.json";

pub const DEFAULT_PROVIDER: &str = "groq";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_API_KEY_ENV: &str = "GROQ_API_KEY";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const OPENAI_MODEL: &str = "gpt-4o-mini";

/// Providers accepted by the `provider` key.
pub const SUPPORTED_PROVIDERS: &[&str] = &["groq", "openai", "mock"];

/// Keys reported by [`Config::effective_config`], in file spelling.
pub(crate) const CONFIG_KEYS: &[&str] = &[
    "ignore",
    "strictness",
    "autoFix",
    "maxChars",
    "provider",
    "model",
    "baseUrl",
    "apiKeyEnv",
    "timeoutSecs",
];

/// Raw contents of `.ditorc.json`. Every key is optional; unknown keys are ignored.
///
/// Integers are read signed so that negative values surface as validation
/// errors rather than parse failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileConfig {
    pub ignore: Option<Vec<String>>,
    pub strictness: Option<String>,
    pub auto_fix: Option<bool>,
    pub max_chars: Option<i64>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub api_key_env: Option<String>,
    pub timeout_secs: Option<i64>,
}

/// Overrides taken from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub max_chars: Option<usize>,
    pub model: Option<String>,
    pub strictness: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Settings for the remote model client.
///
/// `api_key_env` holds the *name* of the environment variable carrying the
/// key, never the key itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmSettings {
    pub provider: String,
    pub model: String,
    pub base_url: String,
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Effective configuration for one dito run.
///
/// Use [`Config::discover_from()`] to layer the project's `.ditorc.json` and
/// CLI overrides over the defaults. `source_attribution` records, per key,
/// which layer supplied the value.
#[derive(Debug, Clone)]
pub struct Config {
    /// Extra gitignore-style patterns for the crawler.
    pub ignore: Vec<String>,
    pub strictness: Strictness,
    /// Parsed and reported; no automatic fixing is performed.
    pub auto_fix: bool,
    /// Character budget for the packed context.
    pub max_chars: usize,
    pub llm: LlmSettings,
    /// The config file that was applied, if any.
    pub config_path: Option<PathBuf>,
    pub source_attribution: HashMap<String, ConfigSource>,
}

impl Default for Config {
    fn default() -> Self {
        let source_attribution = CONFIG_KEYS
            .iter()
            .map(|key| ((*key).to_string(), ConfigSource::Default))
            .collect();

        Self {
            ignore: Vec::new(),
            strictness: Strictness::default(),
            auto_fix: false,
            max_chars: DEFAULT_MAX_CHARS,
            llm: LlmSettings::default(),
            config_path: None,
            source_attribution,
        }
    }
}
