use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use dito_prompt_template::Strictness;
use dito_utils::error::ConfigError;
use dito_utils::types::ConfigSource;
use tracing::{debug, warn};

use super::{
    CONFIG_FILE_NAME, CliArgs, Config, FileConfig, OPENAI_API_KEY_ENV, OPENAI_BASE_URL, OPENAI_MODEL,
};

impl Config {
    /// Load configuration for the project at `project_dir` with precedence CLI > file > defaults.
    ///
    /// A missing `.ditorc.json` means defaults. A file that is not valid JSON
    /// (or not a JSON object) is reported with a warning and also yields
    /// defaults. Values that parse but make no sense are errors.
    pub fn discover_from(project_dir: &Path, cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let config_path = project_dir.join(CONFIG_FILE_NAME);
        if let Some(file_config) = Self::load_config_file(&config_path)? {
            config.apply_file(file_config)?;
            config.config_path = Some(config_path);
        }

        config.apply_cli(cli_args)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file; `Ok(None)` when absent or malformed.
    pub fn load_config_file(path: &Path) -> Result<Option<FileConfig>, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(None);
            }
            Err(e) => {
                return Err(ConfigError::InvalidFile(format!("{}: {e}", path.display())));
            }
        };

        let value: serde_json::Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to parse config file, using defaults"
                );
                return Ok(None);
            }
        };

        if !value.is_object() {
            warn!(
                path = %path.display(),
                "Config file is not a JSON object, using defaults"
            );
            return Ok(None);
        }

        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| ConfigError::InvalidFile(format!("{}: {e}", path.display())))
    }

    fn apply_file(&mut self, file: FileConfig) -> Result<(), ConfigError> {
        let source = ConfigSource::Config;

        if let Some(ignore) = file.ignore {
            self.ignore = ignore;
            self.attribute("ignore", source.clone());
        }
        if let Some(strictness) = file.strictness {
            self.strictness = parse_strictness(&strictness)?;
            self.attribute("strictness", source.clone());
        }
        if let Some(auto_fix) = file.auto_fix {
            self.auto_fix = auto_fix;
            self.attribute("autoFix", source.clone());
        }
        if let Some(max_chars) = file.max_chars {
            self.max_chars = positive("maxChars", max_chars)?;
            self.attribute("maxChars", source.clone());
        }
        if let Some(provider) = file.provider {
            self.llm.provider = provider.trim().to_lowercase();
            self.attribute("provider", source.clone());
        }
        if let Some(model) = file.model {
            self.llm.model = model;
            self.attribute("model", source.clone());
        }
        if let Some(base_url) = file.base_url {
            self.llm.base_url = base_url;
            self.attribute("baseUrl", source.clone());
        }
        if let Some(api_key_env) = file.api_key_env {
            self.llm.api_key_env = api_key_env;
            self.attribute("apiKeyEnv", source.clone());
        }
        if let Some(timeout_secs) = file.timeout_secs {
            self.llm.timeout_secs = positive("timeoutSecs", timeout_secs)? as u64;
            self.attribute("timeoutSecs", source);
        }

        self.apply_provider_defaults();
        Ok(())
    }

    /// Point defaulted endpoint settings at the chosen provider.
    fn apply_provider_defaults(&mut self) {
        if self.llm.provider != "openai" {
            return;
        }
        if self.source_of("baseUrl") == ConfigSource::Default {
            self.llm.base_url = OPENAI_BASE_URL.to_string();
        }
        if self.source_of("apiKeyEnv") == ConfigSource::Default {
            self.llm.api_key_env = OPENAI_API_KEY_ENV.to_string();
        }
        if self.source_of("model") == ConfigSource::Default {
            self.llm.model = OPENAI_MODEL.to_string();
        }
    }

    fn apply_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(max_chars) = cli.max_chars {
            self.max_chars = max_chars;
            self.attribute("maxChars", ConfigSource::Cli);
        }
        if let Some(model) = &cli.model {
            self.llm.model = model.clone();
            self.attribute("model", ConfigSource::Cli);
        }
        if let Some(strictness) = &cli.strictness {
            self.strictness = parse_strictness(strictness)?;
            self.attribute("strictness", ConfigSource::Cli);
        }
        if let Some(timeout_secs) = cli.timeout_secs {
            self.llm.timeout_secs = timeout_secs;
            self.attribute("timeoutSecs", ConfigSource::Cli);
        }
        Ok(())
    }

    fn attribute(&mut self, key: &str, source: ConfigSource) {
        self.source_attribution.insert(key.to_string(), source);
    }
}

fn parse_strictness(value: &str) -> Result<Strictness, ConfigError> {
    Strictness::parse(value).map_err(|reason| ConfigError::InvalidValue {
        key: "strictness".to_string(),
        value: reason,
    })
}

fn positive(key: &str, value: i64) -> Result<usize, ConfigError> {
    if value <= 0 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: format!("{value} (must be greater than 0)"),
        });
    }
    usize::try_from(value).map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: format!("{value} (too large)"),
    })
}
