use dito_utils::error::ConfigError;

use super::{Config, SUPPORTED_PROVIDERS};

/// Upper bound on the context budget.
const MAX_CHARS_LIMIT: usize = 10_000_000;

/// Upper bound on the request timeout.
const MAX_TIMEOUT_SECS: u64 = 3600;

fn invalid(key: &str, value: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.into(),
    }
}

impl Config {
    /// Validate the merged configuration.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.max_chars == 0 {
            return Err(invalid("maxChars", "must be greater than 0"));
        }
        if self.max_chars > MAX_CHARS_LIMIT {
            return Err(invalid(
                "maxChars",
                format!("exceeds maximum limit of {MAX_CHARS_LIMIT}"),
            ));
        }

        if self.llm.timeout_secs == 0 {
            return Err(invalid("timeoutSecs", "must be greater than 0"));
        }
        if self.llm.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(invalid(
                "timeoutSecs",
                format!("exceeds maximum limit of {MAX_TIMEOUT_SECS} seconds"),
            ));
        }

        if !SUPPORTED_PROVIDERS.contains(&self.llm.provider.as_str()) {
            return Err(invalid(
                "provider",
                format!(
                    "Unknown provider '{}'. Supported: {}",
                    self.llm.provider,
                    SUPPORTED_PROVIDERS.join(", ")
                ),
            ));
        }

        if self.llm.model.trim().is_empty() {
            return Err(invalid("model", "must not be empty"));
        }

        let base_url = self.llm.base_url.as_str();
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(invalid(
                "baseUrl",
                format!("'{base_url}' must start with http:// or https://"),
            ));
        }

        let env = self.llm.api_key_env.as_str();
        let valid_env = !env.is_empty()
            && !env.starts_with(|c: char| c.is_ascii_digit())
            && env.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid_env {
            return Err(invalid(
                "apiKeyEnv",
                format!("'{env}' is not a valid environment variable name"),
            ));
        }

        dito_selectors::validate_patterns(&self.ignore)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_and_oversized_budget() {
        let mut config = Config::default();
        config.max_chars = 0;
        assert!(config.validate().is_err());

        config.max_chars = MAX_CHARS_LIMIT + 1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("maximum limit"));
    }

    #[test]
    fn test_rejects_unknown_provider() {
        let mut config = Config::default();
        config.llm.provider = "carrier-pigeon".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("groq, openai, mock"));
    }

    #[test]
    fn test_rejects_bad_base_url_and_env_name() {
        let mut config = Config::default();
        config.llm.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.llm.api_key_env = "1BAD-NAME".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("apiKeyEnv"));
    }

    #[test]
    fn test_rejects_invalid_ignore_pattern() {
        let mut config = Config::default();
        config.ignore = vec!["[oops".to_string()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ignore"));
    }
}
