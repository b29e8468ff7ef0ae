use std::collections::BTreeMap;

use dito_utils::types::ConfigSource;

use super::Config;

impl Config {
    /// Which layer supplied `key` (file spelling, e.g. `maxChars`).
    #[must_use]
    pub fn source_of(&self, key: &str) -> ConfigSource {
        self.source_attribution
            .get(key)
            .cloned()
            .unwrap_or(ConfigSource::Default)
    }

    /// Effective configuration as `key -> (value, source)`, sorted by key.
    ///
    /// `apiKeyEnv` is reported by variable name; the key itself is never read here.
    #[must_use]
    pub fn effective_config(&self) -> BTreeMap<String, (String, String)> {
        let mut config = BTreeMap::new();

        let mut add = |key: &str, value: String| {
            config.insert(key.to_string(), (value, self.source_of(key).to_string()));
        };

        add("ignore", self.ignore.join(", "));
        add("strictness", self.strictness.to_string());
        add("autoFix", self.auto_fix.to_string());
        add("maxChars", self.max_chars.to_string());
        add("provider", self.llm.provider.clone());
        add("model", self.llm.model.clone());
        add("baseUrl", self.llm.base_url.clone());
        add("apiKeyEnv", self.llm.api_key_env.clone());
        add("timeoutSecs", self.llm.timeout_secs.to_string());

        config
    }
}
