//! OpenAI-compatible chat-completions backend
//!
//! Works against any endpoint speaking the `/chat/completions` protocol; Groq
//! is the default. The answer is `choices[0].message.content`.

use async_trait::async_trait;
use dito_config::LlmSettings;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::LlmError;
use crate::http_client::HttpClient;
use crate::types::{LlmBackend, LlmInvocation, LlmResult, Message};

/// Request parameters sent with every invocation unless overridden by metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ChatParams {
    pub max_tokens: Option<u32>,
    pub temperature: f32,
}

impl Default for ChatParams {
    fn default() -> Self {
        Self {
            max_tokens: None,
            temperature: 0.2,
        }
    }
}

/// HTTP backend for OpenAI-compatible providers.
///
/// The API key is handed in by the caller and only ever placed in the
/// `Authorization` header.
#[derive(Clone)]
pub struct ChatCompletionsBackend {
    client: Arc<HttpClient>,
    provider: String,
    base_url: String,
    api_key: String,
    default_model: String,
    default_params: ChatParams,
}

impl ChatCompletionsBackend {
    /// Create a backend for `settings`, authenticating with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the key is blank or the HTTP
    /// client cannot be constructed.
    pub fn new(settings: &LlmSettings, api_key: String) -> Result<Self, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::Misconfiguration(format!(
                "API key in environment variable '{}' is empty",
                settings.api_key_env
            )));
        }

        Ok(Self {
            client: Arc::new(HttpClient::new()?),
            provider: settings.provider.clone(),
            base_url: settings.base_url.clone(),
            api_key,
            default_model: settings.model.clone(),
            default_params: ChatParams::default(),
        })
    }

    #[must_use]
    pub fn with_params(mut self, params: ChatParams) -> Self {
        self.default_params = params;
        self
    }

    #[cfg(test)]
    fn with_client(mut self, client: HttpClient) -> Self {
        self.client = Arc::new(client);
        self
    }

    /// Resolve model and parameters: invocation values win over backend defaults.
    fn resolve_params(&self, inv: &LlmInvocation) -> (String, ChatParams) {
        let model = if inv.model.is_empty() {
            self.default_model.clone()
        } else {
            inv.model.clone()
        };

        let max_tokens = inv
            .metadata
            .get("max_tokens")
            .and_then(serde_json::Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
            .or(self.default_params.max_tokens);

        let temperature = inv
            .metadata
            .get("temperature")
            .and_then(serde_json::Value::as_f64)
            .map_or(self.default_params.temperature, |v| v as f32);

        (
            model,
            ChatParams {
                max_tokens,
                temperature,
            },
        )
    }

    fn convert_messages(messages: &[Message]) -> Vec<ChatMessage> {
        messages
            .iter()
            .map(|msg| ChatMessage {
                role: msg.role.as_str().to_string(),
                content: msg.content.clone(),
            })
            .collect()
    }

    fn parse_result(&self, body: ChatResponse, model: String) -> Result<LlmResult, LlmError> {
        let choice = body.choices.into_iter().next().ok_or_else(|| {
            LlmError::Transport(format!("{} response missing choices[0]", self.provider))
        })?;

        let content = choice.message.content.ok_or_else(|| {
            LlmError::Transport(format!(
                "{} response missing content in choices[0]",
                self.provider
            ))
        })?;

        let model_used = body.model.unwrap_or(model);
        let mut result = LlmResult::new(content, self.provider.clone(), model_used);
        if let Some(usage) = body.usage {
            result = result.with_tokens(usage.prompt_tokens, usage.completion_tokens);
        }
        Ok(result)
    }
}

#[async_trait]
impl LlmBackend for ChatCompletionsBackend {
    async fn invoke(&self, inv: LlmInvocation) -> Result<LlmResult, LlmError> {
        let (model, params) = self.resolve_params(&inv);

        debug!(
            provider = %self.provider,
            model = %model,
            prompt_chars = inv.prompt_chars(),
            timeout_secs = inv.timeout.as_secs(),
            "Invoking chat completions backend"
        );

        let request_body = ChatRequest {
            model: model.clone(),
            messages: Self::convert_messages(&inv.messages),
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            stream: false,
        };

        let request = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&request_body);

        let response = self
            .client
            .execute_with_retry(request, inv.timeout, &self.provider)
            .await?;

        let body: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout {
                    duration: inv.timeout,
                }
            } else {
                LlmError::Transport(format!("Failed to parse {} response: {e}", self.provider))
            }
        })?;

        let result = self.parse_result(body, model)?;

        debug!(
            provider = %self.provider,
            tokens_input = ?result.tokens_input,
            tokens_output = ?result.tokens_output,
            "Chat completions invocation completed"
        );

        Ok(result)
    }

    fn provider_name(&self) -> &str {
        &self.provider
    }
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
}
