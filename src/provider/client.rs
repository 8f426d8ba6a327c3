//! LLM provider client for the chat-completions API.
//!
//! Contains the [`Provider`] struct which owns a [`reqwest::Client`] and the
//! resolved base URL, credentials, and model names. One POST per reasoning
//! step; no streaming, no retries. The missing-API-key check happens here at
//! construction time and is fatal.

use anyhow::{Context, Result};
use thiserror::Error;

use super::wire;
use super::ModelSelection;
use crate::config::Config;
use crate::message::{Message, ToolCall};
use crate::tools::ToolDefinition;

/// Errors from the chat-completions wire protocol.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to LLM API failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("LLM API response contained no choices")]
    EmptyResponse,
}

/// What one reasoning step produced: final text, proposed tool calls, or both.
#[derive(Debug, Clone, Default)]
pub struct ChatOutcome {
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
}

impl ChatOutcome {
    /// Convenience for tests and callers: a text-only outcome.
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_calls: Vec::new(),
        }
    }
}

/// A configured LLM provider ready to handle completion requests.
///
/// Groq, OpenAI, and Ollama all sit behind the same OpenAI-compatible
/// endpoint, so one client covers every provider kind; only base URL,
/// key, and model names differ.
pub struct Provider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    planner_model: String,
}

impl Provider {
    /// Creates a new [`Provider`] from the loaded application config.
    ///
    /// Resolves the API key through ward's config precedence chain
    /// (env var → config file → substitution).
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is found for the selected provider.
    /// Ollama is exempt: local servers ignore the bearer token.
    pub fn from_config(config: &Config, selection: &ModelSelection) -> Result<Self> {
        let kind = selection.provider;
        let api_key = match kind {
            super::ProviderKind::Ollama => config
                .resolve_api_key("ollama")
                .unwrap_or_else(|| "ollama".to_string()),
            _ => config.resolve_api_key(kind.name()).with_context(|| {
                format!(
                    "No API key found for {}. Set {}_API_KEY or configure it in config.toml",
                    kind.name(),
                    kind.name().to_uppercase()
                )
            })?,
        };

        let base_url = config
            .provider_base_url(kind.name())
            .unwrap_or_else(|| kind.default_base_url().to_string());

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
            model: selection.model.clone(),
            planner_model: selection.planner_model.clone(),
        })
    }

    /// POSTs one chat-completions request and decodes the first choice.
    async fn request(
        &self,
        model: &str,
        messages: Vec<wire::WireMessage>,
        tools: Option<Vec<wire::WireTool>>,
    ) -> Result<ChatOutcome, ProviderError> {
        let request = wire::ChatRequest {
            model,
            messages,
            tools,
            temperature: 0.0,
            max_tokens: crate::constants::MAX_TOKENS,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status, body });
        }

        let decoded: wire::ChatResponse = response.json().await?;
        let choice = decoded
            .choices
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyResponse)?;

        Ok(ChatOutcome {
            text: choice.message.content.unwrap_or_default(),
            tool_calls: choice
                .message
                .tool_calls
                .map(wire::parse_tool_calls)
                .unwrap_or_default(),
        })
    }
}

#[async_trait::async_trait]
impl super::ChatBackend for Provider {
    async fn chat(&self, history: &[Message], tools: &[ToolDefinition]) -> Result<ChatOutcome> {
        let wire_tools = if tools.is_empty() {
            None
        } else {
            Some(wire::encode_tools(tools))
        };
        let outcome = self
            .request(&self.model, wire::encode_history(history), wire_tools)
            .await
            .context("LLM API call failed")?;
        Ok(outcome)
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let messages = wire::encode_history(&[Message::system(system), Message::user(prompt)]);
        let outcome = self
            .request(&self.planner_model, messages, None)
            .await
            .context("Planner LLM call failed")?;
        Ok(outcome.text)
    }
}
