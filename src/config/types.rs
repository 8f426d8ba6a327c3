//! Struct definitions and serde defaults for ward configuration.

use crate::approval::PermissionConfig;
use serde::{Deserialize, Serialize};

/// Root configuration for ward, deserialized from `config.toml`.
///
/// Fields use serde defaults so ward can run with sensible defaults
/// when no config file exists.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Default reasoning model identifier (e.g. `"llama-3.3-70b-versatile"`).
    #[serde(default = "default_model")]
    pub model: String,
    /// Model used for plan generation. Falls back to the provider's
    /// default planner model (Groq) or the reasoning model otherwise.
    #[serde(default)]
    pub planner_model: Option<String>,
    /// Per-provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Default provider name (e.g. "groq", "openai", "ollama").
    #[serde(default)]
    pub default_provider: Option<String>,
    /// Optional system prompt prepended to all conversations.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: Option<String>,
    /// Per-tool approval permissions.
    #[serde(default)]
    pub permissions: PermissionConfig,
    /// Credentials for the remote tool backends.
    #[serde(default)]
    pub tools: ToolsConfig,
}

/// Returns the default reasoning model identifier.
///
/// Used by serde's `#[serde(default)]` attribute during deserialization.
pub(super) fn default_model() -> String {
    crate::constants::DEFAULT_MODEL.to_string()
}

/// Returns the default system prompt for new conversations.
fn default_system_prompt() -> Option<String> {
    Some(crate::constants::DEFAULT_SYSTEM_PROMPT.to_string())
}

/// Provider-specific configuration map.
///
/// Each field corresponds to a supported LLM provider. Only providers
/// the user has configured will be `Some`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProviderConfig {
    /// Configuration for the Groq API provider.
    pub groq: Option<ProviderEntry>,
    /// Configuration for the OpenAI API provider.
    pub openai: Option<ProviderEntry>,
    /// Configuration for the local Ollama provider.
    pub ollama: Option<ProviderEntry>,
}

/// Connection details for a single LLM provider.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderEntry {
    /// API key for authentication. Can also be set via environment variables.
    pub api_key: Option<String>,
    /// Custom base URL for the provider's API (useful for proxies or self-hosted instances).
    pub base_url: Option<String>,
    /// Model identifier to use with this provider, overriding the global default.
    pub model: Option<String>,
}

/// Credentials for the remote tool backends.
///
/// Values support `{env:VAR}` substitution like the provider entries.
/// A missing credential never aborts startup; the affected tool reports
/// itself as unconfigured when called.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ToolsConfig {
    /// OpenWeatherMap API key for the weather tool.
    pub openweather_api_key: Option<String>,
    /// Google API key for the web search tool.
    pub google_api_key: Option<String>,
    /// Google Custom Search Engine ID for the web search tool.
    pub google_cse_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            planner_model: None,
            provider: ProviderConfig::default(),
            default_provider: None,
            system_prompt: default_system_prompt(),
            permissions: PermissionConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}
