//! Provider kind enumeration and default model mapping.
//!
//! Defines [`ProviderKind`] which identifies which LLM backend to use,
//! and [`default_model_for`] which returns the default model for each provider.

use anyhow::{anyhow, Result};

/// Identifies which LLM provider to use.
///
/// All supported providers speak the OpenAI-compatible chat-completions
/// protocol; the kind only decides base URL, credentials, and defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Groq (hosted open models, default).
    Groq,
    /// OpenAI (GPT models).
    OpenAI,
    /// Ollama (local models).
    Ollama,
}

impl ProviderKind {
    /// Parses a provider name string into a [`ProviderKind`].
    ///
    /// Matching is case-insensitive. Returns an error for unknown providers.
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "groq" => Ok(Self::Groq),
            "openai" => Ok(Self::OpenAI),
            "ollama" => Ok(Self::Ollama),
            other => Err(anyhow!(
                "Unknown provider: {other}. Supported: groq, openai, ollama"
            )),
        }
    }

    /// Returns the canonical lowercase name for this provider.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::OpenAI => "openai",
            Self::Ollama => "ollama",
        }
    }

    /// Returns the default API base URL for this provider.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Groq => crate::constants::GROQ_BASE_URL,
            Self::OpenAI => crate::constants::OPENAI_BASE_URL,
            Self::Ollama => crate::constants::OLLAMA_DEFAULT_BASE_URL,
        }
    }
}

/// Returns the default model identifier for a given provider.
pub fn default_model_for(provider: &ProviderKind) -> &'static str {
    match provider {
        ProviderKind::Groq => crate::constants::DEFAULT_MODEL,
        ProviderKind::OpenAI => crate::constants::DEFAULT_OPENAI_MODEL,
        ProviderKind::Ollama => crate::constants::OLLAMA_DEFAULT_MODEL,
    }
}

/// Returns the default planner model for a given provider.
///
/// Only Groq has a distinct small planner model; elsewhere the reasoning
/// model doubles as the planner.
pub fn default_planner_for(provider: &ProviderKind) -> Option<&'static str> {
    match provider {
        ProviderKind::Groq => Some(crate::constants::DEFAULT_PLANNER_MODEL),
        ProviderKind::OpenAI | ProviderKind::Ollama => None,
    }
}
