//! Model resolution logic for ward.
//!
//! Resolves which provider and model to use based on CLI flags, config file,
//! and hardcoded defaults. Supports `provider/model` shorthand syntax.

use anyhow::Result;

use super::kind::{default_model_for, default_planner_for, ProviderKind};
use crate::config::Config;

use crate::constants::DEFAULT_PROVIDER;

/// Resolved provider + model pair.
pub struct ModelSelection {
    pub provider: ProviderKind,
    pub model: String,
    /// Model used for plan generation.
    pub planner_model: String,
}

/// Resolve which provider and model to use.
/// Priority: CLI flags > config.toml > defaults.
///
/// Accepts these formats:
///   --model groq/llama-3.3-70b-versatile  (provider/model shorthand, only when --provider is omitted)
///   --provider groq --model llama-3.3-70b-versatile
///   --provider groq  (uses provider's default model)
///   (nothing)  (uses config.toml, then hardcoded default)
pub fn resolve_model(
    cli_provider: Option<&str>,
    cli_model: Option<&str>,
    config: &Config,
) -> Result<ModelSelection> {
    // If --model contains a slash AND no explicit --provider, parse as provider/model shorthand
    if cli_provider.is_none() {
        if let Some(model_str) = cli_model {
            if let Some((prov, model)) = model_str.split_once('/') {
                let provider = ProviderKind::from_str(prov)?;
                return Ok(ModelSelection {
                    planner_model: planner_for(&provider, model, config),
                    provider,
                    model: model.to_string(),
                });
            }
        }
    }

    // Resolve provider
    let provider_str = cli_provider
        .or(config.provider_name())
        .unwrap_or(DEFAULT_PROVIDER);
    let provider = ProviderKind::from_str(provider_str)?;

    // Resolve model
    let model = cli_model
        .map(String::from)
        .or_else(|| config.model_name())
        .unwrap_or_else(|| default_model_for(&provider).to_string());

    Ok(ModelSelection {
        planner_model: planner_for(&provider, &model, config),
        provider,
        model,
    })
}

/// Planner model precedence: config > provider default > reasoning model.
fn planner_for(provider: &ProviderKind, model: &str, config: &Config) -> String {
    config
        .planner_model
        .clone()
        .or_else(|| default_planner_for(provider).map(String::from))
        .unwrap_or_else(|| model.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorthand_splits_provider_and_model() {
        let config = Config::default();
        let sel = resolve_model(None, Some("ollama/llama3.1"), &config).unwrap();
        assert_eq!(sel.provider, ProviderKind::Ollama);
        assert_eq!(sel.model, "llama3.1");
        // No small planner for Ollama: the reasoning model plans too.
        assert_eq!(sel.planner_model, "llama3.1");
    }

    #[test]
    fn defaults_to_groq_with_small_planner() {
        let config = Config::default();
        let sel = resolve_model(None, None, &config).unwrap();
        assert_eq!(sel.provider, ProviderKind::Groq);
        assert_eq!(sel.model, crate::constants::DEFAULT_MODEL);
        assert_eq!(sel.planner_model, crate::constants::DEFAULT_PLANNER_MODEL);
    }

    #[test]
    fn explicit_provider_keeps_slash_in_model() {
        let config = Config::default();
        let sel = resolve_model(Some("openai"), Some("org/custom-model"), &config).unwrap();
        assert_eq!(sel.provider, ProviderKind::OpenAI);
        assert_eq!(sel.model, "org/custom-model");
    }
}
