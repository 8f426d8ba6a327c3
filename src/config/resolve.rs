//! Environment variable substitution and API key resolution.

use super::types::{Config, ProviderEntry};

impl Config {
    /// Resolve {env:VAR_NAME} patterns in string fields.
    pub(super) fn resolve_substitutions(&mut self) {
        self.model = Self::resolve_str(&self.model);
        if let Some(ref mut pm) = self.planner_model {
            *pm = Self::resolve_str(pm);
        }
        if let Some(ref mut sp) = self.system_prompt {
            *sp = Self::resolve_str(sp);
        }
        if let Some(ref mut dp) = self.default_provider {
            *dp = Self::resolve_str(dp);
        }
        Self::resolve_provider_entry(&mut self.provider.groq);
        Self::resolve_provider_entry(&mut self.provider.openai);
        Self::resolve_provider_entry(&mut self.provider.ollama);
        Self::resolve_opt(&mut self.tools.openweather_api_key);
        Self::resolve_opt(&mut self.tools.google_api_key);
        Self::resolve_opt(&mut self.tools.google_cse_id);
    }

    /// Resolves `{env:VAR}` patterns in a single provider entry's `api_key` and `base_url`.
    fn resolve_provider_entry(entry: &mut Option<ProviderEntry>) {
        if let Some(ref mut e) = entry {
            Self::resolve_opt(&mut e.api_key);
            Self::resolve_opt(&mut e.base_url);
        }
    }

    /// Resolves `{env:VAR}` in an optional string, dropping it entirely when
    /// substitution leaves it empty (an unset env var should behave like an
    /// unconfigured key, not an empty one).
    fn resolve_opt(value: &mut Option<String>) {
        if let Some(ref mut v) = value {
            *v = Self::resolve_str(v);
            if v.is_empty() {
                *value = None;
            }
        }
    }

    /// Replace {env:VAR} with the environment variable value.
    pub(super) fn resolve_str(s: &str) -> String {
        let mut result = s.to_string();
        while let Some(start) = result.find("{env:") {
            if let Some(end) = result[start..].find('}') {
                let var_name = &result[start + 5..start + end];
                let value = std::env::var(var_name).unwrap_or_default();
                result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
            } else {
                break;
            }
        }
        result
    }

    /// Resolve API key for a provider: env var first, then config value.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        // Check env var first (GROQ_API_KEY, OPENAI_API_KEY, etc.)
        let env_key = format!("{}_API_KEY", provider.to_uppercase());
        if let Ok(val) = std::env::var(&env_key) {
            if !val.is_empty() {
                return Some(val);
            }
        }

        // Fall back to config
        let entry = match provider {
            "groq" => &self.provider.groq,
            "openai" => &self.provider.openai,
            "ollama" => &self.provider.ollama,
            _ => &None,
        };
        entry.as_ref().and_then(|e| e.api_key.clone())
    }

    /// Get the configured base URL override for a provider, if any.
    pub fn provider_base_url(&self, provider: &str) -> Option<String> {
        let entry = match provider {
            "groq" => &self.provider.groq,
            "openai" => &self.provider.openai,
            "ollama" => &self.provider.ollama,
            _ => &None,
        };
        entry.as_ref().and_then(|e| e.base_url.clone())
    }

    /// Get the configured default provider name, if any.
    pub fn provider_name(&self) -> Option<&str> {
        self.default_provider.as_deref()
    }

    /// Get the model name from config, stripping provider prefix if present.
    /// Returns None if the model is the compile-time default (meaning user hasn't configured it).
    pub fn model_name(&self) -> Option<String> {
        let m = &self.model;
        if m == crate::constants::DEFAULT_MODEL {
            return None; // treat default as "not configured"
        }
        if let Some((_prov, model)) = m.split_once('/') {
            Some(model.to_string())
        } else {
            Some(m.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_str_substitutes_env_vars() {
        std::env::set_var("WARD_TEST_SUB", "abc123");
        assert_eq!(Config::resolve_str("{env:WARD_TEST_SUB}"), "abc123");
        assert_eq!(
            Config::resolve_str("key={env:WARD_TEST_SUB}!"),
            "key=abc123!"
        );
        std::env::remove_var("WARD_TEST_SUB");
    }

    #[test]
    fn resolve_str_leaves_missing_vars_empty() {
        assert_eq!(Config::resolve_str("{env:WARD_TEST_UNSET_XYZ}"), "");
    }
}
