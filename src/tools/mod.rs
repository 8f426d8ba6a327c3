pub mod search;
pub mod stock;
pub mod weather;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use search::WebSearchTool;
use stock::StockPriceTool;
use weather::WeatherTool;

use crate::config::ToolsConfig;

/// The result of executing a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(content: String) -> Self {
        Self {
            content,
            is_error: false,
        }
    }

    pub fn error(content: String) -> Self {
        Self {
            content,
            is_error: true,
        }
    }

    /// Wraps a JSON value as pretty-printed result text, the shape the
    /// backends hand to the reasoning step.
    pub fn from_json(value: &Value, is_error: bool) -> Self {
        let content =
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        Self { content, is_error }
    }
}

/// Definition sent to the LLM so it knows what tools are available.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value, // JSON Schema
}

/// Every tool implements this trait.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Unique name the LLM uses to call this tool.
    fn name(&self) -> &str;

    /// Human-readable description for the LLM's tool definitions.
    fn description(&self) -> &str;

    /// JSON Schema describing the tool's input parameters.
    fn schema(&self) -> Value;

    /// Execute the tool with the given JSON input.
    async fn execute(&self, input: Value) -> Result<ToolResult>;
}

/// Holds all registered tools and dispatches calls by name.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool. Called during startup.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(Arc::from(tool));
    }

    /// Produce definitions for the LLM (sent in the API request).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.schema(),
            })
            .collect()
    }

    /// Checks a proposed call against the registry before it reaches the
    /// approval gate: the tool must exist, the arguments must be an object,
    /// and every `required` schema property must be present.
    pub fn validate(&self, name: &str, arguments: &Value) -> Result<()> {
        let tool = self
            .find(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown tool: {}", name))?;

        let args = arguments
            .as_object()
            .ok_or_else(|| anyhow::anyhow!("Arguments for '{}' must be a JSON object", name))?;

        let schema = tool.schema();
        if let Some(required) = schema.get("required").and_then(|r| r.as_array()) {
            for key in required.iter().filter_map(|k| k.as_str()) {
                if !args.contains_key(key) {
                    anyhow::bail!("Missing required argument '{}' for tool '{}'", key, name);
                }
            }
        }
        Ok(())
    }

    /// Look up a tool by name and execute it.
    pub async fn execute(&self, name: &str, input: Value) -> Result<ToolResult> {
        let tool = self
            .find(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown tool: {}", name))?;
        tool.execute(input).await
    }

    fn find(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// How many tools are registered.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl ToolRegistry {
    /// Create a registry with all built-in tools.
    ///
    /// Tools with missing credentials are still registered; they report
    /// themselves as unconfigured when called, which keeps the tool list
    /// stable for the LLM.
    pub fn with_builtins(tools_config: &ToolsConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(crate::constants::HTTP_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        let mut registry = Self::new();
        registry.register(Box::new(WeatherTool::new(
            http.clone(),
            tools_config.openweather_api_key.clone(),
        )));
        registry.register(Box::new(StockPriceTool::new(http.clone())));
        registry.register(Box::new(WebSearchTool::new(
            http,
            tools_config.google_api_key.clone(),
            tools_config.google_cse_id.clone(),
        )));
        registry
    }
}

#[cfg(test)]
mod tests;
