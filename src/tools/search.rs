//! Web search via the Google Custom Search API.

use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{Tool, ToolResult};
use crate::constants::{SEARCH_DEFAULT_RESULTS, SEARCH_MAX_RESULTS};

const CUSTOM_SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";

pub struct WebSearchTool {
    http: reqwest::Client,
    api_key: Option<String>,
    cse_id: Option<String>,
}

impl WebSearchTool {
    pub fn new(http: reqwest::Client, api_key: Option<String>, cse_id: Option<String>) -> Self {
        Self {
            http,
            api_key,
            cse_id,
        }
    }
}

#[derive(Deserialize)]
struct SearchInput {
    query: String,
    #[serde(default)]
    num_results: Option<u64>,
}

#[async_trait::async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the internet using Google Custom Search. \
         Returns a list of relevant webpages with title, snippet, and link."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query"
                },
                "num_results": {
                    "type": "integer",
                    "description": "Number of results to return (max 10)",
                    "default": SEARCH_DEFAULT_RESULTS
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolResult> {
        let input: SearchInput = serde_json::from_value(input)?;

        let (Some(api_key), Some(cse_id)) = (&self.api_key, &self.cse_id) else {
            return Ok(ToolResult::from_json(
                &json!({"error": "Google search not configured"}),
                true,
            ));
        };

        let num = input
            .num_results
            .unwrap_or(SEARCH_DEFAULT_RESULTS)
            .min(SEARCH_MAX_RESULTS);

        let response = self
            .http
            .get(CUSTOM_SEARCH_URL)
            .query(&[
                ("key", api_key.as_str()),
                ("cx", cse_id.as_str()),
                ("q", input.query.as_str()),
                ("num", num.to_string().as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(ToolResult::from_json(
                &json!({
                    "error": "Web search failed",
                    "details": format!("HTTP {}", response.status()),
                }),
                true,
            ));
        }

        let data: Value = response.json().await?;
        Ok(ToolResult::from_json(
            &shape_results(&input.query, &data),
            false,
        ))
    }
}

/// Projects the Custom Search payload to `{query, results: [{title, snippet, link}]}`.
pub(super) fn shape_results(query: &str, data: &Value) -> Value {
    let results: Vec<Value> = data
        .get("items")
        .and_then(|i| i.as_array())
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    json!({
                        "title": item.get("title"),
                        "snippet": item.get("snippet"),
                        "link": item.get("link"),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    json!({
        "query": query,
        "results": results,
    })
}
