//! Wire types for the OpenAI-compatible chat-completions protocol.
//!
//! Covers the subset ward uses: text messages, tool definitions, proposed
//! tool calls, and tool results. Tool call arguments travel as a JSON-encoded
//! *string* on the wire; [`parse_tool_calls`] decodes them into real values
//! so the rest of the crate never sees double-encoded JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::message::{Message, Role, ToolCall};
use crate::tools::ToolDefinition;

/// A chat-completions request body.
#[derive(Debug, Serialize)]
pub(super) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<WireTool>>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A single message on the wire.
#[derive(Debug, Serialize)]
pub(super) struct WireMessage {
    pub role: &'static str,
    // Assistant messages that only carry tool calls have null content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

/// A tool definition as the protocol expects it: wrapped in a
/// `{"type": "function", "function": {...}}` envelope.
#[derive(Debug, Serialize)]
pub(super) struct WireTool {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: WireFunctionDef,
}

#[derive(Debug, Serialize)]
pub(super) struct WireFunctionDef {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// A proposed tool call, in both requests (assistant history) and responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct WireToolCall {
    pub id: String,
    #[serde(rename = "type", default = "function_kind")]
    pub kind: String,
    pub function: WireFunctionCall,
}

fn function_kind() -> String {
    "function".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct WireFunctionCall {
    pub name: String,
    /// JSON object, encoded as a string per the protocol.
    pub arguments: String,
}

/// A chat-completions response body (the subset ward reads).
#[derive(Debug, Deserialize)]
pub(super) struct ChatResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChoiceMessage {
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<WireToolCall>>,
}

/// Converts ward's conversation history to wire messages.
pub(super) fn encode_history(history: &[Message]) -> Vec<WireMessage> {
    history.iter().map(encode_message).collect()
}

fn encode_message(msg: &Message) -> WireMessage {
    let role = match msg.role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::Tool => "tool",
    };
    let text = msg.text();
    let tool_calls = if msg.tool_calls.is_empty() {
        None
    } else {
        Some(
            msg.tool_calls
                .iter()
                .map(|tc| WireToolCall {
                    id: tc.id.clone(),
                    kind: "function".to_string(),
                    function: WireFunctionCall {
                        name: tc.name.clone(),
                        arguments: tc.arguments.to_string(),
                    },
                })
                .collect(),
        )
    };
    WireMessage {
        role,
        // Tool-call-only assistant turns omit content entirely.
        content: if text.is_empty() && tool_calls.is_some() {
            None
        } else {
            Some(text.to_string())
        },
        tool_calls,
        tool_call_id: msg.tool_call_id.clone(),
    }
}

/// Wraps tool definitions in the function envelope.
pub(super) fn encode_tools(tools: &[ToolDefinition]) -> Vec<WireTool> {
    tools
        .iter()
        .map(|t| WireTool {
            kind: "function",
            function: WireFunctionDef {
                name: t.name.clone(),
                description: t.description.clone(),
                parameters: t.parameters.clone(),
            },
        })
        .collect()
}

/// Decodes proposed tool calls, parsing the argument strings into values.
///
/// A malformed argument string becomes an empty object rather than a hard
/// failure; schema validation downstream will surface the problem as a tool
/// error the model can react to.
pub(super) fn parse_tool_calls(calls: Vec<WireToolCall>) -> Vec<ToolCall> {
    calls
        .into_iter()
        .map(|wc| ToolCall {
            id: wc.id,
            name: wc.function.name,
            arguments: serde_json::from_str(&wc.function.arguments)
                .unwrap_or_else(|_| Value::Object(Default::default())),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_response_with_tool_calls() {
        let body = json!({
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {
                            "name": "get_weather",
                            "arguments": "{\"city\": \"London\"}"
                        }
                    }]
                }
            }]
        });
        let resp: ChatResponse = serde_json::from_value(body).unwrap();
        let msg = resp.choices.into_iter().next().unwrap().message;
        let calls = parse_tool_calls(msg.tool_calls.unwrap());
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "get_weather");
        assert_eq!(calls[0].arguments, json!({"city": "London"}));
    }

    #[test]
    fn malformed_arguments_decode_to_empty_object() {
        let calls = parse_tool_calls(vec![WireToolCall {
            id: "call_1".into(),
            kind: "function".into(),
            function: WireFunctionCall {
                name: "get_weather".into(),
                arguments: "{not json".into(),
            },
        }]);
        assert_eq!(calls[0].arguments, json!({}));
    }

    #[test]
    fn tool_results_round_trip_the_call_id() {
        let history = vec![
            Message::assistant_with_calls(
                "",
                vec![crate::message::ToolCall {
                    id: "call_9".into(),
                    name: "web_search".into(),
                    arguments: json!({"query": "rust"}),
                }],
            ),
            Message::tool_result("call_9", "{\"results\": []}"),
        ];
        let wire = encode_history(&history);
        assert_eq!(wire[0].role, "assistant");
        assert!(wire[0].content.is_none());
        assert_eq!(wire[0].tool_calls.as_ref().unwrap()[0].id, "call_9");
        assert_eq!(wire[1].role, "tool");
        assert_eq!(wire[1].tool_call_id.as_deref(), Some("call_9"));
    }
}
