//! Plan generation for proposed tool calls.
//!
//! Runs *after* the reasoning step decides to use tools: the proposed calls
//! and the originating user query are handed to a planner model, which writes
//! a short numbered plan. The plan exists only to be shown at the approval
//! gate and is discarded once the user decides.

use anyhow::Result;

use crate::message::ToolCall;
use crate::provider::ChatBackend;

/// An ordered list of free-text plan steps. Ephemeral, one per user turn.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub steps: Vec<String>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Asks the planner model for an execution plan covering `calls`.
///
/// The plan never influences execution; a useless plan still gets shown to
/// the user as-is, and the calls themselves are rendered separately.
pub async fn plan_for(
    backend: &dyn ChatBackend,
    user_query: &str,
    calls: &[ToolCall],
) -> Result<Plan> {
    let prompt = planning_prompt(user_query, calls);
    let raw = backend
        .complete(crate::constants::PLANNER_SYSTEM_PROMPT, &prompt)
        .await?;
    Ok(parse_plan(&raw))
}

/// Builds the planning prompt from the user query and the proposed calls.
fn planning_prompt(user_query: &str, calls: &[ToolCall]) -> String {
    let calls_text: Vec<String> = calls
        .iter()
        .map(|c| format!("- {} with {}", c.name, c.arguments))
        .collect();

    format!(
        "User asked: \"{user_query}\"\n\n\
         Tools the agent intends to call (must be referenced exactly as named):\n\
         {calls}\n\n\
         IMPORTANT RULES:\n\
         - Refer ONLY to the tools listed above\n\
         - Do NOT mention websites, apps, humans, or external sources\n\
         - Do NOT suggest manual steps\n\
         - Each step must reference a listed tool or its output\n\
         - This is an internal execution plan, not advice to a user\n\n\
         Write a concise 3-step execution plan in this exact format:\n\
         1. Fetch: what data will be retrieved and using which tool\n\
         2. Reason: why this tool is required for this query\n\
         3. Output: how the tool result will be presented to the user\n\n\
         Tone: professional, system-oriented, third person, no markdown, \
         no explanations outside the three steps.",
        calls = calls_text.join("\n"),
    )
}

/// Parses the planner's reply into ordered steps.
///
/// Strips markdown emphasis and headings that small models let slip through,
/// then keeps every non-empty line as one step.
pub(crate) fn parse_plan(raw: &str) -> Plan {
    let steps = raw
        .lines()
        .map(|line| line.replace("**", "").replace('#', "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();
    Plan { steps }
}
