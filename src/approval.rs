//! The approval gate: human confirmation before any tool call executes.
//!
//! Provides [`ApprovalGate`] which renders the plan and the exact proposed
//! calls, then blocks on a yes/no prompt. Per-tool permission rules from
//! config decide whether the prompt is needed at all; an "always" answer
//! installs a session-level override.

use anyhow::Result;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Mutex;

use crate::format;
use crate::message::ToolCall;
use crate::planner::Plan;

/// Permission level for a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Allow,
    Ask,
    Deny,
}

/// Configuration for the permission system.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PermissionConfig {
    /// Per-tool permissions: tool_name -> Permission
    #[serde(default)]
    pub tools: HashMap<String, Permission>,
}

/// The outcome of an approval review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Cancel,
}

/// The human checkpoint between planning and execution.
///
/// Tests substitute scripted approvers so the control loop can be exercised
/// without a terminal.
pub trait Approver: Send + Sync {
    /// Present the plan and proposed calls; block until a decision exists.
    fn review(&self, plan: Option<&Plan>, calls: &[ToolCall]) -> Result<Decision>;
}

/// How a batch of proposed calls classifies before any prompt is shown.
#[derive(Debug, PartialEq)]
enum GateOutcome {
    /// Every call is allowed by rule; no prompt needed.
    AutoProceed,
    /// At least one call's tool is denied by rule.
    Blocked(String),
    /// At least one call needs explicit confirmation.
    NeedsPrompt,
}

/// Terminal-backed approval gate with per-tool permission rules.
pub struct ApprovalGate {
    config: PermissionConfig,
    /// Session-level overrides (user chose "always" during this session).
    /// Mutex because [`Approver::review`] takes `&self`.
    session_overrides: Mutex<HashMap<String, Permission>>,
}

impl ApprovalGate {
    pub fn new(config: PermissionConfig) -> Self {
        Self {
            config,
            session_overrides: Mutex::new(HashMap::new()),
        }
    }

    /// Effective permission for one tool. Session overrides take priority;
    /// unknown tools default to ask.
    fn check(&self, tool_name: &str) -> Permission {
        if let Some(perm) = self.session_overrides.lock().unwrap().get(tool_name) {
            return perm.clone();
        }
        self.config
            .tools
            .get(tool_name)
            .cloned()
            .unwrap_or(Permission::Ask)
    }

    /// Classifies a batch: denied beats everything, then ask, then allow.
    fn classify(&self, calls: &[ToolCall]) -> GateOutcome {
        let mut needs_prompt = false;
        for call in calls {
            match self.check(&call.name) {
                Permission::Deny => return GateOutcome::Blocked(call.name.clone()),
                Permission::Ask => needs_prompt = true,
                Permission::Allow => {}
            }
        }
        if needs_prompt {
            GateOutcome::NeedsPrompt
        } else {
            GateOutcome::AutoProceed
        }
    }

    /// Remembers an "always" answer for every tool in the batch.
    fn remember_always(&self, calls: &[ToolCall]) {
        let mut overrides = self.session_overrides.lock().unwrap();
        for call in calls {
            overrides.insert(call.name.clone(), Permission::Allow);
        }
    }

    /// Everything shown ahead of the prompt: plan first (when non-empty),
    /// then the exact calls the decision is about.
    fn render_review(plan: Option<&Plan>, calls: &[ToolCall]) -> String {
        let mut out = String::new();
        if let Some(plan) = plan.filter(|p| !p.is_empty()) {
            out.push_str(&format!("\n{}\n", format::format_plan(plan)));
        }
        out.push_str(&format!("\n{}", format::format_tool_calls(calls)));
        out
    }

    /// Blocks on stdin for the user's verdict. No timeout by design.
    fn prompt_user() -> Result<PromptResponse> {
        print!("\nApprove execution? [y]es / [n]o / [a]lways: ");
        io::stdout().flush()?;

        let mut response = String::new();
        io::stdin().read_line(&mut response)?;

        match response.trim().to_lowercase().as_str() {
            "y" | "yes" => Ok(PromptResponse::Yes),
            "a" | "always" => Ok(PromptResponse::Always),
            // Anything unrecognized counts as no.
            _ => Ok(PromptResponse::No),
        }
    }
}

impl Approver for ApprovalGate {
    fn review(&self, plan: Option<&Plan>, calls: &[ToolCall]) -> Result<Decision> {
        match self.classify(calls) {
            GateOutcome::Blocked(tool) => {
                println!(
                    "{} tool '{}' is disabled by configuration",
                    "blocked:".red().bold(),
                    tool
                );
                Ok(Decision::Cancel)
            }
            GateOutcome::AutoProceed => Ok(Decision::Proceed),
            GateOutcome::NeedsPrompt => {
                println!("{}", Self::render_review(plan, calls));

                match Self::prompt_user()? {
                    PromptResponse::Yes => Ok(Decision::Proceed),
                    PromptResponse::Always => {
                        self.remember_always(calls);
                        Ok(Decision::Proceed)
                    }
                    PromptResponse::No => Ok(Decision::Cancel),
                }
            }
        }
    }
}

#[derive(Debug, PartialEq)]
enum PromptResponse {
    Yes,
    No,
    Always,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(name: &str) -> ToolCall {
        ToolCall {
            id: format!("call_{}", name),
            name: name.to_string(),
            arguments: json!({}),
        }
    }

    fn gate_with(rules: &[(&str, Permission)]) -> ApprovalGate {
        let tools = rules
            .iter()
            .map(|(name, perm)| (name.to_string(), perm.clone()))
            .collect();
        ApprovalGate::new(PermissionConfig { tools })
    }

    #[test]
    fn unknown_tools_default_to_ask() {
        let gate = gate_with(&[]);
        assert_eq!(gate.classify(&[call("get_weather")]), GateOutcome::NeedsPrompt);
    }

    #[test]
    fn all_allowed_skips_the_prompt() {
        let gate = gate_with(&[
            ("get_weather", Permission::Allow),
            ("web_search", Permission::Allow),
        ]);
        assert_eq!(
            gate.classify(&[call("get_weather"), call("web_search")]),
            GateOutcome::AutoProceed
        );
    }

    #[test]
    fn any_denied_tool_blocks_the_batch() {
        let gate = gate_with(&[
            ("get_weather", Permission::Allow),
            ("web_search", Permission::Deny),
        ]);
        assert_eq!(
            gate.classify(&[call("get_weather"), call("web_search")]),
            GateOutcome::Blocked("web_search".to_string())
        );
        // Review must cancel without prompting.
        let decision = gate.review(None, &[call("web_search")]).unwrap();
        assert_eq!(decision, Decision::Cancel);
    }

    #[test]
    fn review_rendering_shows_plan_before_calls() {
        colored::control::set_override(false);
        let plan = Plan {
            steps: vec!["1. Fetch weather for London using get_weather".to_string()],
        };
        let rendered = ApprovalGate::render_review(Some(&plan), &[call("get_weather")]);
        let plan_pos = rendered.find("Agent's plan:").unwrap();
        let calls_pos = rendered.find("Proposed tool calls:").unwrap();
        assert!(plan_pos < calls_pos);
        colored::control::unset_override();
    }

    #[test]
    fn review_rendering_skips_empty_plans() {
        colored::control::set_override(false);
        let rendered = ApprovalGate::render_review(Some(&Plan::default()), &[call("web_search")]);
        assert!(!rendered.contains("Agent's plan:"));
        assert!(rendered.contains("web_search"));
        colored::control::unset_override();
    }

    #[test]
    fn always_override_outlives_the_batch() {
        let gate = gate_with(&[("get_weather", Permission::Ask)]);
        gate.remember_always(&[call("get_weather")]);
        assert_eq!(gate.classify(&[call("get_weather")]), GateOutcome::AutoProceed);
    }
}
