//! LLM provider abstraction for ward.
//!
//! Ward speaks the OpenAI-compatible chat-completions protocol directly via
//! [`reqwest`], which lets the control loop see proposed tool calls before
//! anything executes. Groq, OpenAI, and Ollama all expose this protocol.

mod client;
mod kind;
mod resolve;
mod wire;

pub use client::{ChatOutcome, Provider, ProviderError};
pub use kind::ProviderKind;
pub use resolve::{resolve_model, ModelSelection};

use anyhow::Result;

use crate::message::Message;
use crate::tools::ToolDefinition;

/// The reasoning/planning boundary of the agent.
///
/// [`Provider`] is the production implementation; tests substitute scripted
/// backends so the control loop can be exercised offline.
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    /// One reasoning step: full history plus tool definitions in, either a
    /// final text answer or proposed tool calls out.
    async fn chat(&self, history: &[Message], tools: &[ToolDefinition]) -> Result<ChatOutcome>;

    /// One-shot completion against the planner model, used for plan
    /// generation. No tool definitions are attached.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}
