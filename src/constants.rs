//! Centralized constants for ward.
//!
//! All magic numbers, default strings, and configuration constants live here
//! so they can be changed in one place.

/// Application name used in CLI output and directory paths.
pub const APP_NAME: &str = "ward";

/// Default reasoning model (Groq).
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Default planner model (Groq). A smaller model is enough for writing
/// a three-line execution plan.
pub const DEFAULT_PLANNER_MODEL: &str = "llama-3.1-8b-instant";

/// Default reasoning model for OpenAI.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Default reasoning model for Ollama.
pub const OLLAMA_DEFAULT_MODEL: &str = "llama3.1";

/// Default provider when none is configured.
pub const DEFAULT_PROVIDER: &str = "groq";

/// Groq's OpenAI-compatible API base URL.
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// OpenAI API base URL.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default base URL for a local Ollama server (OpenAI-compatible endpoint).
pub const OLLAMA_DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";

/// Maximum tokens for LLM completions.
pub const MAX_TOKENS: u32 = 4096;

/// Maximum reasoning→execution round-trips in a single user turn.
/// The model decides when to stop requesting tools; this cap only guards
/// against a model that never does.
pub const MAX_TOOL_TURNS: usize = 6;

/// Configuration filename.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Per-project configuration filename.
pub const PROJECT_CONFIG_FILENAME: &str = "ward.toml";

/// Readline history filename.
pub const HISTORY_FILENAME: &str = "chat_history.txt";

/// Default system prompt prepended to all conversations.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are ward, a helpful AI assistant with access to tools.

- For greetings, casual conversation, or general questions, respond directly \
without using any tools.
- Use tools when the user asks for real-time, current, or latest information \
such as weather, stock prices, or news.
- Use ONLY the tools listed in your tool definitions. Never invent tool names.
- If required information is missing or ambiguous, do not guess and do not \
call any tool; ask the user instead.
- If a tool returns an error, explain the problem to the user honestly.";

/// System prompt for the planner model.
pub const PLANNER_SYSTEM_PROMPT: &str = "\
You are a planning assistant. Write professional execution plans in third \
person without markdown. Follow the requested format exactly.";

/// Tool result injected when the user declines execution, so the reasoning
/// step knows the calls never ran.
pub const DECLINED_NOTICE: &str =
    "Tool call not executed: the user declined approval for this step.";

/// Maximum characters of tool arguments shown in the approval prompt.
pub const ARGS_PREVIEW_MAX: usize = 200;

/// Maximum characters of a tool result echoed to the terminal.
pub const RESULT_PREVIEW_MAX: usize = 400;

/// Timeout for tool backend HTTP requests, in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 10;

// --- Tool defaults ---

/// Default number of web search results.
pub const SEARCH_DEFAULT_RESULTS: u64 = 5;

/// Upper bound on web search results (Google CSE free tier limit).
pub const SEARCH_MAX_RESULTS: u64 = 10;
