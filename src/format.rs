//! Terminal display formatting: role labels, plan and tool-call rendering,
//! and a markdown-lite pass over assistant answers.

use colored::Colorize;

use crate::constants::ARGS_PREVIEW_MAX;
use crate::message::{Message, Role, ToolCall};
use crate::planner::Plan;

/// Format a message for terminal display with role label and colors.
pub fn format_message(msg: &Message) -> String {
    let label = match msg.role {
        Role::User => format!("{}", "you:".green().bold()),
        Role::Assistant => format!("{}", "ward:".cyan().bold()),
        Role::System => format!("{}", "system:".dimmed()),
        Role::Tool => format!("{}", "tool:".yellow()),
    };
    let body = match msg.role {
        Role::User => msg.text().to_string(),
        Role::Assistant => render_markdown_lite(msg.text()),
        _ => msg.text().dimmed().to_string(),
    };
    format!("{}\n{}", label, body)
}

/// Renders the plan as shown at the approval gate.
pub fn format_plan(plan: &Plan) -> String {
    let mut out = format!("{}", "Agent's plan:".bold());
    for step in &plan.steps {
        out.push_str(&format!("\n  {}", step));
    }
    out
}

/// Renders the exact proposed calls as shown at the approval gate.
pub fn format_tool_calls(calls: &[ToolCall]) -> String {
    let mut out = format!("{}", "Proposed tool calls:".bold());
    for (i, call) in calls.iter().enumerate() {
        out.push_str(&format!(
            "\n  {}. {} {}",
            i + 1,
            call.name.yellow(),
            truncate(&call.arguments.to_string(), ARGS_PREVIEW_MAX).dimmed()
        ));
    }
    out
}

/// Truncates a string on a char boundary, appending an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

/// Minimal markdown renderer for terminal output.
/// Not a full parser: handles fenced code blocks, `inline code`, and **bold**,
/// the three patterns LLM answers actually contain.
pub fn render_markdown_lite(text: &str) -> String {
    let mut out = String::new();
    let mut in_code_block = false;

    for line in text.lines() {
        if line.trim_start().starts_with("```") {
            in_code_block = !in_code_block;
            continue;
        }
        if in_code_block {
            out.push_str(&format!("  {}\n", line.dimmed()));
        } else {
            out.push_str(&render_inline(line));
            out.push('\n');
        }
    }

    if out.ends_with('\n') {
        out.pop();
    }
    out
}

/// Handles **bold** and `inline code` spans within one line.
///
/// Only complete spans count; an unmatched opener is left as literal text
/// and does not stop later spans from rendering.
fn render_inline(line: &str) -> String {
    let mut result = String::new();
    let mut rest = line;

    loop {
        let bold = rest
            .find("**")
            .and_then(|b| rest[b + 2..].find("**").map(|e| (b, b + 2 + e)));
        let code = rest
            .find('`')
            .and_then(|c| rest[c + 1..].find('`').map(|e| (c, c + 1 + e)));

        match (bold, code) {
            (Some((b, b_end)), c) if c.map_or(true, |(c_start, _)| b < c_start) => {
                result.push_str(&rest[..b]);
                result.push_str(&rest[b + 2..b_end].bold().to_string());
                rest = &rest[b_end + 2..];
            }
            (_, Some((c, c_end))) => {
                result.push_str(&rest[..c]);
                result.push_str(&rest[c + 1..c_end].dimmed().to_string());
                rest = &rest[c_end + 1..];
            }
            _ => {
                result.push_str(rest);
                break;
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truncate_is_char_safe() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
        // Multibyte chars must not be split.
        assert_eq!(truncate("日本語テスト", 3), "日本語...");
    }

    #[test]
    fn tool_calls_render_numbered() {
        colored::control::set_override(false);
        let calls = vec![
            ToolCall {
                id: "1".into(),
                name: "get_weather".into(),
                arguments: json!({"city": "London"}),
            },
            ToolCall {
                id: "2".into(),
                name: "web_search".into(),
                arguments: json!({"query": "news"}),
            },
        ];
        let rendered = format_tool_calls(&calls);
        assert!(rendered.contains("1. get_weather"));
        assert!(rendered.contains("2. web_search"));
        assert!(rendered.contains("London"));
        colored::control::unset_override();
    }

    #[test]
    fn unmatched_bold_does_not_block_code_spans() {
        colored::control::set_override(false);
        assert_eq!(
            render_inline("a ** stray and `code` span"),
            "a ** stray and code span"
        );
        // A stray backtick after a bold span is literal too.
        assert_eq!(render_inline("**bold** then ` stray"), "bold then ` stray");
        colored::control::unset_override();
    }

    #[test]
    fn markdown_lite_dims_code_blocks() {
        colored::control::set_override(false);
        let rendered = render_markdown_lite("before\n```rust\nlet x = 1;\n```\nafter");
        assert!(rendered.contains("let x = 1;"));
        assert!(!rendered.contains("```"));
        colored::control::unset_override();
    }
}
