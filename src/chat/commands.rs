//! Slash command handlers for the chat REPL.
//!
//! Dispatches `/history`, `/clear`, `/tools`, and `/help` commands.
//! Returns a [`CommandAction`] so the REPL loop can decide how to proceed.

use anyhow::Result;
use colored::Colorize;

use crate::format;
use crate::message::Role;
use crate::session::Session;
use crate::tools::ToolRegistry;

/// Action returned by slash command handling.
pub(crate) enum CommandAction {
    /// Command was handled successfully; continue the REPL loop.
    Continue,
    /// Unknown command was entered.
    Unknown(String),
}

/// Dispatch and handle a slash command.
pub(crate) fn handle_slash_command(
    command: &str,
    session: &mut Session,
    tools: &ToolRegistry,
) -> Result<CommandAction> {
    match command {
        "/history" => {
            for msg in &session.messages {
                if msg.role == Role::System {
                    continue;
                }
                println!("{}", format::format_message(msg));
                println!();
            }
            Ok(CommandAction::Continue)
        }
        "/clear" => {
            session.clear()?;
            println!("{}", "History cleared.".dimmed());
            Ok(CommandAction::Continue)
        }
        "/tools" => {
            println!("{}", "Available tools:".bold());
            for def in tools.definitions() {
                println!("  {} - {}", def.name.cyan(), def.description);
            }
            Ok(CommandAction::Continue)
        }
        "/help" => {
            println!("{}", "Commands:".bold());
            println!("  {} - show conversation history", "/history".cyan());
            println!("  {} - clear conversation", "/clear".cyan());
            println!("  {} - list available tools", "/tools".cyan());
            println!("  {} - show this help", "/help".cyan());
            println!("  {} - exit", "Ctrl+D".cyan());
            Ok(CommandAction::Continue)
        }
        _ => Ok(CommandAction::Unknown(command.to_string())),
    }
}
