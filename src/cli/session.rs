//! Session management CLI operations for ward.
//!
//! Handles listing, resuming, and deleting chat sessions through the
//! `ward session` subcommand family. Provides table-formatted output
//! and partial session ID matching (git-style short IDs).

use anyhow::Result;
use colored::Colorize;

use super::SessionAction;
use crate::{chat, config, provider, session};

/// Dispatches a session subcommand to its handler.
pub(crate) async fn handle_session(action: SessionAction) -> Result<()> {
    match action {
        SessionAction::New => {
            let config = config::Config::load()?;
            let selection = provider::resolve_model(None, None, &config)?;
            let mut config = config;
            config.model = selection.model.clone();
            chat::run_chat(config, None, &selection).await
        }
        SessionAction::List => session_list(),
        SessionAction::Resume { id } => {
            let config = config::Config::load()?;
            let selection = provider::resolve_model(None, None, &config)?;
            let mut config = config;
            config.model = selection.model.clone();
            let full_id = resolve_session_id(&id)?;
            chat::run_chat(config, Some(full_id), &selection).await
        }
        SessionAction::Delete { id } => {
            let full_id = resolve_session_id(&id)?;
            session_delete(&full_id)
        }
    }
}

/// Resolves a partial session ID to a full ID.
///
/// Matches the given prefix against all known session IDs. Returns an error
/// if zero or multiple sessions match.
pub(crate) fn resolve_session_id(partial: &str) -> Result<String> {
    let sessions = session::Session::list_all()?;
    let matches: Vec<_> = sessions
        .iter()
        .filter(|s| s.id.starts_with(partial))
        .collect();
    match matches.len() {
        0 => anyhow::bail!("No session found matching '{}'", partial),
        1 => Ok(matches[0].id.clone()),
        _ => {
            eprintln!(
                "{} Multiple sessions match '{}':",
                "ambiguous:".yellow(),
                partial
            );
            for s in &matches {
                let title = s.title.as_deref().unwrap_or("(untitled)");
                eprintln!("  {} {}", &s.id[..8], title.dimmed());
            }
            anyhow::bail!("Provide more characters to disambiguate")
        }
    }
}

/// Lists all saved sessions in a formatted table.
///
/// Displays session ID, title, message count, last-updated timestamp,
/// and model, most recently updated first.
pub(crate) fn session_list() -> Result<()> {
    let mut sessions = session::Session::list_all()?;
    if sessions.is_empty() {
        println!("{}", "No sessions found.".dimmed());
        println!("Start one with: {}", "ward chat".cyan());
        return Ok(());
    }
    sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    const TITLE_WIDTH: usize = 40;

    println!(
        "{} {} {} {} {}",
        format!("{:<10}", "ID").bold(),
        format!("{:<tw$}", "TITLE", tw = TITLE_WIDTH).bold(),
        format!("{:<6}", "MSGS").bold(),
        format!("{:<18}", "UPDATED").bold(),
        "MODEL".bold(),
    );

    for s in &sessions {
        let short_id = &s.id[..8.min(s.id.len())];
        let title_str = s.title.as_deref().unwrap_or("(untitled)");
        let title = if title_str.chars().count() > TITLE_WIDTH {
            let truncated: String = title_str.chars().take(TITLE_WIDTH - 3).collect();
            format!("{}...", truncated)
        } else {
            title_str.to_string()
        };

        // Format timestamp: parse RFC3339 -> "YYYY-MM-DD HH:MM"
        let updated = chrono::DateTime::parse_from_rfc3339(&s.updated_at)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|_| {
                if s.updated_at.len() > 16 {
                    s.updated_at[..16].to_string()
                } else {
                    s.updated_at.clone()
                }
            });

        // Pad first, then colorize to avoid ANSI escape code width issues
        let id_col = format!("{:<10}", short_id);
        let title_col = format!("{:<tw$}", title, tw = TITLE_WIDTH);
        let msgs_col = format!("{:<6}", s.message_count);
        let updated_col = format!("{:<18}", updated);

        println!(
            "{} {} {} {} {}",
            id_col.cyan(),
            title_col,
            msgs_col.yellow(),
            updated_col.dimmed(),
            s.model.dimmed(),
        );
    }
    println!();
    println!(
        "{} {} sessions. Resume with: {}",
        "total:".dimmed(),
        sessions.len(),
        "ward session resume <id>".cyan()
    );
    Ok(())
}

/// Deletes a session by its full ID.
pub(crate) fn session_delete(id: &str) -> Result<()> {
    let sessions = session::Session::list_all()?;
    let meta = sessions
        .iter()
        .find(|s| s.id == id)
        .ok_or_else(|| anyhow::anyhow!("Session not found: {}", id))?;
    let title = meta.title.as_deref().unwrap_or("(untitled)");
    println!("Deleting session {} (\"{}\")", &id[..8].cyan(), title);
    session::Session::delete(id)?;
    println!("{}", "Deleted.".green());
    Ok(())
}
