//! Interactive chat REPL for ward.
//!
//! Provides a multi-turn conversation loop using [`rustyline`] for readline
//! support (history, line editing). Each user input runs through the
//! approval-gated control loop in [`crate::agent`]; the full conversation
//! history is sent with each request so the LLM maintains context across
//! turns.

mod commands;

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::approval::ApprovalGate;
use crate::config::Config;
use crate::format;
use crate::message::Message;
use crate::provider::{ModelSelection, Provider};
use crate::session::Session;
use crate::tools::ToolRegistry;

/// Runs the interactive chat REPL.
///
/// Loads the provider and tool registry, then enters a readline loop. Each
/// user input becomes one control-loop turn: the assistant may propose tool
/// calls, which are planned, shown for approval, and executed only on a yes.
/// Completed turns are persisted to the [`Session`] as JSONL; failed turns
/// are rolled back so the input can be retried.
///
/// # Readline behavior
///
/// - **Ctrl+C**: cancels current input, stays in REPL
/// - **Ctrl+D**: exits cleanly with "goodbye."
/// - Readline history is persisted to `~/.cache/ward/chat_history.txt`
pub async fn run_chat(
    config: Config,
    session_id: Option<String>,
    selection: &ModelSelection,
) -> Result<()> {
    let provider = Provider::from_config(&config, selection)?;
    let tools = ToolRegistry::with_builtins(&config.tools);
    let gate = ApprovalGate::new(config.permissions.clone());

    // Create or resume session
    let mut session = if let Some(ref id) = session_id {
        let s = Session::load(id)?;
        let short: String = s.id.chars().take(8).collect();
        println!(
            "{} [session: {}] [model: {}]",
            "resuming".bold().cyan(),
            short.yellow(),
            s.model.yellow(),
        );
        println!();
        // Display previous messages
        for msg in &s.messages {
            if msg.role == crate::message::Role::System {
                continue;
            }
            println!("{}", format::format_message(msg));
            println!();
        }
        s
    } else {
        let mut s = Session::new(&selection.model)?;
        let short = &s.id[..8];
        println!(
            "{} [session: {}] [model: {}] (Ctrl+D to exit)",
            "ward chat".bold().cyan(),
            short.yellow(),
            selection.model.yellow(),
        );
        println!();
        if let Some(ref sp) = config.system_prompt {
            s.append(Message::system(sp.clone()))?;
        }
        s
    };

    // Set up readline with persistent history
    let mut rl = DefaultEditor::new()?;
    let history_path = Config::cache_dir()?.join(crate::constants::HISTORY_FILENAME);
    if history_path.exists() {
        let _ = rl.load_history(&history_path);
    }

    loop {
        let readline = rl.readline(&format!("{} ", ">".green().bold()));

        match readline {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }

                // Slash commands
                if line.starts_with('/') {
                    match commands::handle_slash_command(&line, &mut session, &tools)? {
                        commands::CommandAction::Continue => continue,
                        commands::CommandAction::Unknown(cmd) => {
                            println!("{} Unknown command: {}", "?".yellow(), cmd);
                            continue;
                        }
                    }
                }

                let _ = rl.add_history_entry(&line);

                // The turn is persisted only once it completes; a failed
                // turn rolls the in-memory history back so the input can
                // be retried without a dangling user message.
                let pre_turn = session.messages.len();
                session.messages.push(Message::user(&line));
                println!();

                match crate::agent::run_turn(
                    &provider,
                    &mut session.messages,
                    &tools,
                    &gate,
                    crate::constants::MAX_TOOL_TURNS,
                )
                .await
                {
                    Ok(answer) => {
                        println!("{}", format::render_markdown_lite(&answer));
                        session.flush_from(pre_turn)?;
                    }
                    Err(e) => {
                        session.messages.truncate(pre_turn);
                        eprintln!("{} {}", "error:".red().bold(), e);
                    }
                }
                println!();
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".dimmed());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "goodbye.".dimmed());
                break;
            }
            Err(e) => {
                eprintln!("{} {}", "error:".red().bold(), e);
                break;
            }
        }
    }

    // Save readline history
    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let _ = rl.save_history(&history_path);

    Ok(())
}
