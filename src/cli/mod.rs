//! Command-line interface definition and dispatch for ward.
//!
//! Uses [`clap`] for argument parsing with derive macros. Each subcommand is
//! routed to its handler — session operations live in the [`session`] submodule.

mod session;

use crate::{agent, approval::ApprovalGate, chat, config, format, message::Message, provider};
use crate::tools::ToolRegistry;
use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

/// Top-level CLI structure for ward.
///
/// Parsed from command-line arguments via [`clap::Parser`]. Contains a single
/// required subcommand that determines which action ward performs.
#[derive(Parser)]
#[command(name = "ward", about = "A human-in-the-loop AI assistant for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for the ward CLI.
///
/// Each variant maps to a top-level action. The `///` doc comments on variants
/// double as `--help` text rendered by clap.
#[derive(Subcommand)]
pub enum Commands {
    /// Ask a one-shot question
    Ask {
        /// The question to ask
        prompt: Vec<String>,
        /// Model to use (overrides config)
        #[arg(short, long)]
        model: Option<String>,
        /// Provider to use (groq, openai, ollama)
        #[arg(short, long)]
        provider: Option<String>,
    },
    /// Start an interactive chat session
    Chat {
        /// Resume a specific session
        #[arg(short, long)]
        session: Option<String>,
        /// Provider to use (groq, openai, ollama)
        #[arg(long)]
        provider: Option<String>,
        /// Model to use (overrides config)
        #[arg(short, long)]
        model: Option<String>,
    },
    /// List available tools
    Tools,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Manage chat sessions
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
}

/// Subcommands for the `config` command.
///
/// Controls reading ward's TOML configuration file stored at the XDG config
/// path (`~/.config/ward/config.toml`).
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current config
    Show,
}

/// Subcommands for the `session` command.
#[derive(Subcommand)]
pub enum SessionAction {
    /// Start a new chat session
    New,
    /// List all sessions
    List,
    /// Resume a session by ID (supports partial IDs)
    Resume { id: String },
    /// Delete a session by ID (supports partial IDs)
    Delete { id: String },
}

/// Parses command-line arguments into a [`Cli`] struct.
///
/// Delegates to [`clap::Parser::parse`], which exits the process on invalid input.
pub fn parse() -> Cli {
    Cli::parse()
}

/// Dispatches the parsed CLI command to its handler.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Ask {
            prompt,
            model,
            provider: provider_name,
        } => {
            let prompt = prompt.join(" ");
            if prompt.is_empty() {
                anyhow::bail!("No prompt provided. Usage: ward ask \"your question here\"");
            }

            let config = config::Config::load()?;

            let selection =
                provider::resolve_model(provider_name.as_deref(), model.as_deref(), &config)?;

            println!(
                "{} [model: {}]",
                "ward".bold().cyan(),
                selection.model.yellow(),
            );
            println!();
            println!("{} {}", ">".green().bold(), prompt);
            println!();

            let provider = provider::Provider::from_config(&config, &selection)?;
            let tools = ToolRegistry::with_builtins(&config.tools);
            let gate = ApprovalGate::new(config.permissions.clone());

            let mut messages = Vec::new();
            if let Some(ref sp) = config.system_prompt {
                messages.push(Message::system(sp.clone()));
            }
            messages.push(Message::user(&prompt));

            let answer = agent::run_turn(
                &provider,
                &mut messages,
                &tools,
                &gate,
                crate::constants::MAX_TOOL_TURNS,
            )
            .await?;

            println!("{}", format::render_markdown_lite(&answer));
            Ok(())
        }
        Commands::Chat {
            session,
            provider: provider_name,
            model,
        } => {
            let mut config = config::Config::load()?;
            let selection =
                provider::resolve_model(provider_name.as_deref(), model.as_deref(), &config)?;
            config.model = selection.model.clone();
            chat::run_chat(config, session, &selection).await
        }
        Commands::Tools => {
            let config = config::Config::load()?;
            let tools = ToolRegistry::with_builtins(&config.tools);
            println!("{}", "Available tools:".bold());
            for def in tools.definitions() {
                println!("  {} - {}", def.name.cyan(), def.description);
            }
            Ok(())
        }
        Commands::Config { action } => {
            let config = config::Config::load()?;
            match action {
                ConfigAction::Show => {
                    let path = config::Config::config_path()?;
                    println!("{} {}", "Config path:".bold(), path.display());
                    println!();
                    let toml_str = toml::to_string_pretty(&config)?;
                    println!("{}", toml_str);
                }
            }
            Ok(())
        }
        Commands::Session { action } => session::handle_session(action).await,
    }
}
