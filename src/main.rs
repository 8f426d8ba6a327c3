//! Entry point for ward, a human-in-the-loop AI assistant for the terminal.
//!
//! This binary loads environment variables, parses CLI arguments via [`cli`],
//! and dispatches to the appropriate subcommand handler.

mod agent;
mod approval;
mod chat;
mod cli;
mod config;
mod constants;
mod format;
mod message;
mod planner;
mod provider;
mod session;
mod tools;

use anyhow::Result;

/// Runs the ward CLI.
///
/// Loads `.env` files (silently ignored if absent), parses command-line
/// arguments into a [`cli::Cli`] struct, and dispatches the chosen
/// subcommand via [`cli::run`].
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = cli::parse();
    cli::run(cli).await
}
