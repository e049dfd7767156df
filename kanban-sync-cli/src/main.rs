//! kanban-sync CLI - edit a server-backed kanban board.
//!
//! Commands:
//! - `kanban-sync boards`: List boards on the server
//! - `kanban-sync create-board <name>`: Create a board and show it
//! - `kanban-sync --board <id> show`: Show a board
//! - `kanban-sync --board <id> card add|edit|delete|move|reorder ...`
//! - `kanban-sync --board <id> column add|rename|delete|reorder ...`
//!
//! Environment variables:
//! - KANBAN_SYNC_BASE_URL: Server root
//! - KANBAN_SYNC_AUTH_TOKEN: JWT sent with every request
//! - RUST_LOG: Log filter (overridden by `--debug`)
//!
//! Exit codes:
//! - 0: Success
//! - 1: The change was rolled back or rejected, or the board could not be loaded

mod cli;
mod run;
mod table;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use figment::providers::Serialized;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use kanban_sync::board::BoardCatalog;
use kanban_sync::{BoardId, BoardSession, ClientConfig, KanbanOperationProcessor, MessageQueue};
use run::Context;

/// Configuration from files and environment, with flags merged on top
fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let mut figment = ClientConfig::figment();
    if let Some(url) = &cli.url {
        figment = figment.merge(Serialized::default("base_url", url));
    }
    if let Some(token) = &cli.token {
        figment = figment.merge(Serialized::default("auth_token", token));
    }
    Ok(ClientConfig::from_figment(figment)?)
}

async fn execute(cli: Cli) -> Result<i32> {
    let config = load_config(&cli)?;
    tracing::debug!(base_url = %config.base_url, "configuration loaded");

    let errors = Arc::new(MessageQueue::new());
    let session = Arc::new(BoardSession::from_config(&config, errors.clone())?);
    let processor = match &cli.actor {
        Some(actor) => KanbanOperationProcessor::with_actor(actor.clone()),
        None => KanbanOperationProcessor::new(),
    };
    let ctx = Context {
        catalog: BoardCatalog::new(session),
        errors,
        processor,
        board: cli.board.map(BoardId::new),
        json: cli.json,
    };

    let mut stdout = std::io::stdout().lock();
    run::run(&ctx, cli.command, &mut stdout).await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing with appropriate level
    let filter = if cli.debug {
        EnvFilter::new("kanban_sync=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match execute(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use cli::{CardAction, ColumnAction, Commands};

    #[test]
    fn test_cli_parsing_card_move() {
        let cli = Cli::parse_from(["kanban-sync", "--board", "4", "card", "move", "0", "1", "2"]);
        assert_eq!(cli.board, Some(4));
        assert!(matches!(
            cli.command,
            Commands::Card {
                action: CardAction::Move {
                    from_column: 0,
                    card: 1,
                    to_column: 2
                }
            }
        ));
    }

    #[test]
    fn test_cli_parsing_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["kanban-sync", "column", "rename", "1", "Doing", "--json", "-b", "2"]);
        assert!(cli.json);
        assert_eq!(cli.board, Some(2));
        assert!(matches!(
            cli.command,
            Commands::Column {
                action: ColumnAction::Rename { column: 1, .. }
            }
        ));
    }

    #[test]
    fn test_cli_parsing_create_board() {
        let cli = Cli::parse_from(["kanban-sync", "create-board", "Roadmap"]);
        assert!(matches!(cli.command, Commands::CreateBoard { ref name } if name == "Roadmap"));
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "kanban-sync",
            "--url",
            "https://boards.example.com",
            "--token",
            "abc",
            "boards",
        ]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.base_url, "https://boards.example.com");
        assert_eq!(config.auth_token.as_deref(), Some("abc"));
    }
}
