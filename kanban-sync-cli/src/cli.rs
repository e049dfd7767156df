//! CLI definition for the kanban-sync command-line interface.
//!
//! Only depends on `clap` and `std`.

use clap::{Parser, Subcommand};

/// kanban-sync - Edit a server-backed kanban board from the command line.
///
/// Every change is applied to the board immediately and then persisted to the
/// board server. If the server rejects it, the board is rolled back and the
/// error is printed.
#[derive(Parser, Debug)]
#[command(name = "kanban-sync")]
#[command(version)]
#[command(about = "Edit a server-backed kanban board")]
#[command(
    long_about = "kanban-sync edits a kanban board stored on a board server.\n\n\
    Changes are applied optimistically and rolled back when the server fails.\n\n\
    Environment variables:\n  \
    KANBAN_SYNC_BASE_URL       Server root (default http://localhost:8000)\n  \
    KANBAN_SYNC_AUTH_TOKEN     JWT sent with every request\n  \
    KANBAN_SYNC_TIMEOUT_SECS   Per-request timeout"
)]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Board to operate on
    #[arg(short, long, global = true, value_name = "ID")]
    pub board: Option<i64>,

    /// Override the server URL
    #[arg(long, global = true, value_name = "URL")]
    pub url: Option<String>,

    /// Override the auth token
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Attribute changes in the activity log to this name
    #[arg(long, global = true)]
    pub actor: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the boards on the server
    Boards,

    /// Create a board and show it
    CreateBoard {
        /// Board name
        name: String,
    },

    /// Show the board
    Show,

    /// Card commands
    Card {
        #[command(subcommand)]
        action: CardAction,
    },

    /// Column commands
    Column {
        #[command(subcommand)]
        action: ColumnAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum CardAction {
    /// Append a card to a column
    Add {
        /// Column index
        column: usize,
        /// Card text
        task: String,
    },
    /// Change the text of a card
    Edit {
        /// Column index
        column: usize,
        /// Card index within the column
        card: usize,
        /// New card text
        task: String,
    },
    /// Delete a card
    Delete {
        /// Column index
        column: usize,
        /// Card index within the column
        card: usize,
    },
    /// Move a card to the end of another column
    Move {
        /// Column index the card is in
        from_column: usize,
        /// Card index within the column
        card: usize,
        /// Destination column index
        to_column: usize,
    },
    /// Move a card to another index within its column
    Reorder {
        /// Column index
        column: usize,
        /// Current card index
        from: usize,
        /// New card index
        to: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum ColumnAction {
    /// Append a column to the board
    Add {
        /// Column name
        name: String,
    },
    /// Rename a column
    Rename {
        /// Column index
        column: usize,
        /// New name
        name: String,
    },
    /// Delete a column and its cards
    Delete {
        /// Column index
        column: usize,
    },
    /// Move a column to another index
    Reorder {
        /// Current column index
        from: usize,
        /// New column index
        to: usize,
    },
}
