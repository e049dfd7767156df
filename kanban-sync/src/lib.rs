//! Optimistic kanban board engine with server reconciliation
//!
//! This crate keeps an in-memory board of columns and cards that changes the
//! instant a user acts, persists every change to a board server in the
//! background and rolls the whole board back to the last server-confirmed
//! state when a request fails.
//!
//! ## Overview
//!
//! - **Optimistic** - Every operation mutates the live board before its request is sent
//! - **Snapshot rollback** - A failed request restores the last confirmed board wholesale
//! - **Contiguous positions** - Cards in a column are always numbered `0..n` after a change
//! - **Pending flags** - Entities with a request in flight are marked busy
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use kanban_sync::{
//!     card::{AddCard, MoveCard},
//!     BoardId, BoardSession, ClientConfig, Execute, MessageQueue,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::load()?;
//! let errors = Arc::new(MessageQueue::new());
//! let session = BoardSession::from_config(&config, errors.clone())?;
//! session.initialize(BoardId::new(1)).await?;
//!
//! // The card appears at once; the server assigns its id in the background
//! AddCard::new(0, "Write release notes").execute(&session).await;
//!
//! // Drop the first card of column 0 onto column 1
//! let result = MoveCard::new(0, 0, 1).execute(&session).await;
//! if result.is_rolled_back() {
//!     for message in errors.take() {
//!         eprintln!("{message}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Known limitation
//!
//! A failure restores the snapshot as it stands when the failure settles.
//! Optimistic changes of other operations still in flight are discarded with
//! it, even if their requests later succeed.

pub mod api;
pub mod config;
mod error;
mod guards;
pub mod pending;
mod processor;
pub mod session;
pub mod snapshot;
pub mod surface;
pub mod types;

// Command modules
pub mod board;
pub mod card;
pub mod column;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

// Re-export Execute trait and types from operations crate
pub use kanban_sync_operations::{
    async_trait, Execute, ExecutionResult, LogEntry, Operation, OperationProcessor, Outcome,
};

pub use api::{BoardApi, HttpBoardApi, SyncAction};
pub use config::ClientConfig;
pub use error::{KanbanError, Result};
pub use processor::KanbanOperationProcessor;
pub use session::BoardSession;
pub use surface::{ErrorSurface, MessageQueue};

// Re-export commonly used types
pub use types::{
    Board, BoardDirectory, BoardId, BoardSummary, Card, CardId, Column, ColumnId, ColumnPatch,
    NewCard, NewColumn,
};
