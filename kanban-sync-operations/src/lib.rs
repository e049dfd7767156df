//! # kanban-sync operations
//!
//! Every user action on a board is an operation struct whose fields are its
//! arguments. The struct declares its verb and noun with `#[operation]` and
//! implements [`Execute`] against a context.
//!
//! ## Example
//!
//! ```ignore
//! use kanban_sync_operations::*;
//!
//! #[operation(verb = "move", noun = "card", description = "Move a card to another column")]
//! #[derive(Debug, Serialize)]
//! pub struct MoveCard {
//!     pub from_column: usize,
//!     pub from_card: usize,
//!     pub to_column: usize,
//! }
//!
//! #[async_trait]
//! impl Execute<BoardSession, KanbanError> for MoveCard {
//!     async fn execute(&self, ctx: &BoardSession) -> ExecutionResult<Value, KanbanError> {
//!         // returns Local, Committed, RolledBack or Rejected
//!     }
//! }
//! ```

mod execution_result;
mod log;
mod operation;
mod processor;

pub use execution_result::ExecutionResult;
pub use log::{LogEntry, Outcome};
pub use operation::{Execute, Operation};
pub use processor::OperationProcessor;

pub use kanban_sync_operations_macros::operation;

pub use async_trait::async_trait;
pub use serde_json::Value;
