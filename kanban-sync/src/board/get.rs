//! GetBoard command

use crate::error::KanbanError;
use crate::session::BoardSession;
use kanban_sync_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::Deserialize;
use serde_json::{json, Value};

/// Get the live board with per-column card counts
#[operation(
    verb = "get",
    noun = "board",
    description = "Retrieve the live board with card counts"
)]
#[derive(Debug, Default, Deserialize)]
pub struct GetBoard;

#[async_trait]
impl Execute<BoardSession, KanbanError> for GetBoard {
    async fn execute(&self, session: &BoardSession) -> ExecutionResult<Value, KanbanError> {
        let board = session.board().await;
        if board.id.is_temporary() {
            return ExecutionResult::Rejected {
                error: KanbanError::BoardNotLoaded,
            };
        }

        let mut result = match serde_json::to_value(&board) {
            Ok(value) => value,
            Err(error) => return ExecutionResult::Rejected { error: error.into() },
        };
        let counts: serde_json::Map<String, Value> = board
            .columns
            .iter()
            .map(|column| (column.id.to_string(), json!(column.cards.len())))
            .collect();
        result["card_counts"] = Value::Object(counts);
        result["pending"] = json!(board.has_pending());
        result["in_flight"] = json!(session.in_flight().await);

        ExecutionResult::Local { value: result }
    }
}
