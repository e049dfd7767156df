//! AddColumn command

use crate::api::SyncAction;
use crate::error::KanbanError;
use crate::guards;
use crate::pending::PendingTarget;
use crate::session::{settled, BoardSession};
use crate::types::{reindex, Board, Column, NewColumn};
use kanban_sync_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Add a new column at the end of the board
#[operation(
    verb = "add",
    noun = "column",
    description = "Add a new column at the end of the board"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddColumn {
    /// The column display name
    pub name: String,
}

impl AddColumn {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Execute<BoardSession, KanbanError> for AddColumn {
    async fn execute(&self, session: &BoardSession) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or_default();

        let begun = session
            .begin(|board| {
                guards::not_blank("name", &self.name)?;
                if board.id.is_temporary() {
                    return Err(KanbanError::BoardNotLoaded);
                }

                let position = board.columns.len();
                let column = Column::optimistic(self.name.clone(), position, board.id);
                let request = NewColumn::from(&column);
                board.columns.push(column);
                Ok(((request, position), PendingTarget::Column(position)))
            })
            .await;
        let ((request, position), flight) = match begun {
            Ok(begun) => begun,
            Err(error) => return ExecutionResult::Rejected { error },
        };

        debug!(name = %request.name, position, "creating column");
        let response = session.api().create_column(&request).await;
        let result = session
            .settle(flight, SyncAction::CreateColumn, response, |board, created| {
                confirm_created(board, position, created)
            })
            .await;

        settled(self, input, start, result)
    }
}

/// Swap the server's column in for the optimistic one, found at its index or
/// else by name among unconfirmed columns; appended if neither exists.
fn confirm_created(board: &mut Board, position: usize, mut created: Column) -> Value {
    created.pending = false;
    let existing = match board.columns.get(position) {
        Some(column) if !column.is_confirmed() => Some(position),
        _ => board
            .columns
            .iter()
            .position(|column| !column.is_confirmed() && column.name == created.name),
    };

    let index = match existing {
        Some(index) => {
            created.cards = std::mem::take(&mut board.columns[index].cards);
            board.columns[index] = created;
            index
        }
        None => {
            board.columns.push(created);
            board.columns.len() - 1
        }
    };
    reindex(&mut board.columns);

    let column = &board.columns[index];
    serde_json::json!({
        "id": column.id,
        "name": column.name,
        "position_id": column.position,
        "board_id": column.board_id,
    })
}
