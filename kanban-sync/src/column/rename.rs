//! RenameColumn command

use crate::api::SyncAction;
use crate::error::KanbanError;
use crate::guards;
use crate::pending::PendingTarget;
use crate::session::{settled, BoardSession};
use crate::types::ColumnPatch;
use kanban_sync_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

/// Rename a column. An unchanged name sends nothing.
#[operation(verb = "rename", noun = "column", description = "Rename a column")]
#[derive(Debug, Deserialize, Serialize)]
pub struct RenameColumn {
    /// Index of the column
    pub column: usize,
    /// The new display name
    pub name: String,
}

impl RenameColumn {
    pub fn new(column: usize, name: impl Into<String>) -> Self {
        Self {
            column,
            name: name.into(),
        }
    }
}

#[async_trait]
impl Execute<BoardSession, KanbanError> for RenameColumn {
    async fn execute(&self, session: &BoardSession) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or_default();

        let current = session
            .inspect(|board| guards::column(board, self.column).map(|c| c.name.clone()))
            .await;
        match current {
            Ok(name) if name == self.name => {
                return ExecutionResult::Local {
                    value: json!({ "column": self.column, "name": name, "changed": false }),
                }
            }
            Ok(_) => {}
            Err(error) => return ExecutionResult::Rejected { error },
        }

        let begun = session
            .begin(|board| {
                guards::not_blank("name", &self.name)?;
                guards::confirmed_column(board, self.column)?;
                match board.column_mut(self.column) {
                    Some(column) => {
                        column.name = self.name.clone();
                        Ok((
                            ColumnPatch::from(&*column),
                            PendingTarget::Column(self.column),
                        ))
                    }
                    None => Err(KanbanError::ColumnNotFound { index: self.column }),
                }
            })
            .await;
        let (patch, flight) = match begun {
            Ok(begun) => begun,
            Err(error) => return ExecutionResult::Rejected { error },
        };

        debug!(column = %patch.id, name = %patch.name, "renaming column");
        let response = session.api().update_column(&patch).await;
        let result = session
            .settle(flight, SyncAction::UpdateColumn, response, move |_, ()| {
                json!({ "id": patch.id, "name": patch.name, "changed": true })
            })
            .await;

        settled(self, input, start, result)
    }
}
