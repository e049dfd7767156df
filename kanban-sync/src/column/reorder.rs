//! ReorderColumn command

use crate::api::SyncAction;
use crate::error::KanbanError;
use crate::guards;
use crate::pending::PendingTarget;
use crate::session::{settled, BoardSession};
use crate::types::{reindex, ColumnPatch};
use kanban_sync_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

/// Move a column to another index and send the new column order
#[operation(
    verb = "reorder",
    noun = "column",
    description = "Move a column to another index"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct ReorderColumn {
    /// Current index of the column
    pub from: usize,
    /// Index to move it to
    pub to: usize,
}

impl ReorderColumn {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }
}

#[async_trait]
impl Execute<BoardSession, KanbanError> for ReorderColumn {
    async fn execute(&self, session: &BoardSession) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or_default();

        if self.from == self.to {
            let checked = session
                .inspect(|board| guards::column(board, self.from).map(|_| ()))
                .await;
            return match checked {
                Ok(()) => ExecutionResult::Local {
                    value: json!({ "from": self.from, "to": self.to, "changed": false }),
                },
                Err(error) => ExecutionResult::Rejected { error },
            };
        }

        let begun = session
            .begin(|board| {
                guards::column(board, self.from)?;
                guards::column(board, self.to)?;
                if !board.columns.iter().all(|c| c.is_confirmed()) {
                    return Err(KanbanError::Unconfirmed { entity: "column" });
                }

                let column = board.columns.remove(self.from);
                board.columns.insert(self.to, column);
                reindex(&mut board.columns);
                let patches: Vec<ColumnPatch> =
                    board.columns.iter().map(ColumnPatch::from).collect();
                Ok((patches, PendingTarget::Column(self.to)))
            })
            .await;
        let (patches, flight) = match begun {
            Ok(begun) => begun,
            Err(error) => return ExecutionResult::Rejected { error },
        };

        debug!(from = self.from, to = self.to, "sending column order");
        let response = session.api().update_columns(&patches).await;
        let order: Vec<_> = patches.iter().map(|patch| patch.id).collect();
        let result = session
            .settle(flight, SyncAction::UpdateColumns, response, move |_, ()| {
                json!({ "order": order })
            })
            .await;

        settled(self, input, start, result)
    }
}
