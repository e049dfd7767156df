//! DeleteColumn command

use crate::api::SyncAction;
use crate::error::KanbanError;
use crate::guards;
use crate::pending::PendingTarget;
use crate::session::{settled, BoardSession};
use crate::types::{reindex, ColumnId, ColumnPatch};
use kanban_sync_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

/// Remove a column and its cards.
///
/// Removing the last column is a plain delete; otherwise the remaining
/// columns are reindexed and sent with the deleted one in a bulk update.
#[operation(
    verb = "delete",
    noun = "column",
    description = "Remove a column and its cards"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteColumn {
    /// Index of the column
    pub column: usize,
}

impl DeleteColumn {
    pub fn new(column: usize) -> Self {
        Self { column }
    }
}

#[derive(Debug)]
enum Removal {
    Single(ColumnId),
    Bulk(Vec<ColumnPatch>),
}

#[async_trait]
impl Execute<BoardSession, KanbanError> for DeleteColumn {
    async fn execute(&self, session: &BoardSession) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or_default();

        let begun = session
            .begin(|board| {
                let target = guards::confirmed_column(board, self.column)?;
                let is_last = target.position + 1 == board.columns.len();
                if !is_last && !board.columns.iter().all(|c| c.is_confirmed()) {
                    return Err(KanbanError::Unconfirmed { entity: "column" });
                }

                let deleted = board.columns.remove(self.column);
                if is_last {
                    return Ok((Removal::Single(deleted.id), PendingTarget::None));
                }
                reindex(&mut board.columns);
                let mut patches: Vec<ColumnPatch> =
                    board.columns.iter().map(ColumnPatch::from).collect();
                patches.push(ColumnPatch::from(&deleted).marked_for_deletion());
                Ok((Removal::Bulk(patches), PendingTarget::None))
            })
            .await;
        let (removal, flight) = match begun {
            Ok(begun) => begun,
            Err(error) => return ExecutionResult::Rejected { error },
        };

        let (response, deleted, reindexed) = match removal {
            Removal::Single(id) => {
                debug!(column = %id, "deleting last column");
                (session.api().delete_column(id).await, id, 0)
            }
            Removal::Bulk(patches) => {
                let reindexed = patches.len() - 1;
                let id = patches[reindexed].id;
                debug!(column = %id, reindexed, "deleting column with reindex");
                (session.api().update_columns(&patches).await, id, reindexed)
            }
        };
        let result = session
            .settle(flight, SyncAction::DeleteColumn, response, move |_, ()| {
                json!({ "deleted": deleted, "reindexed": reindexed })
            })
            .await;

        settled(self, input, start, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MessageQueue;
    use crate::test_support::{sample_board, FakeApi, RecordedRequest};
    use std::sync::Arc;

    async fn setup() -> (Arc<FakeApi>, Arc<MessageQueue>, BoardSession) {
        let api = Arc::new(FakeApi::with_board(sample_board()));
        let surface = Arc::new(MessageQueue::new());
        let session = BoardSession::new(api.clone(), surface.clone());
        session.initialize(sample_board().id).await.unwrap();
        api.clear_requests();
        (api, surface, session)
    }

    #[tokio::test]
    async fn test_delete_last_column() {
        let (api, _surface, session) = setup().await;

        let result = DeleteColumn::new(2).execute(&session).await;

        assert!(result.is_committed());
        assert_eq!(
            api.requests(),
            vec![RecordedRequest::DeleteColumn(ColumnId::new(12))]
        );
        assert_eq!(session.board().await.columns.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_first_column_reindexes() {
        let (api, _surface, session) = setup().await;

        let result = DeleteColumn::new(0).execute(&session).await;
        assert!(result.is_committed());

        let board = session.board().await;
        assert_eq!(board.columns[0].id, ColumnId::new(11));
        assert_eq!(board.columns[0].position, 0);
        assert_eq!(board.columns[1].position, 1);

        match api.requests().as_slice() {
            [RecordedRequest::UpdateColumns(patches)] => {
                assert_eq!(patches.len(), 3);
                assert_eq!(patches[0].position_id, 0);
                assert_eq!(patches[2].id, ColumnId::new(10));
                assert!(patches[2].delete);
            }
            other => panic!("unexpected requests {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_column_failure_restores_cards() {
        let (api, surface, session) = setup().await;
        api.fail_next();

        let result = DeleteColumn::new(0).execute(&session).await;

        assert!(result.is_rolled_back());
        assert_eq!(session.board().await, sample_board());
        assert_eq!(
            surface.take(),
            vec!["Error: Unable to delete column on the server"]
        );
    }
}
