//! DeleteCard command

use crate::api::SyncAction;
use crate::error::KanbanError;
use crate::guards;
use crate::pending::PendingTarget;
use crate::session::{settled, BoardSession};
use crate::types::{reindex, Card};
use kanban_sync_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

/// Remove a card from its column.
///
/// The card disappears locally at once. Removing the last card needs no
/// reindexing, so a plain delete is sent. Otherwise the remaining cards are
/// reindexed and sent together with the deleted card (marked for deletion)
/// in one bulk update.
#[operation(
    verb = "delete",
    noun = "card",
    description = "Remove a card from its column"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteCard {
    /// Index of the column
    pub column: usize,
    /// Index of the card within the column
    pub card: usize,
}

impl DeleteCard {
    pub fn new(column: usize, card: usize) -> Self {
        Self { column, card }
    }
}

/// The request a delete turns into
#[derive(Debug)]
enum Removal {
    Single(Card),
    Bulk { deleted: Card, cards: Vec<Card> },
}

#[async_trait]
impl Execute<BoardSession, KanbanError> for DeleteCard {
    async fn execute(&self, session: &BoardSession) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or_default();

        let begun = session
            .begin(|board| {
                let target = guards::confirmed_card(board, self.column, self.card)?;
                let column = guards::column(board, self.column)?;
                let is_last = target.position_id + 1 == column.cards.len();
                if !is_last {
                    guards::all_confirmed(&column.cards)?;
                }

                let Some(column) = board.column_mut(self.column) else {
                    return Err(KanbanError::ColumnNotFound { index: self.column });
                };
                let mut deleted = column.cards.remove(self.card);

                if is_last {
                    return Ok((Removal::Single(deleted), PendingTarget::None));
                }
                reindex(&mut column.cards);
                deleted.marked_for_deletion = true;
                let mut cards = column.cards.clone();
                cards.push(deleted.clone());
                Ok((Removal::Bulk { deleted, cards }, PendingTarget::None))
            })
            .await;
        let (removal, flight) = match begun {
            Ok(begun) => begun,
            Err(error) => return ExecutionResult::Rejected { error },
        };

        let result = match removal {
            Removal::Single(card) => {
                debug!(card = %card.id, "deleting last card in column");
                let response = session.api().delete_card(card.id).await;
                session
                    .settle(flight, SyncAction::DeleteCard, response, move |_, ()| {
                        json!({ "deleted": card.id, "reindexed": 0 })
                    })
                    .await
            }
            Removal::Bulk { deleted, cards } => {
                debug!(card = %deleted.id, reindexed = cards.len() - 1, "deleting card with reindex");
                let response = session.api().update_cards(&cards).await;
                let reindexed = cards.len() - 1;
                session
                    .settle(flight, SyncAction::UpdateCards, response, move |_, ()| {
                        json!({ "deleted": deleted.id, "reindexed": reindexed })
                    })
                    .await
            }
        };

        settled(self, input, start, result)
    }
}
