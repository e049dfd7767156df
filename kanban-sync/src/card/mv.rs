//! MoveCard command

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

/// Move a card to the end of another column.
///
/// Dropping onto a column always appends. The source column is reindexed,
/// and its remaining cards travel with the moved card in one bulk update.
#[operation(
    verb = "move",
    noun = "card",
    description = "Move a card to the end of another column"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct MoveCard {
    /// Index of the column the card is in
    pub from_column: usize,
    /// Index of the card within its column
    pub from_card: usize,
    /// Index of the destination column
    pub to_column: usize,
}

impl MoveCard {
    pub fn new(from_column: usize, from_card: usize, to_column: usize) -> Self {
        Self {
            from_column,
            from_card,
            to_column,
        }
    }
}

#[async_trait]
impl Execute<BoardSession, KanbanError> for MoveCard {
    async fn execute(&self, session: &BoardSession) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or_default();

        let begun = session
            .begin(|board| {
                if self.from_column == self.to_column {
                    return Err(KanbanError::invalid_value(
                        "to_column",
                        "a card dropped on its own column is a reorder",
                    ));
                }
                guards::confirmed_card(board, self.from_column, self.from_card)?;
                guards::all_confirmed(&guards::column(board, self.from_column)?.cards)?;
                let destination = guards::confirmed_column(board, self.to_column)?;
                let destination_id = destination.id;
                let slot = destination.cards.len();

                let Some(source) = board.column_mut(self.from_column) else {
                    return Err(KanbanError::ColumnNotFound {
                        index: self.from_column,
                    });
                };
                let mut card = source.cards.remove(self.from_card);
                reindex(&mut source.cards);
                let mut cards = source.cards.clone();

                card.column_id = destination_id;
                card.position_id = slot;
                cards.push(card.clone());
                if let Some(destination) = board.column_mut(self.to_column) {
                    destination.cards.push(card);
                }

                Ok((
                    cards,
                    PendingTarget::Card {
                        column: self.to_column,
                        card: slot,
                    },
                ))
            })
            .await;
        let (cards, flight) = match begun {
            Ok(begun) => begun,
            Err(error) => return ExecutionResult::Rejected { error },
        };

        let moved: Option<Card> = cards.last().cloned();
        debug!(cards = cards.len(), "moving card across columns");
        let response = session.api().update_cards(&cards).await;
        let result = session
            .settle(flight, SyncAction::UpdateCards, response, move |_, ()| {
                json!({ "card": moved, "updated": cards.len() })
            })
            .await;

        settled(self, input, start, result)
    }
}
