//! UpdateCardTask command

use crate::api::SyncAction;
use crate::error::KanbanError;
use crate::guards;
use crate::pending::PendingTarget;
use crate::session::{settled, BoardSession};
use kanban_sync_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Change the text of a card
#[operation(
    verb = "edit",
    noun = "card",
    description = "Change the text of a card"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateCardTask {
    /// Index of the column
    pub column: usize,
    /// Index of the card within the column
    pub card: usize,
    /// The new card text
    pub task: String,
}

impl UpdateCardTask {
    pub fn new(column: usize, card: usize, task: impl Into<String>) -> Self {
        Self {
            column,
            card,
            task: task.into(),
        }
    }
}

#[async_trait]
impl Execute<BoardSession, KanbanError> for UpdateCardTask {
    async fn execute(&self, session: &BoardSession) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or_default();

        let begun = session
            .begin(|board| {
                guards::not_blank("task", &self.task)?;
                guards::confirmed_card(board, self.column, self.card)?;

                let target = PendingTarget::Card {
                    column: self.column,
                    card: self.card,
                };
                match board.card_mut(self.column, self.card) {
                    Some(card) => {
                        card.task = self.task.clone();
                        Ok((card.clone(), target))
                    }
                    None => Err(KanbanError::card_not_found(self.column, self.card)),
                }
            })
            .await;
        let (card, flight) = match begun {
            Ok(begun) => begun,
            Err(error) => return ExecutionResult::Rejected { error },
        };

        debug!(card = %card.id, "updating card");
        let response = session.api().update_card(&card).await;
        let result = session
            .settle(flight, SyncAction::UpdateCard, response, move |_, ()| {
                serde_json::to_value(&card).unwrap_or_default()
            })
            .await;

        settled(self, input, start, result)
    }
}
