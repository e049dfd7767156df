//! AddCard command

use crate::api::SyncAction;
use crate::error::KanbanError;
use crate::guards;
use crate::pending::PendingTarget;
use crate::session::{settled, BoardSession};
use crate::types::{reindex, Board, Card, NewCard};
use kanban_sync_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Append a new card to a column.
///
/// The card shows up at once with a temporary id and a busy flag; the
/// server's copy replaces it when the create is confirmed.
#[operation(
    verb = "add",
    noun = "card",
    description = "Append a new card to a column"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddCard {
    /// Index of the column
    pub column: usize,
    /// The card text
    pub task: String,
}

impl AddCard {
    pub fn new(column: usize, task: impl Into<String>) -> Self {
        Self {
            column,
            task: task.into(),
        }
    }
}

#[async_trait]
impl Execute<BoardSession, KanbanError> for AddCard {
    async fn execute(&self, session: &BoardSession) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or_default();

        let begun = session
            .begin(|board| {
                guards::not_blank("task", &self.task)?;
                let column = guards::confirmed_column(board, self.column)?;
                let slot = column.cards.len();
                let card = Card::optimistic(self.task.clone(), column.id, slot);
                let request = NewCard::from(&card);

                if let Some(column) = board.column_mut(self.column) {
                    column.cards.push(card);
                }
                Ok((
                    (request, slot),
                    PendingTarget::Card {
                        column: self.column,
                        card: slot,
                    },
                ))
            })
            .await;
        let ((request, slot), flight) = match begun {
            Ok(begun) => begun,
            Err(error) => return ExecutionResult::Rejected { error },
        };

        debug!(column = %request.column_id, task = %request.task, "creating card");
        let response = session.api().create_card(&request).await;
        let result = session
            .settle(flight, SyncAction::CreateCard, response, |board, created| {
                confirm_created(board, slot, created)
            })
            .await;

        settled(self, input, start, result)
    }
}

/// Swap the server's card in for the optimistic one.
///
/// The optimistic card is looked up at its slot first, then by task among
/// the column's unconfirmed cards. If neither is found the server copy is
/// appended so the confirmed card is not lost from the baseline.
fn confirm_created(board: &mut Board, slot: usize, mut created: Card) -> Value {
    created.pending = false;
    let Some(column) = board
        .columns
        .iter_mut()
        .find(|c| c.id == created.column_id)
    else {
        return serde_json::to_value(&created).unwrap_or_default();
    };

    let existing = match column.cards.get(slot) {
        Some(card) if !card.is_confirmed() => Some(slot),
        _ => column
            .cards
            .iter()
            .position(|card| !card.is_confirmed() && card.task == created.task),
    };
    match existing {
        Some(index) => column.cards[index] = created,
        None => column.cards.push(created),
    }
    reindex(&mut column.cards);

    let confirmed = existing
        .and_then(|index| column.cards.get(index))
        .or_else(|| column.cards.last());
    serde_json::to_value(confirmed).unwrap_or_default()
}
