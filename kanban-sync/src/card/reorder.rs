//! ReorderCard command

use crate::api::SyncAction;
use crate::error::KanbanError;
use crate::guards;
use crate::pending::PendingTarget;
use crate::session::{settled, BoardSession};
use crate::types::reindex;
use kanban_sync_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, trace};

/// Reorder a card within its column.
///
/// While a drag hovers (`committed == false`) the card is moved locally and
/// nothing is sent. Hovering is refused while the column holds a card the
/// server has not confirmed yet. On drop the local order is left as the hovers made it,
/// the card at `to` is marked busy and the whole column is sent in one bulk
/// update.
#[operation(
    verb = "reorder",
    noun = "card",
    description = "Reorder a card within its column"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct ReorderCard {
    /// Index of the column
    pub column: usize,
    /// Index the card is dragged from
    pub from: usize,
    /// Index the card is dragged to
    pub to: usize,
    /// Whether the drag has been dropped
    #[serde(default)]
    pub committed: bool,
}

impl ReorderCard {
    /// A hover step of a drag in progress
    pub fn hover(column: usize, from: usize, to: usize) -> Self {
        Self {
            column,
            from,
            to,
            committed: false,
        }
    }

    /// The drop that ends a drag, with the card now at `to`
    pub fn dropped(column: usize, from: usize, to: usize) -> Self {
        Self {
            column,
            from,
            to,
            committed: true,
        }
    }

    async fn hover_step(&self, session: &BoardSession) -> ExecutionResult<Value, KanbanError> {
        let moved = session
            .apply_local(|board| {
                let column = guards::column(board, self.column)?;
                // A drop could never send this column, so the hover must not change it
                guards::all_confirmed(&column.cards)?;
                let len = column.cards.len();
                for index in [self.from, self.to] {
                    if index >= len {
                        return Err(KanbanError::card_not_found(self.column, index));
                    }
                }

                let Some(column) = board.column_mut(self.column) else {
                    return Err(KanbanError::ColumnNotFound { index: self.column });
                };
                let card = column.cards.remove(self.from);
                column.cards.insert(self.to, card);
                reindex(&mut column.cards);
                Ok(json!({ "column": self.column, "from": self.from, "to": self.to }))
            })
            .await;

        match moved {
            Ok(value) => {
                trace!(column = self.column, from = self.from, to = self.to, "hover reorder");
                ExecutionResult::Local { value }
            }
            Err(error) => ExecutionResult::Rejected { error },
        }
    }
}

#[async_trait]
impl Execute<BoardSession, KanbanError> for ReorderCard {
    async fn execute(&self, session: &BoardSession) -> ExecutionResult<Value, KanbanError> {
        if !self.committed {
            return self.hover_step(session).await;
        }

        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or_default();

        let begun = session
            .begin(|board| {
                guards::card(board, self.column, self.to)?;
                let column = guards::column(board, self.column)?;
                guards::all_confirmed(&column.cards)?;
                Ok((
                    column.cards.clone(),
                    PendingTarget::Card {
                        column: self.column,
                        card: self.to,
                    },
                ))
            })
            .await;
        let (cards, flight) = match begun {
            Ok(begun) => begun,
            Err(error) => return ExecutionResult::Rejected { error },
        };

        debug!(column = self.column, cards = cards.len(), "sending column order");
        let response = session.api().update_cards(&cards).await;
        let order: Vec<_> = cards.iter().map(|card| card.id).collect();
        let result = session
            .settle(flight, SyncAction::UpdateCards, response, move |_, ()| {
                json!({ "column": self.column, "order": order })
            })
            .await;

        settled(self, input, start, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MessageQueue;
    use crate::card::{AddCard, MoveCard};
    use crate::test_support::{sample_board, FakeApi, RecordedRequest};
    use crate::types::CardId;
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
    async fn test_hover_reorders_locally_only() {
        let (api, _surface, session) = setup().await;

        let result = ReorderCard::hover(0, 0, 1).execute(&session).await;
        assert!(result.is_local());

        let board = session.board().await;
        let cards = &board.columns[0].cards;
        assert_eq!(cards[0].task, "second");
        assert_eq!(cards[0].position_id, 0);
        assert_eq!(cards[1].task, "first");
        assert_eq!(cards[1].position_id, 1);
        assert!(api.requests().is_empty());
        assert_eq!(session.in_flight().await, 0);
    }

    #[tokio::test]
    async fn test_drop_sends_whole_column() {
        let (api, _surface, session) = setup().await;

        ReorderCard::hover(0, 0, 1).execute(&session).await;
        let result = ReorderCard::dropped(0, 0, 1).execute(&session).await;
        assert!(result.is_committed());

        match api.requests().as_slice() {
            [RecordedRequest::UpdateCards(cards)] => {
                let ids: Vec<_> = cards.iter().map(|c| c.id).collect();
                assert_eq!(ids, vec![CardId::new(101), CardId::new(100)]);
                assert_eq!(cards[0].position_id, 0);
            }
            other => panic!("unexpected requests {:?}", other),
        }

        let board = session.board().await;
        assert_eq!(session.snapshot().await, board);
        assert_eq!(board.columns[0].cards[0].task, "second");
    }

    #[tokio::test]
    async fn test_drop_failure_reverts_hovered_order() {
        let (api, surface, session) = setup().await;
        api.fail_next();

        ReorderCard::hover(0, 0, 1).execute(&session).await;
        let result = ReorderCard::dropped(0, 0, 1).execute(&session).await;

        assert!(result.is_rolled_back());
        assert_eq!(session.board().await.columns[0].cards[0].task, "first");
        assert_eq!(surface.len(), 1);
    }

    #[tokio::test]
    async fn test_hover_out_of_range_is_rejected() {
        let (_api, _surface, session) = setup().await;

        let result = ReorderCard::hover(0, 0, 5).execute(&session).await;

        assert!(result.is_rejected());
        assert_eq!(session.board().await, sample_board());
    }

    #[tokio::test]
    async fn test_hover_rejected_while_card_is_being_created() {
        let (api, _surface, session) = setup().await;
        let session = Arc::new(session);
        let mut gate = api.hold_next();
        let add = {
            let session = session.clone();
            tokio::spawn(async move { AddCard::new(0, "third").execute(&*session).await })
        };
        gate.entered().await;

        let hover = ReorderCard::hover(0, 0, 1).execute(&*session).await;
        assert!(hover.is_rejected());
        let drop = ReorderCard::dropped(0, 0, 1).execute(&*session).await;
        assert!(drop.is_rejected());

        gate.release();
        assert!(add.await.unwrap().is_committed());

        let tasks: Vec<_> = session.snapshot().await.columns[0]
            .cards
            .iter()
            .map(|card| card.task.clone())
            .collect();
        assert_eq!(tasks, vec!["first", "second", "third"]);
        assert_eq!(session.board().await, session.snapshot().await);
        assert!(!api.writes().iter().any(|r| matches!(r, RecordedRequest::UpdateCards(_))));
    }

    #[tokio::test]
    async fn test_hover_during_move_clears_moved_card_flag() {
        let (api, _surface, session) = setup().await;
        let session = Arc::new(session);
        let mut gate = api.hold_next();
        let mv = {
            let session = session.clone();
            tokio::spawn(async move { MoveCard::new(0, 0, 2).execute(&*session).await })
        };
        gate.entered().await;
        assert!(session.board().await.columns[2].cards[1].pending);

        let hover = ReorderCard::hover(2, 1, 0).execute(&*session).await;
        assert!(hover.is_local());

        gate.release();
        assert!(mv.await.unwrap().is_committed());

        let board = session.board().await;
        let column: Vec<_> = board.columns[2]
            .cards
            .iter()
            .map(|card| (card.task.as_str(), card.pending))
            .collect();
        assert_eq!(column, vec![("first", false), ("shipped", false)]);
        assert!(!board.has_pending());
        assert_eq!(session.in_flight().await, 0);
    }
}
