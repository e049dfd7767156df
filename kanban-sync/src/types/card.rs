//! Card: a single task owned by exactly one column

use super::ids::{CardId, ColumnId};
use super::position::Positioned;
use serde::{Deserialize, Serialize};

/// A card on the board.
///
/// `pending` is a local busy indicator and never leaves the process.
/// `marked_for_deletion` travels as `"delete": true` inside a bulk update so
/// the server can apply a delete and the resulting position shifts together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub task: String,
    pub column_id: ColumnId,
    pub position_id: usize,
    #[serde(skip)]
    pub pending: bool,
    #[serde(rename = "delete", default, skip_serializing_if = "std::ops::Not::not")]
    pub marked_for_deletion: bool,
}

impl Card {
    pub fn new(
        id: CardId,
        task: impl Into<String>,
        column_id: ColumnId,
        position_id: usize,
    ) -> Self {
        Self {
            id,
            task: task.into(),
            column_id,
            position_id,
            pending: false,
            marked_for_deletion: false,
        }
    }

    /// A card created locally, shown busy until the server assigns its id
    pub fn optimistic(task: impl Into<String>, column_id: ColumnId, position_id: usize) -> Self {
        Self {
            pending: true,
            ..Self::new(CardId::TEMPORARY, task, column_id, position_id)
        }
    }

    /// Whether the server has confirmed this card
    pub fn is_confirmed(&self) -> bool {
        !self.id.is_temporary()
    }
}

impl Positioned for Card {
    fn position(&self) -> usize {
        self.position_id
    }

    fn set_position(&mut self, position: usize) {
        self.position_id = position;
    }
}

/// Body of `POST /api/cards/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCard {
    pub task: String,
    pub column_id: ColumnId,
    pub position_id: usize,
}

impl From<&Card> for NewCard {
    fn from(card: &Card) -> Self {
        Self {
            task: card.task.clone(),
            column_id: card.column_id,
            position_id: card.position_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_format_omits_local_flags() {
        let mut card = Card::new(CardId::new(3), "Write docs", ColumnId::new(9), 2);
        card.pending = true;

        let value = serde_json::to_value(&card).unwrap();
        assert_eq!(
            value,
            json!({"id": 3, "task": "Write docs", "column_id": 9, "position_id": 2})
        );
    }

    #[test]
    fn test_deletion_marker_serializes_as_delete() {
        let mut card = Card::new(CardId::new(3), "Old", ColumnId::new(9), 0);
        card.marked_for_deletion = true;

        let value = serde_json::to_value(&card).unwrap();
        assert_eq!(value["delete"], json!(true));
    }

    #[test]
    fn test_server_card_parses_without_local_flags() {
        let card: Card = serde_json::from_value(
            json!({"id": 11, "task": "Ship", "column_id": 2, "position_id": 0}),
        )
        .unwrap();
        assert!(card.is_confirmed());
        assert!(!card.pending);
        assert!(!card.marked_for_deletion);
    }

    #[test]
    fn test_optimistic_card_is_pending_and_unconfirmed() {
        let card = Card::optimistic("New", ColumnId::new(1), 4);
        assert!(card.pending);
        assert!(!card.is_confirmed());
        assert_eq!(NewCard::from(&card).position_id, 4);
    }
}
