//! Board-level types: Board, Column and their wire payloads

use super::card::Card;
use super::ids::{BoardId, ColumnId};
use super::position::{is_contiguous, Positioned};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The board: an ordered sequence of columns.
///
/// Every value here is owned, so `clone()` is a full deep copy; nothing in a
/// cloned board aliases the original.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Not part of the server payload; stamped by the session after a fetch
    #[serde(default)]
    pub id: BoardId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl Board {
    pub fn new(id: BoardId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Sort columns by position and cards by position id.
    ///
    /// The server already returns contiguous positions; this only fixes up
    /// the order they arrive in.
    pub fn normalize(&mut self) {
        self.columns.sort_by_key(|c| c.position);
        for column in &mut self.columns {
            column.cards.sort_by_key(|c| c.position_id);
        }
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn column_mut(&mut self, index: usize) -> Option<&mut Column> {
        self.columns.get_mut(index)
    }

    pub fn card(&self, column: usize, card: usize) -> Option<&Card> {
        self.columns.get(column)?.cards.get(card)
    }

    pub fn card_mut(&mut self, column: usize, card: usize) -> Option<&mut Card> {
        self.columns.get_mut(column)?.cards.get_mut(card)
    }

    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|c| c.cards.len()).sum()
    }

    /// Drop every local busy indicator
    pub fn clear_pending(&mut self) {
        for column in &mut self.columns {
            column.pending = false;
            for card in &mut column.cards {
                card.pending = false;
            }
        }
    }

    pub fn has_pending(&self) -> bool {
        self.columns
            .iter()
            .any(|c| c.pending || c.cards.iter().any(|card| card.pending))
    }

    /// Card positions are `0..n` in every column and each card points at
    /// the column holding it.
    pub fn is_consistent(&self) -> bool {
        self.columns.iter().all(|column| {
            is_contiguous(&column.cards) && column.cards.iter().all(|c| c.column_id == column.id)
        })
    }
}

/// A named, ordered group of cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub name: String,
    #[serde(rename = "position_id", alias = "position")]
    pub position: usize,
    #[serde(default)]
    pub board_id: BoardId,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(skip)]
    pub pending: bool,
}

impl Column {
    pub fn new(id: ColumnId, name: impl Into<String>, position: usize, board_id: BoardId) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            board_id,
            cards: Vec::new(),
            pending: false,
        }
    }

    /// A column created locally, shown busy until the server assigns its id
    pub fn optimistic(name: impl Into<String>, position: usize, board_id: BoardId) -> Self {
        Self {
            pending: true,
            ..Self::new(ColumnId::TEMPORARY, name, position, board_id)
        }
    }

    pub fn with_card(mut self, card: Card) -> Self {
        self.cards.push(card);
        self
    }

    pub fn is_confirmed(&self) -> bool {
        !self.id.is_temporary()
    }
}

impl Positioned for Column {
    fn position(&self) -> usize {
        self.position
    }

    fn set_position(&mut self, position: usize) {
        self.position = position;
    }
}

/// Body of `POST /api/columns/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewColumn {
    pub name: String,
    pub position_id: usize,
    pub board_id: BoardId,
}

impl From<&Column> for NewColumn {
    fn from(column: &Column) -> Self {
        Self {
            name: column.name.clone(),
            position_id: column.position,
            board_id: column.board_id,
        }
    }
}

/// A column without its cards, as sent in column updates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnPatch {
    pub id: ColumnId,
    pub name: String,
    pub position_id: usize,
    pub board_id: BoardId,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub delete: bool,
}

impl From<&Column> for ColumnPatch {
    fn from(column: &Column) -> Self {
        Self {
            id: column.id,
            name: column.name.clone(),
            position_id: column.position,
            board_id: column.board_id,
            delete: false,
        }
    }
}

impl ColumnPatch {
    pub fn marked_for_deletion(mut self) -> Self {
        self.delete = true;
        self
    }
}

/// Boards available to the user, keyed by id (`GET /api/boards/`)
pub type BoardDirectory = BTreeMap<BoardId, String>;

/// A board as returned by `POST /api/boards/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSummary {
    pub id: BoardId,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CardId;
    use serde_json::json;

    #[test]
    fn test_board_payload_parses_and_normalizes() {
        let mut board: Board = serde_json::from_value(json!({
            "user": 1,
            "name": "Sprint",
            "columns": [
                {"id": 20, "name": "Done", "position_id": 1, "board_id": 5, "cards": []},
                {"id": 10, "name": "Todo", "position_id": 0, "board_id": 5, "cards": [
                    {"id": 2, "task": "b", "column_id": 10, "position_id": 1},
                    {"id": 1, "task": "a", "column_id": 10, "position_id": 0}
                ]}
            ]
        }))
        .unwrap();

        board.normalize();

        assert_eq!(board.name, "Sprint");
        assert!(board.id.is_temporary());
        assert_eq!(board.columns[0].name, "Todo");
        assert_eq!(board.columns[0].cards[0].task, "a");
        assert!(board.is_consistent());
    }

    #[test]
    fn test_column_accepts_position_alias() {
        let column: Column =
            serde_json::from_value(json!({"id": 1, "name": "Todo", "position": 3})).unwrap();
        assert_eq!(column.position, 3);
        assert!(column.cards.is_empty());
    }

    #[test]
    fn test_clone_is_deep() {
        let board = Board::new(BoardId::new(1), "b").with_column(
            Column::new(ColumnId::new(1), "Todo", 0, BoardId::new(1))
                .with_card(Card::new(CardId::new(1), "a", ColumnId::new(1), 0)),
        );
        let mut copy = board.clone();
        copy.columns[0].cards[0].task = "changed".into();
        copy.columns[0].cards.clear();

        assert_eq!(board.columns[0].cards[0].task, "a");
    }

    #[test]
    fn test_inconsistent_column_id_detected() {
        let board = Board::new(BoardId::new(1), "b").with_column(
            Column::new(ColumnId::new(1), "Todo", 0, BoardId::new(1))
                .with_card(Card::new(CardId::new(1), "a", ColumnId::new(99), 0)),
        );
        assert!(!board.is_consistent());
    }

    #[test]
    fn test_board_directory_uses_string_keys() {
        let directory: BoardDirectory =
            serde_json::from_value(json!({"1": "Home", "4": "Work"})).unwrap();
        assert_eq!(directory.get(&BoardId::new(4)).map(String::as_str), Some("Work"));
    }

    #[test]
    fn test_column_patch_deletion_flag() {
        let column = Column::new(ColumnId::new(3), "Doing", 1, BoardId::new(1));
        let patch = ColumnPatch::from(&column).marked_for_deletion();
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value["delete"], json!(true));
        assert_eq!(value["position_id"], json!(1));
        assert!(value.get("cards").is_none());
    }
}
