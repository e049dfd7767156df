//! Precondition checks shared by the mutation operations.
//!
//! Every check runs before an operation touches the board, so a failed check
//! leaves Board State exactly as it was.

use crate::error::{KanbanError, Result};
use crate::types::{Board, Card, Column};

pub(crate) fn column(board: &Board, index: usize) -> Result<&Column> {
    board
        .column(index)
        .ok_or(KanbanError::ColumnNotFound { index })
}

/// A column the server knows, so requests can address it by id
pub(crate) fn confirmed_column(board: &Board, index: usize) -> Result<&Column> {
    let column = column(board, index)?;
    if column.is_confirmed() {
        Ok(column)
    } else {
        Err(KanbanError::Unconfirmed { entity: "column" })
    }
}

pub(crate) fn card(board: &Board, column: usize, index: usize) -> Result<&Card> {
    self::column(board, column)?
        .cards
        .get(index)
        .ok_or_else(|| KanbanError::card_not_found(column, index))
}

/// A card the server knows, so requests can address it by id
pub(crate) fn confirmed_card(board: &Board, column: usize, index: usize) -> Result<&Card> {
    let card = card(board, column, index)?;
    if card.is_confirmed() {
        Ok(card)
    } else {
        Err(KanbanError::Unconfirmed { entity: "card" })
    }
}

/// Bulk updates carry ids, so every card in one must be confirmed
pub(crate) fn all_confirmed<'a>(cards: impl IntoIterator<Item = &'a Card>) -> Result<()> {
    if cards.into_iter().all(Card::is_confirmed) {
        Ok(())
    } else {
        Err(KanbanError::Unconfirmed { entity: "card" })
    }
}

pub(crate) fn not_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(KanbanError::invalid_value(field, "must not be empty"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_board;

    #[test]
    fn test_lookups() {
        let mut board = sample_board();
        assert!(column(&board, 2).is_ok());
        assert!(matches!(
            column(&board, 3),
            Err(KanbanError::ColumnNotFound { index: 3 })
        ));
        assert!(matches!(
            card(&board, 1, 0),
            Err(KanbanError::CardNotFound { column: 1, index: 0 })
        ));

        board.columns[0].cards[1].id = crate::types::CardId::TEMPORARY;
        assert!(confirmed_card(&board, 0, 0).is_ok());
        assert!(matches!(
            confirmed_card(&board, 0, 1),
            Err(KanbanError::Unconfirmed { entity: "card" })
        ));
        assert!(all_confirmed(&board.columns[0].cards).is_err());
        assert!(all_confirmed(&board.columns[2].cards).is_ok());
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("task", "write docs").is_ok());
        assert!(not_blank("task", "   ").is_err());
    }
}
