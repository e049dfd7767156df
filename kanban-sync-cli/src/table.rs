//! Table rendering for boards and board lists.

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use kanban_sync::{Board, BoardDirectory, Card};

/// Create a table with the shared preset
pub fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Truncate a string to `max` characters, appending "..." if truncated.
///
/// Safe for multi-byte (UTF-8) strings.
pub fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn card_cell(card: &Card) -> String {
    let task = truncate_str(&card.task, 40);
    if card.pending {
        format!("{} (saving)", task)
    } else {
        task
    }
}

/// One table column per board column, one row per card slot
pub fn board_table(board: &Board) -> Table {
    let mut table = new_table();
    table.set_header(
        board
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| format!("{}: {}", index, column.name)),
    );

    let rows = board
        .columns
        .iter()
        .map(|column| column.cards.len())
        .max()
        .unwrap_or(0);
    for row in 0..rows {
        table.add_row(board.columns.iter().map(|column| {
            column
                .cards
                .get(row)
                .map(|card| format!("{}. {}", row, card_cell(card)))
                .unwrap_or_default()
        }));
    }
    table
}

pub fn directory_table(boards: &BoardDirectory) -> Table {
    let mut table = new_table();
    table.set_header(vec!["ID", "Name"]);
    for (id, name) in boards {
        table.add_row(vec![id.to_string(), name.clone()]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanban_sync::test_support::sample_board;
    use kanban_sync::BoardId;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
    }

    #[test]
    fn test_board_table_lists_cards_by_column() {
        let mut board = sample_board();
        board.columns[0].cards[1].pending = true;

        let rendered = board_table(&board).to_string();

        assert!(rendered.contains("0: Todo"));
        assert!(rendered.contains("2: Done"));
        assert!(rendered.contains("0. first"));
        assert!(rendered.contains("1. second (saving)"));
        assert!(rendered.contains("0. shipped"));
    }

    #[test]
    fn test_directory_table() {
        let mut boards = BoardDirectory::new();
        boards.insert(BoardId::new(3), "Roadmap".into());

        let rendered = directory_table(&boards).to_string();

        assert!(rendered.contains("Roadmap"));
        assert!(rendered.contains('3'));
    }
}
