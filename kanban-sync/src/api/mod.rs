//! Sync Client transport: the server endpoints the engine persists through.
//!
//! | Method | Path | Used by |
//! |---|---|---|
//! | `GET` | `/api/boards/` | board catalog |
//! | `POST` | `/api/boards/` | board catalog |
//! | `GET` | `/api/boards/{id}/` | session load |
//! | `POST` | `/api/cards/` | add card |
//! | `PATCH` | `/api/cards/` | reorder drop, move, delete with reindex |
//! | `PATCH` | `/api/cards/{id}/` | edit task |
//! | `DELETE` | `/api/cards/{id}/` | delete last card |
//! | `POST` | `/api/columns/` | add column |
//! | `PATCH` | `/api/columns/` | reorder columns, delete column with reindex |
//! | `PATCH` | `/api/columns/{id}/` | rename column |
//! | `DELETE` | `/api/columns/{id}/` | delete last column |

mod http;

pub use http::HttpBoardApi;

use crate::error::Result;
use crate::types::{
    Board, BoardDirectory, BoardId, BoardSummary, Card, CardId, Column, ColumnId, ColumnPatch,
    NewCard, NewColumn,
};
use async_trait::async_trait;

/// The server a session persists to
#[async_trait]
pub trait BoardApi: Send + Sync {
    async fn list_boards(&self) -> Result<BoardDirectory>;

    async fn fetch_board(&self, id: BoardId) -> Result<Board>;

    async fn create_board(&self, name: &str) -> Result<BoardSummary>;

    /// Returns the stored card with its server-assigned id
    async fn create_card(&self, card: &NewCard) -> Result<Card>;

    /// Bulk update; cards marked for deletion are deleted
    async fn update_cards(&self, cards: &[Card]) -> Result<()>;

    async fn update_card(&self, card: &Card) -> Result<()>;

    async fn delete_card(&self, id: CardId) -> Result<()>;

    /// Returns the stored column with its server-assigned id
    async fn create_column(&self, column: &NewColumn) -> Result<Column>;

    /// Bulk update; columns marked for deletion are deleted
    async fn update_columns(&self, columns: &[ColumnPatch]) -> Result<()>;

    async fn update_column(&self, column: &ColumnPatch) -> Result<()>;

    async fn delete_column(&self, id: ColumnId) -> Result<()>;
}

/// The action class of a request, which determines what the user is told
/// when it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    LoadBoards,
    LoadBoard,
    CreateBoard,
    CreateCard,
    UpdateCard,
    UpdateCards,
    DeleteCard,
    CreateColumn,
    UpdateColumn,
    UpdateColumns,
    DeleteColumn,
}

impl SyncAction {
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::LoadBoards | Self::LoadBoard => "Error: Unable to load board data",
            Self::CreateBoard => "Error: Unable to create board",
            Self::CreateCard => "Error: Unable to create card on the server",
            Self::UpdateCard => "Error: Unable to update card on the server",
            Self::UpdateCards => "Error: Unable to update cards on the server",
            Self::DeleteCard => "Error: Unable to delete card on the server",
            Self::CreateColumn => "Error: Unable to create column on the server",
            Self::UpdateColumn => "Error: Unable to update column on the server",
            Self::UpdateColumns => "Error: Unable to update columns on the server",
            Self::DeleteColumn => "Error: Unable to delete column on the server",
        }
    }
}
