//! Core types for the board engine

mod board;
mod card;
mod ids;
pub mod position;

pub use board::{Board, BoardDirectory, BoardSummary, Column, ColumnPatch, NewColumn};
pub use card::{Card, NewCard};
pub use ids::{BoardId, CardId, ColumnId};
pub use position::{is_contiguous, reindex, Positioned};
