//! Board commands and the board catalog

mod catalog;
mod get;

pub use catalog::BoardCatalog;
pub use get::GetBoard;
