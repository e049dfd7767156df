//! Card operations

mod add;
mod delete;
mod mv;
mod reorder;
mod update;

pub use add::AddCard;
pub use delete::DeleteCard;
pub use mv::MoveCard;
pub use reorder::ReorderCard;
pub use update::UpdateCardTask;
