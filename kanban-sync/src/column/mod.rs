//! Column commands

mod add;
mod delete;
mod rename;
mod reorder;

pub use add::AddColumn;
pub use delete::DeleteColumn;
pub use rename::RenameColumn;
pub use reorder::ReorderColumn;
