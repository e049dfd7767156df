//! Command execution: load the board, run one operation, print the board.

use crate::cli::{CardAction, ColumnAction, Commands};
use crate::table::{board_table, directory_table};
use anyhow::{bail, Result};
use kanban_sync::board::{BoardCatalog, GetBoard};
use kanban_sync::card::{AddCard, DeleteCard, MoveCard, ReorderCard, UpdateCardTask};
use kanban_sync::column::{AddColumn, DeleteColumn, RenameColumn, ReorderColumn};
use kanban_sync::{
    BoardId, BoardSession, Execute, ExecutionResult, KanbanError, KanbanOperationProcessor,
    MessageQueue, OperationProcessor,
};
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;

/// Everything a command needs
pub struct Context {
    pub catalog: BoardCatalog,
    pub errors: Arc<MessageQueue>,
    pub processor: KanbanOperationProcessor,
    pub board: Option<BoardId>,
    pub json: bool,
}

impl Context {
    fn session(&self) -> &BoardSession {
        self.catalog.session()
    }

    /// Print whatever the Error Surface collected
    fn flush_errors(&self) {
        for message in self.errors.take() {
            eprintln!("{}", message);
        }
    }

    /// Load the board named by `--board`. Returns false when the load failed.
    async fn load(&self) -> Result<bool> {
        let Some(id) = self.board else {
            bail!("--board is required for this command");
        };
        let loaded = self.catalog.select(id).await.is_ok();
        self.flush_errors();
        Ok(loaded)
    }

    async fn print_board<W: Write>(&self, out: &mut W, result: Option<&Value>) -> Result<()> {
        let board = self.session().board().await;
        if self.json {
            let value = json!({ "result": result, "board": board });
            writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        } else {
            writeln!(out, "{} (board {})", board.name, board.id)?;
            writeln!(out, "{}", board_table(&board))?;
        }
        Ok(())
    }

    /// Run one operation through the processor. Exit code 1 unless it went through.
    async fn apply<O, W>(&self, operation: &O, out: &mut W) -> Result<i32>
    where
        O: Execute<BoardSession, KanbanError>,
        W: Write,
    {
        let result = self.processor.process(operation, self.session()).await;
        self.flush_errors();

        let (code, value) = match result {
            ExecutionResult::Local { value } | ExecutionResult::Committed { value, .. } => {
                (0, Some(value))
            }
            ExecutionResult::RolledBack { error, .. } => {
                eprintln!("Rolled back: {}", error);
                (1, None)
            }
            ExecutionResult::Rejected { error } => {
                eprintln!("Error: {}", error);
                (1, None)
            }
        };
        self.print_board(out, value.as_ref()).await?;
        Ok(code)
    }
}

/// Execute a parsed command, writing results to `out`
pub async fn run<W: Write>(ctx: &Context, command: Commands, out: &mut W) -> Result<i32> {
    match command {
        Commands::Boards => match ctx.catalog.refresh().await {
            Ok(boards) => {
                if ctx.json {
                    writeln!(out, "{}", serde_json::to_string_pretty(&boards)?)?;
                } else {
                    writeln!(out, "{}", directory_table(&boards))?;
                }
                Ok(0)
            }
            Err(_) => {
                ctx.flush_errors();
                Ok(1)
            }
        },

        Commands::CreateBoard { name } => match ctx.catalog.create_board(&name).await {
            Ok(created) => {
                ctx.flush_errors();
                let value = json!({ "id": created.id, "name": created.name });
                ctx.print_board(out, Some(&value)).await?;
                Ok(0)
            }
            Err(error) => {
                ctx.flush_errors();
                eprintln!("Error: {}", error);
                Ok(1)
            }
        },

        Commands::Show => {
            if !ctx.load().await? {
                return Ok(1);
            }
            if ctx.json {
                let value = GetBoard.execute(ctx.session()).await.into_result()?;
                writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
                Ok(0)
            } else {
                ctx.print_board(out, None).await?;
                Ok(0)
            }
        }

        Commands::Card { action } => {
            if !ctx.load().await? {
                return Ok(1);
            }
            match action {
                CardAction::Add { column, task } => ctx.apply(&AddCard::new(column, task), out).await,
                CardAction::Edit { column, card, task } => {
                    ctx.apply(&UpdateCardTask::new(column, card, task), out).await
                }
                CardAction::Delete { column, card } => {
                    ctx.apply(&DeleteCard::new(column, card), out).await
                }
                CardAction::Move {
                    from_column,
                    card,
                    to_column,
                } => {
                    ctx.apply(&MoveCard::new(from_column, card, to_column), out)
                        .await
                }
                CardAction::Reorder { column, from, to } => {
                    // A command-line reorder is one hover step followed by the drop
                    let hover = ctx
                        .processor
                        .process(&ReorderCard::hover(column, from, to), ctx.session())
                        .await;
                    if let ExecutionResult::Rejected { error } = hover {
                        eprintln!("Error: {}", error);
                        return Ok(1);
                    }
                    ctx.apply(&ReorderCard::dropped(column, from, to), out).await
                }
            }
        }

        Commands::Column { action } => {
            if !ctx.load().await? {
                return Ok(1);
            }
            match action {
                ColumnAction::Add { name } => ctx.apply(&AddColumn::new(name), out).await,
                ColumnAction::Rename { column, name } => {
                    ctx.apply(&RenameColumn::new(column, name), out).await
                }
                ColumnAction::Delete { column } => {
                    ctx.apply(&DeleteColumn::new(column), out).await
                }
                ColumnAction::Reorder { from, to } => {
                    ctx.apply(&ReorderColumn::new(from, to), out).await
                }
            }
        }
    }
}
