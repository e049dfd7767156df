//! Board operation processor
//!
//! Runs operations against a session and records every settled one in the
//! session's activity log.

use crate::error::KanbanError;
use crate::session::BoardSession;
use kanban_sync_operations::{async_trait, LogEntry, OperationProcessor};

/// Processor for board operations
#[derive(Debug, Default, Clone)]
pub struct KanbanOperationProcessor {
    actor: Option<String>,
}

impl KanbanOperationProcessor {
    /// Create a new processor
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute every processed operation to `actor`
    pub fn with_actor(actor: impl Into<String>) -> Self {
        Self {
            actor: Some(actor.into()),
        }
    }
}

#[async_trait]
impl OperationProcessor<BoardSession, KanbanError> for KanbanOperationProcessor {
    fn actor(&self) -> Option<&str> {
        self.actor.as_deref()
    }

    async fn write_log(&self, session: &BoardSession, entry: LogEntry) {
        tracing::info!(
            target: "kanban_sync::activity",
            id = %entry.id,
            op = %entry.op,
            actor = entry.actor.as_deref().unwrap_or("-"),
            duration_ms = entry.duration_ms,
            failed = entry.is_failure(),
            "operation settled"
        );
        session.record_activity(entry).await;
    }
}
