//! Activity log entries for settled operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// How the server request behind an entry settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Committed,
    RolledBack,
}

/// One server round trip made by an operation.
///
/// Only operations that dispatched a request produce an entry; local and
/// rejected operations leave no trace in the activity log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// ULID, so entries sort by creation time
    pub id: String,

    /// When the request settled
    pub timestamp: DateTime<Utc>,

    /// Canonical op string (e.g., "add card", "move card")
    pub op: String,

    pub outcome: Outcome,

    /// The operation arguments (as JSON)
    pub input: Value,

    /// The confirmed value, or `{"error": ...}` after a rollback
    pub output: Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    /// Time from optimistic apply to settlement (milliseconds)
    pub duration_ms: u64,
}

impl LogEntry {
    fn settled(
        op: impl Into<String>,
        outcome: Outcome,
        input: Value,
        output: Value,
        duration_ms: u64,
    ) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            timestamp: Utc::now(),
            op: op.into(),
            outcome,
            input,
            output,
            actor: None,
            duration_ms,
        }
    }

    /// The server confirmed the change
    pub fn committed(op: impl Into<String>, input: Value, output: Value, duration_ms: u64) -> Self {
        Self::settled(op, Outcome::Committed, input, output, duration_ms)
    }

    /// The request failed and the board was rolled back
    pub fn rolled_back(op: impl Into<String>, input: Value, error: &str, duration_ms: u64) -> Self {
        Self::settled(
            op,
            Outcome::RolledBack,
            input,
            json!({ "error": error }),
            duration_ms,
        )
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn is_failure(&self) -> bool {
        self.outcome == Outcome::RolledBack
    }
}
