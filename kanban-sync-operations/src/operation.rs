//! Operation metadata and execution traits

use crate::ExecutionResult;
use async_trait::async_trait;
use serde_json::Value;

/// Metadata every operation carries. Implemented by `#[operation]`.
pub trait Operation {
    /// The action, e.g. "move"
    fn verb(&self) -> &'static str;

    /// The entity acted upon, e.g. "card"
    fn noun(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Canonical "verb noun" string used in log entries
    fn op_string(&self) -> String {
        format!("{} {}", self.verb(), self.noun())
    }
}

/// Run an operation against a context `C`, failing with `E`
#[async_trait]
pub trait Execute<C, E>: Operation + Send + Sync
where
    C: Send + Sync,
    E: Send,
{
    async fn execute(&self, ctx: &C) -> ExecutionResult<Value, E>;
}
