//! Operation processor: executes operations and records their log entries

use crate::{Execute, ExecutionResult, LogEntry};
use async_trait::async_trait;
use serde_json::Value;

/// Runs operations and hands their log entries to a sink.
///
/// Implementors decide where entries go (an in-memory activity log, a file,
/// a tracing span); the execution path is shared.
#[async_trait]
pub trait OperationProcessor<C, E>: Send + Sync
where
    C: Send + Sync,
    E: Send,
{
    /// Actor attributed to every processed operation
    fn actor(&self) -> Option<&str> {
        None
    }

    /// Persist a log entry for a settled operation
    async fn write_log(&self, ctx: &C, entry: LogEntry);

    /// Execute an operation and record its log entry
    async fn process<O>(&self, operation: &O, ctx: &C) -> ExecutionResult<Value, E>
    where
        O: Execute<C, E> + ?Sized,
    {
        let result = operation.execute(ctx).await;
        let result = match self.actor() {
            Some(actor) => result.with_actor(actor),
            None => result,
        };

        if let Some(entry) = result.log_entry() {
            self.write_log(ctx, entry.clone()).await;
        }

        result
    }
}
