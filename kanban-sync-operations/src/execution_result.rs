//! Execution result types for operations

use crate::LogEntry;

/// Result of executing an operation against a server-backed board
///
/// Distinguishes between:
/// - Local: applied to local state only, nothing was sent
/// - Committed: the server confirmed the change
/// - RolledBack: the server request failed and local state was reverted
/// - Rejected: the arguments were invalid, nothing changed
pub enum ExecutionResult<T, E> {
    /// Applied locally, no request dispatched
    Local { value: T },
    /// Server confirmed the change; the known-good baseline now includes it
    Committed { value: T, log_entry: LogEntry },
    /// Server request failed; local state was restored from the baseline
    RolledBack { error: E, log_entry: LogEntry },
    /// Preconditions failed before anything was touched
    Rejected { error: E },
}

impl<T, E> ExecutionResult<T, E> {
    /// Extract the result (Ok or Err)
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Local { value } => Ok(value),
            Self::Committed { value, .. } => Ok(value),
            Self::RolledBack { error, .. } => Err(error),
            Self::Rejected { error } => Err(error),
        }
    }

    /// Get the value and log entry separately
    pub fn split(self) -> (Result<T, E>, Option<LogEntry>) {
        match self {
            Self::Local { value } => (Ok(value), None),
            Self::Committed { value, log_entry } => (Ok(value), Some(log_entry)),
            Self::RolledBack { error, log_entry } => (Err(error), Some(log_entry)),
            Self::Rejected { error } => (Err(error), None),
        }
    }

    /// The log entry, if this outcome involved the server
    pub fn log_entry(&self) -> Option<&LogEntry> {
        match self {
            Self::Committed { log_entry, .. } | Self::RolledBack { log_entry, .. } => {
                Some(log_entry)
            }
            Self::Local { .. } | Self::Rejected { .. } => None,
        }
    }

    /// Attribute the log entry (if any) to an actor
    pub fn with_actor(self, actor: impl Into<String>) -> Self {
        match self {
            Self::Committed { value, log_entry } => Self::Committed {
                value,
                log_entry: log_entry.with_actor(actor),
            },
            Self::RolledBack { error, log_entry } => Self::RolledBack {
                error,
                log_entry: log_entry.with_actor(actor),
            },
            other => other,
        }
    }

    /// Check if this should be logged
    pub fn should_log(&self) -> bool {
        self.log_entry().is_some()
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }

    pub fn is_rolled_back(&self) -> bool {
        matches!(self, Self::RolledBack { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local { .. })
    }
}
