//! Error types for the board engine

use thiserror::Error;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, KanbanError>;

/// Errors that can occur in board operations
#[derive(Debug, Error)]
pub enum KanbanError {
    /// No board has been loaded into the session
    #[error("no board loaded")]
    BoardNotLoaded,

    /// Column index out of range
    #[error("column not found at index {index}")]
    ColumnNotFound { index: usize },

    /// Card index out of range
    #[error("card not found at index {index} in column {column}")]
    CardNotFound { column: usize, index: usize },

    /// Target still carries a temporary id
    #[error("{entity} is still being saved to the server")]
    Unconfirmed { entity: &'static str },

    /// Invalid argument
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// The server answered with a non-success status
    #[error("server returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The request never got a response
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(Box<figment::Error>),
}

impl From<figment::Error> for KanbanError {
    fn from(error: figment::Error) -> Self {
        Self::Config(Box::new(error))
    }
}

impl KanbanError {
    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a card-not-found error
    pub fn card_not_found(column: usize, index: usize) -> Self {
        Self::CardNotFound { column, index }
    }

    /// Network or server failure: the class that triggers a rollback
    pub fn is_sync_failure(&self) -> bool {
        matches!(self, Self::Api { .. } | Self::Transport(_) | Self::Json(_))
    }

    /// Check if re-attempting the same action could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KanbanError::CardNotFound {
            column: 1,
            index: 4,
        };
        assert_eq!(err.to_string(), "card not found at index 4 in column 1");

        let err = KanbanError::Unconfirmed { entity: "card" };
        assert_eq!(err.to_string(), "card is still being saved to the server");
    }

    #[test]
    fn test_sync_failure_classification() {
        let api = KanbanError::Api {
            status: 404,
            body: "Not found.".into(),
        };
        assert!(api.is_sync_failure());
        assert!(!KanbanError::ColumnNotFound { index: 0 }.is_sync_failure());
        assert!(!KanbanError::BoardNotLoaded.is_sync_failure());
    }

    #[test]
    fn test_retryable() {
        assert!(KanbanError::Api {
            status: 503,
            body: String::new()
        }
        .is_retryable());
        assert!(!KanbanError::Api {
            status: 400,
            body: String::new()
        }
        .is_retryable());
        assert!(!KanbanError::invalid_value("task", "empty").is_retryable());
    }
}
