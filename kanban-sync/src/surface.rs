//! Error Surface: where human-readable failure messages go.

use std::sync::Mutex;

/// Receives a message whenever a server request fails and the board was rolled back.
///
/// Hosts typically show the message in an info dialog.
pub trait ErrorSurface: Send + Sync {
    fn report(&self, message: &str);
}

/// Collects messages until a host drains them
#[derive(Debug, Default)]
pub struct MessageQueue {
    messages: Mutex<Vec<String>>,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every queued message, oldest first
    pub fn take(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(mut messages) => std::mem::take(&mut *messages),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    /// Copy of the queued messages, oldest first
    pub fn messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(messages) => messages.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.messages().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ErrorSurface for MessageQueue {
    fn report(&self, message: &str) {
        tracing::debug!(text = message, "error surfaced");
        match self.messages.lock() {
            Ok(mut messages) => messages.push(message.to_string()),
            Err(poisoned) => poisoned.into_inner().push(message.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_take_drains() {
        let queue = MessageQueue::new();
        queue.report("Error: Unable to create card on the server");
        queue.report("Error: Unable to delete card on the server");

        assert_eq!(queue.len(), 2);
        let taken = queue.take();
        assert_eq!(taken[0], "Error: Unable to create card on the server");
        assert!(queue.is_empty());
    }
}
