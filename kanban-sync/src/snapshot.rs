//! Last known-good board state, used as the rollback target.

use crate::types::Board;

/// Holds a deep copy of the board as last confirmed by the server.
///
/// The stored copy never carries pending flags: a busy indicator describes a
/// request in flight, not server state, and restoring one would leave a
/// spinner nobody will clear.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    snapshot: Board,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored snapshot wholesale with a copy of `board`
    pub fn commit(&mut self, board: &Board) {
        let mut snapshot = board.clone();
        snapshot.clear_pending();
        self.snapshot = snapshot;
    }

    /// A fresh deep copy of the stored snapshot
    pub fn restore(&self) -> Board {
        self.snapshot.clone()
    }

    pub fn get(&self) -> &Board {
        &self.snapshot
    }
}
