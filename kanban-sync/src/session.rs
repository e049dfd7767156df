//! Board session: the single owner of Board State.
//!
//! A session holds the live (possibly optimistic) board, the snapshot of the
//! last server-confirmed board and the pending tracker behind one lock.
//! Mutation operations are the only writers. They go through two phases:
//!
//! 1. [`BoardSession::begin`] applies the optimistic change under the lock,
//!    flags the affected entity busy and publishes the new board.
//! 2. After the request resolves, [`BoardSession::settle`] either commits the
//!    current board as the new baseline or restores the baseline wholesale
//!    and reports the failure to the Error Surface.
//!
//! The lock is never held across a network request, so the request tails of
//! several operations may overlap. A failure restores whatever the snapshot
//! holds at that moment, which also discards optimistic changes of other
//! operations still in flight.

use crate::api::{BoardApi, HttpBoardApi, SyncAction};
use crate::config::ClientConfig;
use crate::error::{KanbanError, Result};
use crate::pending::{PendingTarget, PendingTicket, PendingTracker};
use crate::snapshot::SnapshotStore;
use crate::surface::ErrorSurface;
use crate::types::{Board, BoardId};
use kanban_sync_operations::{ExecutionResult, LogEntry, Operation};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{watch, Mutex, RwLock};
use tracing::{debug, info, warn};

/// Default number of entries kept in the activity log
pub const DEFAULT_ACTIVITY_CAPACITY: usize = 200;

#[derive(Debug, Default)]
struct BoardState {
    board: Board,
    snapshot: SnapshotStore,
    pending: PendingTracker,
    loading: bool,
    /// Bumped on every load; requests begun against an older board are stale
    generation: u64,
}

/// A request dispatched by [`BoardSession::begin`], awaiting [`BoardSession::settle`]
#[derive(Debug)]
#[must_use = "a dispatched request must be settled"]
pub struct Flight {
    ticket: PendingTicket,
    generation: u64,
}

/// The Board State of one active board
pub struct BoardSession {
    api: Arc<dyn BoardApi>,
    surface: Arc<dyn ErrorSurface>,
    state: RwLock<BoardState>,
    updates: watch::Sender<Board>,
    activity: Mutex<VecDeque<LogEntry>>,
    activity_capacity: usize,
}

impl std::fmt::Debug for BoardSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardSession")
            .field("activity_capacity", &self.activity_capacity)
            .finish_non_exhaustive()
    }
}

impl BoardSession {
    /// Create a session with an empty board. Call [`initialize`](Self::initialize) to load one.
    pub fn new(api: Arc<dyn BoardApi>, surface: Arc<dyn ErrorSurface>) -> Self {
        let (updates, _) = watch::channel(Board::default());
        Self {
            api,
            surface,
            state: RwLock::new(BoardState::default()),
            updates,
            activity: Mutex::new(VecDeque::new()),
            activity_capacity: DEFAULT_ACTIVITY_CAPACITY,
        }
    }

    /// Create a session talking HTTP to the configured server
    pub fn from_config(config: &ClientConfig, surface: Arc<dyn ErrorSurface>) -> Result<Self> {
        let api = HttpBoardApi::from_config(config)?;
        Ok(Self::new(Arc::new(api), surface).with_activity_capacity(config.activity_capacity))
    }

    pub fn with_activity_capacity(mut self, capacity: usize) -> Self {
        self.activity_capacity = capacity;
        self
    }

    pub(crate) fn api(&self) -> &dyn BoardApi {
        self.api.as_ref()
    }

    pub(crate) fn api_handle(&self) -> Arc<dyn BoardApi> {
        Arc::clone(&self.api)
    }

    pub(crate) fn surface_handle(&self) -> Arc<dyn ErrorSurface> {
        Arc::clone(&self.surface)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Load a board from the server, replacing Board State and the snapshot.
    ///
    /// On failure the board is left empty and unloaded, so selecting the same
    /// id again retries the fetch, and the Error Surface is told.
    pub async fn initialize(&self, board_id: BoardId) -> Result<()> {
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.generation += 1;
        }
        debug!(board = %board_id, "loading board");

        let fetched = self.api.fetch_board(board_id).await;

        let mut state = self.state.write().await;
        state.loading = false;
        state.generation += 1;
        let outcome = match fetched {
            Ok(mut board) => {
                board.id = board_id;
                board.normalize();
                info!(
                    board = %board_id,
                    columns = board.columns.len(),
                    cards = board.card_count(),
                    "board loaded"
                );
                state.board = board;
                Ok(())
            }
            Err(error) => {
                warn!(board = %board_id, %error, "board load failed");
                state.board = Board::default();
                self.surface.report(SyncAction::LoadBoard.failure_message());
                Err(error)
            }
        };
        let board = state.board.clone();
        state.snapshot.commit(&board);
        self.updates.send_replace(board);
        outcome
    }

    /// Reload only when `board_id` differs from the board already loaded
    pub async fn on_selected_board_changed(&self, board_id: BoardId) -> Result<()> {
        let current = self.state.read().await.board.id;
        if current == board_id {
            debug!(board = %board_id, "board already selected");
            return Ok(());
        }
        self.initialize(board_id).await
    }

    // =========================================================================
    // Read contract
    // =========================================================================

    /// A copy of the live board
    pub async fn board(&self) -> Board {
        self.state.read().await.board.clone()
    }

    /// A copy of the last server-confirmed board
    pub async fn snapshot(&self) -> Board {
        self.state.read().await.snapshot.restore()
    }

    /// Receive the live board after every change
    pub fn subscribe(&self) -> watch::Receiver<Board> {
        self.updates.subscribe()
    }

    /// Number of requests dispatched and not yet settled
    pub async fn in_flight(&self) -> usize {
        self.state.read().await.pending.in_flight()
    }

    /// Whether a board load is in progress
    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    /// Settled operations, oldest first
    pub async fn activity(&self) -> Vec<LogEntry> {
        self.activity.lock().await.iter().cloned().collect()
    }

    /// Append to the activity log, dropping the oldest entry when full
    pub async fn record_activity(&self, entry: LogEntry) {
        if self.activity_capacity == 0 {
            return;
        }
        let mut activity = self.activity.lock().await;
        while activity.len() >= self.activity_capacity {
            activity.pop_front();
        }
        activity.push_back(entry);
    }

    // =========================================================================
    // Mutation protocol
    // =========================================================================

    /// Read the live board under the lock without publishing
    pub(crate) async fn inspect<R, F>(&self, read: F) -> R
    where
        F: FnOnce(&Board) -> R + Send,
    {
        read(&self.state.read().await.board)
    }

    /// Apply a change that never reaches the server
    pub(crate) async fn apply_local<R, F>(&self, change: F) -> Result<R>
    where
        F: FnOnce(&mut Board) -> Result<R> + Send,
        R: Send,
    {
        let mut state = self.state.write().await;
        let value = change(&mut state.board)?;
        self.updates.send_replace(state.board.clone());
        Ok(value)
    }

    /// Apply an optimistic change and mark its target busy.
    ///
    /// `change` must validate before it mutates: an `Err` means the board was
    /// not touched. It returns the request payload and what to flag pending.
    pub(crate) async fn begin<R, F>(&self, change: F) -> Result<(R, Flight)>
    where
        F: FnOnce(&mut Board) -> Result<(R, PendingTarget)> + Send,
        R: Send,
    {
        let mut state = self.state.write().await;
        let (payload, target) = change(&mut state.board)?;

        let BoardState {
            board,
            pending,
            generation,
            ..
        } = &mut *state;
        let ticket = pending.begin(board, target);
        let flight = Flight {
            ticket,
            generation: *generation,
        };
        self.updates.send_replace(board.clone());
        Ok((payload, flight))
    }

    /// Fold a resolved request back into Board State.
    ///
    /// On success `confirm` applies server corrections (such as an assigned
    /// id), the pending flag clears and the current board becomes the new
    /// snapshot. On failure the board is replaced by the snapshot and the
    /// action's failure message is reported.
    pub(crate) async fn settle<T, F>(
        &self,
        flight: Flight,
        action: SyncAction,
        response: Result<T>,
        confirm: F,
    ) -> Result<Value>
    where
        T: Send,
        F: FnOnce(&mut Board, T) -> Value + Send,
    {
        let mut state = self.state.write().await;
        let stale = flight.generation != state.generation;
        let BoardState {
            board,
            snapshot,
            pending,
            ..
        } = &mut *state;

        match response {
            Ok(_) if stale => {
                pending.finish(board, flight.ticket);
                debug!(?action, "request confirmed for a board no longer loaded");
                Ok(Value::Null)
            }
            Ok(confirmed) => {
                let value = confirm(&mut *board, confirmed);
                pending.finish(board, flight.ticket);
                snapshot.commit(board);
                info!(?action, in_flight = pending.in_flight(), "request committed");
                self.updates.send_replace(board.clone());
                Ok(value)
            }
            Err(error) => {
                if stale {
                    pending.finish(board, flight.ticket);
                } else {
                    *board = snapshot.restore();
                    pending.finish(board, flight.ticket);
                    self.updates.send_replace(board.clone());
                }
                warn!(?action, %error, "request failed, board rolled back");
                self.surface.report(action.failure_message());
                Err(error)
            }
        }
    }
}

/// Turn a settled request into the operation's execution result
pub(crate) fn settled<O>(
    operation: &O,
    input: Value,
    started: Instant,
    result: Result<Value>,
) -> ExecutionResult<Value, KanbanError>
where
    O: Operation + ?Sized,
{
    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    match result {
        Ok(value) => ExecutionResult::Committed {
            value: value.clone(),
            log_entry: LogEntry::committed(operation.op_string(), input, value, duration_ms),
        },
        Err(error) => {
            let message = error.to_string();
            ExecutionResult::RolledBack {
                error,
                log_entry: LogEntry::rolled_back(
                    operation.op_string(),
                    input,
                    &message,
                    duration_ms,
                ),
            }
        }
    }
}
