//! Test helpers shared by unit tests and integration tests.
//!
//! Compiled for this crate's own tests and, via the `test-support` feature,
//! for integration tests and downstream crates.

use crate::api::BoardApi;
use crate::error::{KanbanError, Result};
use crate::types::{
    Board, BoardDirectory, BoardId, BoardSummary, Card, CardId, Column, ColumnId, ColumnPatch,
    NewCard, NewColumn,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::oneshot;

/// A small confirmed board: "Todo" with two cards, an empty "Doing" and
/// "Done" with one card.
pub fn sample_board() -> Board {
    let board = BoardId::new(1);
    let todo = ColumnId::new(10);
    let doing = ColumnId::new(11);
    let done = ColumnId::new(12);

    Board::new(board, "Sample")
        .with_column(
            Column::new(todo, "Todo", 0, board)
                .with_card(Card::new(CardId::new(100), "first", todo, 0))
                .with_card(Card::new(CardId::new(101), "second", todo, 1)),
        )
        .with_column(Column::new(doing, "Doing", 1, board))
        .with_column(
            Column::new(done, "Done", 2, board)
                .with_card(Card::new(CardId::new(120), "shipped", done, 0)),
        )
}

/// A request received by [`FakeApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedRequest {
    ListBoards,
    FetchBoard(BoardId),
    CreateBoard(String),
    CreateCard(NewCard),
    UpdateCards(Vec<Card>),
    UpdateCard(Card),
    DeleteCard(CardId),
    CreateColumn(NewColumn),
    UpdateColumns(Vec<ColumnPatch>),
    UpdateColumn(ColumnPatch),
    DeleteColumn(ColumnId),
}

impl RecordedRequest {
    /// Whether this request would change server state
    pub fn is_write(&self) -> bool {
        !matches!(self, Self::ListBoards | Self::FetchBoard(_))
    }
}

/// Holds one request until the test releases it
#[derive(Debug)]
pub struct Gate {
    entered: Option<oneshot::Receiver<()>>,
    release: oneshot::Sender<()>,
}

impl Gate {
    /// Wait until the held request has been dispatched
    pub async fn entered(&mut self) {
        if let Some(entered) = self.entered.take() {
            let _ = entered.await;
        }
    }

    /// Let the held request resolve
    pub fn release(self) {
        let _ = self.release.send(());
    }
}

struct HeldRequest {
    entered: oneshot::Sender<()>,
    release: oneshot::Receiver<()>,
}

#[derive(Default)]
struct FakeState {
    boards: BTreeMap<BoardId, Board>,
    requests: Vec<RecordedRequest>,
    next_id: i64,
    fail_next: usize,
    fail_all: bool,
    held: VecDeque<HeldRequest>,
}

/// An in-memory [`BoardApi`] that records every request.
///
/// Creates are answered with fresh ids starting at 1000. Failures and held
/// requests are scripted per request, in dispatch order.
#[derive(Default)]
pub struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// A server that knows `board`
    pub fn with_board(board: Board) -> Self {
        let api = Self::new();
        api.state().boards.insert(board.id, board);
        api
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Every request received so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state().requests.clone()
    }

    /// Requests that would change server state
    pub fn writes(&self) -> Vec<RecordedRequest> {
        self.requests().into_iter().filter(|r| r.is_write()).collect()
    }

    pub fn clear_requests(&self) {
        self.state().requests.clear();
    }

    /// Fail the next request dispatched
    pub fn fail_next(&self) {
        self.state().fail_next += 1;
    }

    /// Fail every request from now on (until `recover`)
    pub fn fail_all(&self) {
        self.state().fail_all = true;
    }

    pub fn recover(&self) {
        let mut state = self.state();
        state.fail_all = false;
        state.fail_next = 0;
    }

    /// Hold the next request dispatched until the returned gate is released
    pub fn hold_next(&self) -> Gate {
        let (entered_tx, entered_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        self.state().held.push_back(HeldRequest {
            entered: entered_tx,
            release: release_rx,
        });
        Gate {
            entered: Some(entered_rx),
            release: release_tx,
        }
    }

    /// Record a request and decide its fate; waits on a gate if one is queued
    async fn receive(&self, request: RecordedRequest) -> Result<()> {
        let (fail, held) = {
            let mut state = self.state();
            state.requests.push(request);
            let fail = if state.fail_all {
                true
            } else if state.fail_next > 0 {
                state.fail_next -= 1;
                true
            } else {
                false
            };
            (fail, state.held.pop_front())
        };

        if let Some(held) = held {
            let _ = held.entered.send(());
            let _ = held.release.await;
        }

        if fail {
            Err(KanbanError::Api {
                status: 500,
                body: "scripted failure".to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn next_id(&self) -> i64 {
        let mut state = self.state();
        state.next_id += 1;
        999 + state.next_id
    }
}

#[async_trait]
impl BoardApi for FakeApi {
    async fn list_boards(&self) -> Result<BoardDirectory> {
        self.receive(RecordedRequest::ListBoards).await?;
        Ok(self
            .state()
            .boards
            .values()
            .map(|board| (board.id, board.name.clone()))
            .collect())
    }

    async fn fetch_board(&self, id: BoardId) -> Result<Board> {
        self.receive(RecordedRequest::FetchBoard(id)).await?;
        let board = self.state().boards.get(&id).cloned();
        board.ok_or_else(|| KanbanError::Api {
            status: 404,
            body: "Not found.".to_string(),
        })
    }

    async fn create_board(&self, name: &str) -> Result<BoardSummary> {
        self.receive(RecordedRequest::CreateBoard(name.to_string()))
            .await?;
        let id = BoardId::new(self.next_id());
        self.state().boards.insert(id, Board::new(id, name));
        Ok(BoardSummary {
            id,
            name: name.to_string(),
        })
    }

    async fn create_card(&self, card: &NewCard) -> Result<Card> {
        self.receive(RecordedRequest::CreateCard(card.clone()))
            .await?;
        Ok(Card::new(
            CardId::new(self.next_id()),
            card.task.clone(),
            card.column_id,
            card.position_id,
        ))
    }

    async fn update_cards(&self, cards: &[Card]) -> Result<()> {
        self.receive(RecordedRequest::UpdateCards(cards.to_vec()))
            .await
    }

    async fn update_card(&self, card: &Card) -> Result<()> {
        self.receive(RecordedRequest::UpdateCard(card.clone())).await
    }

    async fn delete_card(&self, id: CardId) -> Result<()> {
        self.receive(RecordedRequest::DeleteCard(id)).await
    }

    async fn create_column(&self, column: &NewColumn) -> Result<Column> {
        self.receive(RecordedRequest::CreateColumn(column.clone()))
            .await?;
        Ok(Column::new(
            ColumnId::new(self.next_id()),
            column.name.clone(),
            column.position_id,
            column.board_id,
        ))
    }

    async fn update_columns(&self, columns: &[ColumnPatch]) -> Result<()> {
        self.receive(RecordedRequest::UpdateColumns(columns.to_vec()))
            .await
    }

    async fn update_column(&self, column: &ColumnPatch) -> Result<()> {
        self.receive(RecordedRequest::UpdateColumn(column.clone()))
            .await
    }

    async fn delete_column(&self, id: ColumnId) -> Result<()> {
        self.receive(RecordedRequest::DeleteColumn(id)).await
    }
}
