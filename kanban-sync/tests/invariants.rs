//! Board invariants under arbitrary operation sequences with scripted failures.

use std::collections::HashSet;
use std::sync::Arc;

use kanban_sync::card::{AddCard, DeleteCard, MoveCard, ReorderCard, UpdateCardTask};
use kanban_sync::column::{AddColumn, DeleteColumn, RenameColumn, ReorderColumn};
use kanban_sync::test_support::{sample_board, FakeApi, RecordedRequest};
use kanban_sync::types::is_contiguous;
use kanban_sync::{
    Board, BoardSession, CardId, ColumnId, Execute, ExecutionResult, KanbanError, MessageQueue,
};
use proptest::prelude::*;
use serde_json::Value;

#[derive(Debug, Clone)]
enum Step {
    AddCard(usize, String),
    EditCard(usize, usize, String),
    DeleteCard(usize, usize),
    MoveCard(usize, usize, usize),
    Hover(usize, usize, usize),
    Drop(usize, usize, usize),
    /// A whole drag: one hover step and its drop
    Drag(usize, usize, usize),
    AddColumn(String),
    RenameColumn(usize, String),
    DeleteColumn(usize),
    ReorderColumn(usize, usize),
}

fn index() -> impl Strategy<Value = usize> {
    0usize..4
}

fn text() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (index(), text()).prop_map(|(c, t)| Step::AddCard(c, t)),
        (index(), index(), text()).prop_map(|(c, i, t)| Step::EditCard(c, i, t)),
        (index(), index()).prop_map(|(c, i)| Step::DeleteCard(c, i)),
        (index(), index(), index()).prop_map(|(f, i, t)| Step::MoveCard(f, i, t)),
        (index(), index(), index()).prop_map(|(c, f, t)| Step::Hover(c, f, t)),
        (index(), index(), index()).prop_map(|(c, f, t)| Step::Drop(c, f, t)),
        text().prop_map(Step::AddColumn),
        (index(), text()).prop_map(|(c, n)| Step::RenameColumn(c, n)),
        index().prop_map(Step::DeleteColumn),
        (index(), index()).prop_map(|(f, t)| Step::ReorderColumn(f, t)),
    ]
}

/// Complete user gestures: every hover is followed by its drop
fn gesture() -> impl Strategy<Value = Step> {
    prop_oneof![
        (index(), text()).prop_map(|(c, t)| Step::AddCard(c, t)),
        (index(), index(), text()).prop_map(|(c, i, t)| Step::EditCard(c, i, t)),
        (index(), index()).prop_map(|(c, i)| Step::DeleteCard(c, i)),
        (index(), index(), index()).prop_map(|(f, i, t)| Step::MoveCard(f, i, t)),
        (index(), index(), index()).prop_map(|(c, f, t)| Step::Drag(c, f, t)),
        text().prop_map(Step::AddColumn),
        (index(), text()).prop_map(|(c, n)| Step::RenameColumn(c, n)),
        index().prop_map(Step::DeleteColumn),
        (index(), index()).prop_map(|(f, t)| Step::ReorderColumn(f, t)),
    ]
}

async fn run(step: &Step, session: &BoardSession) -> ExecutionResult<Value, KanbanError> {
    match step.clone() {
        Step::AddCard(c, t) => AddCard::new(c, t).execute(session).await,
        Step::EditCard(c, i, t) => UpdateCardTask::new(c, i, t).execute(session).await,
        Step::DeleteCard(c, i) => DeleteCard::new(c, i).execute(session).await,
        Step::MoveCard(f, i, t) => MoveCard::new(f, i, t).execute(session).await,
        Step::Hover(c, f, t) => ReorderCard::hover(c, f, t).execute(session).await,
        Step::Drop(c, f, t) => ReorderCard::dropped(c, f, t).execute(session).await,
        Step::Drag(c, f, t) => match ReorderCard::hover(c, f, t).execute(session).await {
            ExecutionResult::Local { .. } => ReorderCard::dropped(c, f, t).execute(session).await,
            other => other,
        },
        Step::AddColumn(n) => AddColumn::new(n).execute(session).await,
        Step::RenameColumn(c, n) => RenameColumn::new(c, n).execute(session).await,
        Step::DeleteColumn(c) => DeleteColumn::new(c).execute(session).await,
        Step::ReorderColumn(f, t) => ReorderColumn::new(f, t).execute(session).await,
    }
}

/// Every card and column in `snapshot` is in a state the initial board held
/// or some request carried to the server.
///
/// Created entities are matched on content only: their position can shift
/// when a rollback removed the optimistic copy before the server answered.
fn assert_only_sent_changes(initial: &Board, snapshot: &Board, writes: &[RecordedRequest]) {
    let initial_cards: HashSet<CardId> = initial
        .columns
        .iter()
        .flat_map(|c| c.cards.iter().map(|card| card.id))
        .collect();
    let initial_columns: HashSet<ColumnId> = initial.columns.iter().map(|c| c.id).collect();

    let mut cards: HashSet<(CardId, String, ColumnId, usize)> = initial
        .columns
        .iter()
        .flat_map(|c| c.cards.iter())
        .map(|card| (card.id, card.task.clone(), card.column_id, card.position_id))
        .collect();
    let mut columns: HashSet<(ColumnId, String, usize)> = initial
        .columns
        .iter()
        .map(|c| (c.id, c.name.clone(), c.position))
        .collect();
    let mut created_cards = HashSet::new();
    let mut created_columns = HashSet::new();

    for write in writes {
        match write {
            RecordedRequest::UpdateCard(card) => {
                cards.insert((card.id, card.task.clone(), card.column_id, card.position_id));
            }
            RecordedRequest::UpdateCards(sent) => {
                for card in sent {
                    cards.insert((card.id, card.task.clone(), card.column_id, card.position_id));
                }
            }
            RecordedRequest::CreateCard(card) => {
                created_cards.insert((card.task.clone(), card.column_id));
            }
            RecordedRequest::UpdateColumn(patch) => {
                columns.insert((patch.id, patch.name.clone(), patch.position_id));
            }
            RecordedRequest::UpdateColumns(sent) => {
                for patch in sent {
                    columns.insert((patch.id, patch.name.clone(), patch.position_id));
                }
            }
            RecordedRequest::CreateColumn(column) => {
                created_columns.insert(column.name.clone());
            }
            _ => {}
        }
    }

    for column in &snapshot.columns {
        let sent = columns.contains(&(column.id, column.name.clone(), column.position));
        let created =
            !initial_columns.contains(&column.id) && created_columns.contains(&column.name);
        assert!(sent || created, "unsent column state {:?}", column);

        for card in &column.cards {
            let state = (card.id, card.task.clone(), card.column_id, card.position_id);
            let created = !initial_cards.contains(&card.id)
                && created_cards.contains(&(card.task.clone(), card.column_id));
            assert!(cards.contains(&state) || created, "unsent card state {:?}", card);
        }
    }
}

fn assert_quiescent(board: &Board, in_flight: usize) {
    assert!(board.is_consistent(), "{:?}", board);
    assert!(is_contiguous(&board.columns), "{:?}", board);
    assert!(!board.has_pending(), "orphaned pending flag in {:?}", board);
    assert_eq!(in_flight, 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn sequential_operations_keep_the_board_consistent(
        steps in prop::collection::vec((step(), any::<bool>()), 1..24)
    ) {
        tokio_test::block_on(async {
            let api = Arc::new(FakeApi::with_board(sample_board()));
            let errors = Arc::new(MessageQueue::new());
            let session = BoardSession::new(api.clone(), errors.clone());
            session.initialize(sample_board().id).await.unwrap();

            for (step, fail) in &steps {
                let before = session.board().await;
                let confirmed = session.snapshot().await;
                if *fail {
                    api.fail_next();
                }

                let result = run(step, &session).await;
                // A step that never reached the server leaves the scripted failure queued
                api.recover();
                let after = session.board().await;

                match &result {
                    ExecutionResult::Rejected { .. } => assert_eq!(after, before, "{:?}", step),
                    ExecutionResult::RolledBack { .. } => {
                        assert!(*fail);
                        assert_eq!(after, confirmed, "{:?}", step);
                    }
                    ExecutionResult::Committed { .. } => {
                        assert!(!*fail);
                        assert_eq!(session.snapshot().await, after);
                    }
                    // Hover steps stay local until a later request commits them
                    ExecutionResult::Local { .. } => {}
                }

                assert!(after.is_consistent(), "{:?} left {:?}", step, after);
                assert!(is_contiguous(&after.columns), "{:?} left {:?}", step, after);
                assert!(!after.has_pending());
                assert_eq!(session.in_flight().await, 0);
            }
        });
    }

    #[test]
    fn gestures_during_an_outstanding_request_settle_cleanly(
        rounds in prop::collection::vec(
            (
                (gesture(), any::<bool>()),
                prop::collection::vec((gesture(), any::<bool>()), 0..5),
            ),
            1..6,
        )
    ) {
        tokio_test::block_on(async {
            let initial = sample_board();
            let api = Arc::new(FakeApi::with_board(initial.clone()));
            let errors = Arc::new(MessageQueue::new());
            let session = Arc::new(BoardSession::new(api.clone(), errors.clone()));
            session.initialize(initial.id).await.unwrap();

            for ((held_step, held_fails), between) in &rounds {
                if *held_fails {
                    api.fail_next();
                }
                let mut gate = api.hold_next();
                let mut held = {
                    let session = session.clone();
                    let step = held_step.clone();
                    tokio::spawn(async move { run(&step, &session).await })
                };

                // A rejected step never reaches the server, so its gate is never entered
                let mut finished = false;
                tokio::select! {
                    _ = gate.entered() => {}
                    result = &mut held => {
                        result.unwrap();
                        finished = true;
                    }
                }
                api.recover();
                // Its queued hold must not capture the next request instead
                let gate = if finished {
                    gate.release();
                    None
                } else {
                    Some(gate)
                };

                for (step, fail) in between {
                    if *fail {
                        api.fail_next();
                    }
                    run(step, &session).await;
                    api.recover();
                    let board = session.board().await;
                    assert!(board.is_consistent(), "{:?} left {:?}", step, board);
                    assert_only_sent_changes(&initial, &session.snapshot().await, &api.writes());
                }

                if let Some(gate) = gate {
                    gate.release();
                    held.await.unwrap();
                }

                assert_quiescent(&session.board().await, session.in_flight().await);
                assert_only_sent_changes(&initial, &session.snapshot().await, &api.writes());
            }
        });
    }
}
