//! Busy indicators for entities with an outstanding server request.

use crate::types::{Board, CardId, ColumnId};

/// What a request marks as busy while it is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingTarget {
    /// The card at a slot
    Card { column: usize, card: usize },
    /// The column at an index
    Column(usize),
    /// Nothing visible
    None,
}

/// The entity a ticket clears when its request settles.
///
/// Confirmed entities are tracked by id so a flag follows its card or column
/// when another change moves it to a different slot. Unconfirmed entities
/// are tracked by slot; create confirmation swaps them out wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tracked {
    Card(CardId),
    Column(ColumnId),
    Slot(PendingTarget),
}

/// Returned by [`PendingTracker::begin`], handed back to [`PendingTracker::finish`]
#[derive(Debug)]
#[must_use = "a pending ticket must be finished when its request settles"]
pub struct PendingTicket {
    tracked: Tracked,
}

/// Counts outstanding requests and flips the per-entity pending flags.
///
/// An entity that no longer exists when the request settles (the board was
/// rolled back or restructured meanwhile) is skipped.
#[derive(Debug, Default)]
pub struct PendingTracker {
    in_flight: usize,
}

impl PendingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `target` busy and count one more request in flight
    pub fn begin(&mut self, board: &mut Board, target: PendingTarget) -> PendingTicket {
        set_flag(board, target, true);
        self.in_flight += 1;
        PendingTicket {
            tracked: identify(board, target),
        }
    }

    /// Clear the ticket's flag (if its entity still exists) and count the request settled
    pub fn finish(&mut self, board: &mut Board, ticket: PendingTicket) {
        match ticket.tracked {
            Tracked::Card(id) => {
                if let Some(card) = board
                    .columns
                    .iter_mut()
                    .flat_map(|column| column.cards.iter_mut())
                    .find(|card| card.id == id)
                {
                    card.pending = false;
                }
            }
            Tracked::Column(id) => {
                if let Some(column) = board.columns.iter_mut().find(|column| column.id == id) {
                    column.pending = false;
                }
            }
            Tracked::Slot(target) => set_flag(board, target, false),
        }
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Number of requests dispatched and not yet settled
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

fn identify(board: &Board, target: PendingTarget) -> Tracked {
    let confirmed = match target {
        PendingTarget::Card { column, card } => board
            .card(column, card)
            .filter(|card| card.is_confirmed())
            .map(|card| Tracked::Card(card.id)),
        PendingTarget::Column(index) => board
            .column(index)
            .filter(|column| column.is_confirmed())
            .map(|column| Tracked::Column(column.id)),
        PendingTarget::None => None,
    };
    confirmed.unwrap_or(Tracked::Slot(target))
}

fn set_flag(board: &mut Board, target: PendingTarget, value: bool) {
    match target {
        PendingTarget::Card { column, card } => {
            if let Some(card) = board.card_mut(column, card) {
                card.pending = value;
            }
        }
        PendingTarget::Column(index) => {
            if let Some(column) = board.column_mut(index) {
                column.pending = value;
            }
        }
        PendingTarget::None => {}
    }
}
