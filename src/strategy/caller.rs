use super::Strategy;
use crate::snapshot::snapshot::Snapshot;
use crate::state::action::PlayerAction;

/// The simplest possible opponent: checks when checking is free, calls
/// anything otherwise. Useful as a driver seat and as ballast in tests; it
/// never folds, so hands reach showdown and settlement code gets exercised.
pub struct Caller;

impl Strategy for Caller {
    fn decide(&self, view: &Snapshot, player_id: &str) -> PlayerAction {
        let owed = view
            .table
            .seat(player_id)
            .map(|seat| view.table.stake.saturating_sub(seat.stake))
            .unwrap_or(0);
        match owed {
            0 => PlayerAction::check(),
            _ => PlayerAction::call(),
        }
    }
}
