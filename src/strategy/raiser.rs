use super::Strategy;
use crate::snapshot::snapshot::Snapshot;
use crate::state::action::PlayerAction;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::sync::Mutex;
use std::sync::PoisonError;

/// An aggressive seat: raises the minimum at a configured frequency,
/// otherwise falls back to calling. Seeded, so a table of raisers replays
/// the same way every time.
pub struct Raiser {
    aggression: f64,
    rng: Mutex<SmallRng>,
}

impl Raiser {
    pub fn seeded(seed: u64) -> Self {
        Self::with_aggression(seed, 0.4)
    }

    /// `aggression` is the probability of raising when a raise is possible
    pub fn with_aggression(seed: u64, aggression: f64) -> Self {
        Self {
            aggression: aggression.clamp(0.0, 1.0),
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }
}

impl Strategy for Raiser {
    fn decide(&self, view: &Snapshot, player_id: &str) -> PlayerAction {
        let table = &view.table;
        let Some(seat) = table.seat(player_id) else {
            return PlayerAction::fold();
        };
        let owed = table.stake.saturating_sub(seat.stake);
        let all_in_total = seat.stake + seat.stack;
        let target = table.min_raise_target().min(all_in_total);
        let can_raise = seat.stack > owed && all_in_total > table.stake;
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        if can_raise && rng.random_bool(self.aggression) {
            return PlayerAction::raise(target);
        }
        match owed {
            0 => PlayerAction::check(),
            _ => PlayerAction::call(),
        }
    }
}
