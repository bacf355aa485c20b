use super::Strategy;
use crate::snapshot::snapshot::Snapshot;
use crate::state::action::PlayerAction;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::sync::Mutex;
use std::sync::PoisonError;

/// A seeded chaos seat: picks uniformly among its legal options, raise
/// targets included. Good ballast for soak tests; everything it produces
/// is legal, so any rejection it ever receives is an engine bug.
pub struct Chancer {
    rng: Mutex<SmallRng>,
}

impl Chancer {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }
}

impl Strategy for Chancer {
    fn decide(&self, view: &Snapshot, player_id: &str) -> PlayerAction {
        let table = &view.table;
        let Some(seat) = table.seat(player_id) else {
            return PlayerAction::fold();
        };
        let owed = table.stake.saturating_sub(seat.stake);
        let all_in_total = seat.stake + seat.stack;
        let mut options = vec![PlayerAction::fold()];
        options.push(match owed {
            0 => PlayerAction::check(),
            _ => PlayerAction::call(),
        });
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        if seat.stack > owed && all_in_total > table.stake {
            let floor = table.min_raise_target().min(all_in_total);
            options.push(PlayerAction::raise(rng.random_range(floor..=all_in_total)));
        }
        if seat.stack > 0 {
            options.push(PlayerAction::all_in());
        }
        options[rng.random_range(0..options.len())]
    }
}
