pub mod caller;
pub use caller::*;

pub mod chancer;
pub use chancer::*;

pub mod raiser;
pub use raiser::*;

use crate::snapshot::snapshot::Snapshot;
use crate::state::action::PlayerAction;

/// The port an AI seat decides through.
///
/// The engine hands the strategy a redacted snapshot: its own hole cards,
/// the public table, no deck, no opponent holes. Implementations must treat
/// the view as read-only and return one action; the command service
/// validates it like any human action and falls back to a fold if the
/// decision turns out to be illegal.
pub trait Strategy: Send {
    fn decide(&self, view: &Snapshot, player_id: &str) -> PlayerAction;
}
