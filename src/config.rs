use crate::Chips;
use serde::Deserialize;
use serde::Serialize;

/// Tunables for a game session. Everything has a sane default so hosts can
/// `GameConfig::default()` their way to a running table; `create_game`
/// accepts per-game overrides for stacks and blinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub initial_chips: Chips,
    pub small_blind: Chips,
    pub big_blind: Chips,
    /// rollback/query snapshots kept per session
    pub snapshot_history: usize,
    /// domain events kept on the bus
    pub event_history: usize,
    /// seed for the session deck; None draws one from the operating system
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_chips: 1000,
            small_blind: 50,
            big_blind: 100,
            snapshot_history: 100,
            event_history: 1000,
            rng_seed: None,
        }
    }
}
