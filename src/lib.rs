//! Deterministic, transactional Texas Hold'em hand-progression engine.
//!
//! The crate is organized around a single mutable [`state::Table`] per game
//! session. A [`service::CommandService`] is the sole mutator: it routes
//! player actions through one handler per [`state::Phase`], re-checks the
//! chip-conservation invariants after every mutation, and either commits
//! (publishing the buffered domain events) or rolls the table back to the
//! pre-command snapshot. A [`service::QueryService`] answers everything
//! read-only from immutable [`snapshot::Snapshot`]s.
//!
//! Nothing in here prints, blocks, or reaches for global randomness: decks
//! are seeded, logging goes through the `log` facade, and hosts observe the
//! engine through the event bus and snapshots.

pub mod cards;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod events;
pub mod invariant;
pub mod machine;
pub mod phases;
pub mod pots;
pub mod service;
pub mod snapshot;
pub mod state;
pub mod strategy;

/// chip amounts; a dimension alias keeps signatures honest
pub type Chips = u32;

/// milliseconds since the unix epoch, used to stamp events and snapshots
pub(crate) fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
