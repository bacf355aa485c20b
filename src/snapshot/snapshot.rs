use crate::error::EngineError;
use crate::state::table::Table;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// An immutable deep copy of a [`Table`] plus identity metadata.
///
/// Snapshots serve two masters: queries (hosts render from them) and the
/// atomic wrapper (the rollback baseline is exactly this copy). Since a
/// snapshot owns its own `Table`, later mutation of the live session can
/// never bleed into one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub snapshot_id: Uuid,
    pub version: u64,
    pub created_at: u64,
    pub hand_number: u64,
    pub description: Option<String>,
    pub table: Table,
}

impl std::hash::Hash for Snapshot {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.snapshot_id.hash(state);
    }
}

impl Snapshot {
    /// JSON export. Phase, seats, board, pot, bets, blinds, and metadata
    /// all make the round trip; the deck rng deliberately does not.
    pub fn to_json(&self) -> Result<String, EngineError> {
        serde_json::to_string(self)
            .map_err(|e| EngineError::StateCorruption(format!("snapshot encode failed: {}", e)))
    }

    pub fn from_json(raw: &str) -> Result<Self, EngineError> {
        let snapshot: Self = serde_json::from_str(raw)
            .map_err(|e| EngineError::InvalidInput(format!("snapshot decode failed: {}", e)))?;
        if snapshot.table.seats.is_empty() {
            return Err(EngineError::InvalidInput(
                "snapshot has no seats".to_string(),
            ));
        }
        Ok(snapshot)
    }

    /// What one player is allowed to see: their own hole cards, the public
    /// table, and nothing of the deck or anyone else's holes. This is the
    /// view handed to AI strategies.
    pub fn redacted_for(&self, player_id: &str) -> Self {
        let mut view = self.clone();
        view.table.deck.clear();
        for seat in view.table.seats.iter_mut() {
            if seat.id != player_id {
                seat.hole.clear();
            }
        }
        view
    }
}

impl std::fmt::Display for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "snapshot v{} hand {} ({})",
            self.version, self.hand_number, self.table.phase
        )
    }
}
