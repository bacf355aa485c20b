use super::snapshot::Snapshot;
use crate::error::EngineError;
use crate::now_millis;
use crate::state::table::Table;
use std::collections::VecDeque;
use uuid::Uuid;

/// Captures and stores snapshots for one session.
///
/// History is newest-first and bounded (default 100). Versions are
/// monotonic per manager, so two snapshots of the same session never
/// compare ambiguous.
pub struct SnapshotManager {
    history: VecDeque<Snapshot>,
    limit: usize,
    version: u64,
}

impl Default for SnapshotManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotManager {
    pub fn new() -> Self {
        Self::bounded(100)
    }

    pub fn bounded(limit: usize) -> Self {
        Self {
            history: VecDeque::new(),
            limit: limit.max(1),
            version: 0,
        }
    }

    /// deep-copy the table into a new snapshot and file it newest-first
    pub fn capture(&mut self, table: &Table, description: Option<String>) -> Snapshot {
        self.version += 1;
        let snapshot = Snapshot {
            snapshot_id: Uuid::new_v4(),
            version: self.version,
            created_at: now_millis(),
            hand_number: table.hand_number,
            description,
            table: table.clone(),
        };
        self.history.push_front(snapshot.clone());
        while self.history.len() > self.limit {
            self.history.pop_back();
        }
        snapshot
    }

    /// Rebuild a table from a snapshot. The copy is structural: callers
    /// replace their session's table with the returned value rather than
    /// rebuilding the session, so outside references stay valid.
    pub fn restore(snapshot: &Snapshot) -> Result<Table, EngineError> {
        if snapshot.table.seats.is_empty() {
            return Err(EngineError::InvalidInput(
                "cannot restore a snapshot with no seats".to_string(),
            ));
        }
        if snapshot.table.board.len() > 5 {
            return Err(EngineError::InvalidInput(
                "cannot restore a snapshot with an oversized board".to_string(),
            ));
        }
        Ok(snapshot.table.clone())
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.history.front()
    }

    pub fn get(&self, id: Uuid) -> Option<&Snapshot> {
        self.history.iter().find(|s| s.snapshot_id == id)
    }

    /// newest-first iteration
    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.history.iter()
    }

    /// trim to the `keep` newest entries
    pub fn clear_old(&mut self, keep: usize) {
        while self.history.len() > keep {
            self.history.pop_back();
        }
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
