use super::command::Sessions;
use crate::Chips;
use crate::error::EngineError;
use crate::events::bus::EventBus;
use crate::events::event::EventKind;
use crate::events::event::GameEvent;
use crate::machine::machine::Transition;
use crate::now_millis;
use crate::snapshot::snapshot::Snapshot;
use crate::state::action::ActionKind;
use crate::state::table::Table;
use serde::Serialize;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use uuid::Uuid;

/// One permitted action with its chip bounds, derived purely from a
/// snapshot. For fixed-amount actions min == max.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableAction {
    pub kind: ActionKind,
    pub min: Chips,
    pub max: Chips,
}

/// The game-over verdict with its evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameOver {
    pub over: bool,
    pub reason: String,
    pub players_with_chips: Vec<String>,
}

/// Read-only views over the session store.
///
/// Queries never mutate game state; they clone it. The answers are
/// snapshots and values derived from snapshots, so a host can hold one
/// across later commands without seeing anything shift underneath it.
pub struct QueryService {
    sessions: Arc<Mutex<Sessions>>,
    bus: Arc<EventBus>,
}

impl QueryService {
    pub(crate) fn new(sessions: Arc<Mutex<Sessions>>, bus: Arc<EventBus>) -> Self {
        Self { sessions, bus }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Sessions> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A full snapshot of the committed state, filed in the session's
    /// snapshot history like any other.
    pub fn snapshot(&self, game_id: &str) -> Result<Snapshot, EngineError> {
        let mut sessions = self.lock();
        let session = sessions
            .get_mut(game_id)
            .ok_or_else(|| EngineError::InvalidInput(format!("unknown game {}", game_id)))?;
        Ok(session
            .snapshots
            .capture(&session.table, Some("query".to_string())))
    }

    /// What `player_id` is allowed to see: an ephemeral snapshot with every
    /// other hole and the deck stripped out.
    pub fn view_for(&self, game_id: &str, player_id: &str) -> Result<Snapshot, EngineError> {
        let sessions = self.lock();
        let session = sessions
            .get(game_id)
            .ok_or_else(|| EngineError::InvalidInput(format!("unknown game {}", game_id)))?;
        if session.table.seat_index(player_id).is_none() {
            return Err(EngineError::InvalidInput(format!(
                "unknown player {}",
                player_id
            )));
        }
        let snapshot = Snapshot {
            snapshot_id: Uuid::new_v4(),
            version: 0,
            created_at: now_millis(),
            hand_number: session.table.hand_number,
            description: Some("player view".to_string()),
            table: session.table.clone(),
        };
        Ok(snapshot.redacted_for(player_id))
    }

    /// The actions `player_id` could take right now, with chip bounds.
    /// Empty when it is not their turn or no betting is open.
    pub fn available_actions(
        &self,
        game_id: &str,
        player_id: &str,
    ) -> Result<Vec<AvailableAction>, EngineError> {
        let sessions = self.lock();
        let session = sessions
            .get(game_id)
            .ok_or_else(|| EngineError::InvalidInput(format!("unknown game {}", game_id)))?;
        let table = &session.table;
        let index = table
            .seat_index(player_id)
            .ok_or_else(|| EngineError::InvalidInput(format!("unknown player {}", player_id)))?;
        if !table.phase.is_betting() || table.actor != Some(index) {
            return Ok(Vec::new());
        }
        Ok(Self::actions_for(table, index))
    }

    fn actions_for(table: &Table, index: usize) -> Vec<AvailableAction> {
        let seat = &table.seats[index];
        let owed = table.owed(index);
        let mut actions = vec![AvailableAction { kind: ActionKind::Fold, min: 0, max: 0 }];
        if owed == 0 {
            actions.push(AvailableAction { kind: ActionKind::Check, min: 0, max: 0 });
        } else {
            let price = owed.min(seat.stack);
            actions.push(AvailableAction { kind: ActionKind::Call, min: price, max: price });
        }
        let all_in_total = seat.stake + seat.stack;
        if seat.stack > owed && all_in_total > table.stake {
            actions.push(AvailableAction {
                kind: ActionKind::Raise,
                min: table.min_raise_target().min(all_in_total),
                max: all_in_total,
            });
        }
        if seat.stack > 0 {
            actions.push(AvailableAction {
                kind: ActionKind::AllIn,
                min: seat.stack,
                max: seat.stack,
            });
        }
        actions
    }

    /// True iff fewer than two seats still hold chips. The answer only
    /// looks at stacks: folds, all-ins, and the current phase are invisible
    /// to it, so a mid-hand query after a fold reports the game live as
    /// long as both stacks are funded.
    pub fn is_game_over(&self, game_id: &str) -> Result<GameOver, EngineError> {
        let sessions = self.lock();
        let session = sessions
            .get(game_id)
            .ok_or_else(|| EngineError::InvalidInput(format!("unknown game {}", game_id)))?;
        let players_with_chips: Vec<String> = session
            .table
            .seats
            .iter()
            .filter(|s| s.stack > 0)
            .map(|s| s.id.clone())
            .collect();
        let over = players_with_chips.len() < 2;
        Ok(GameOver {
            over,
            reason: match over {
                true => "insufficient_players_with_chips".to_string(),
                false => "enough_players_with_chips".to_string(),
            },
            players_with_chips,
        })
    }

    /// Bus history, optionally narrowed by kind and capped at the newest
    /// `limit` entries.
    pub fn event_history(
        &self,
        kind: Option<EventKind>,
        limit: Option<usize>,
    ) -> Vec<GameEvent> {
        self.bus.history(kind, limit)
    }

    /// Every phase move this session has committed.
    pub fn transition_history(&self, game_id: &str) -> Result<Vec<Transition>, EngineError> {
        let sessions = self.lock();
        let session = sessions
            .get(game_id)
            .ok_or_else(|| EngineError::InvalidInput(format!("unknown game {}", game_id)))?;
        Ok(session.machine.history().to_vec())
    }
}
