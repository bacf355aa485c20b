use crate::now_millis;
use crate::state::phase::Phase;
use serde::Deserialize;
use serde::Serialize;

/// Everything the engine announces to the outside world.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    GameStarted,
    HandStarted,
    PhaseChanged,
    PlayerActionExecuted,
    PlayerFolded,
    PlayerCalled,
    PlayerRaised,
    PlayerChecked,
    PlayerAllIn,
    BetPlaced,
    PotUpdated,
    CardsDealt,
    CommunityCardsRevealed,
    BettingRoundComplete,
    HandAutoFinish,
    HandEnded,
    InvalidAction,
    RolledBack,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Self::GameStarted => "game_started",
            Self::HandStarted => "hand_started",
            Self::PhaseChanged => "phase_changed",
            Self::PlayerActionExecuted => "player_action_executed",
            Self::PlayerFolded => "player_folded",
            Self::PlayerCalled => "player_called",
            Self::PlayerRaised => "player_raised",
            Self::PlayerChecked => "player_checked",
            Self::PlayerAllIn => "player_all_in",
            Self::BetPlaced => "bet_placed",
            Self::PotUpdated => "pot_updated",
            Self::CardsDealt => "cards_dealt",
            Self::CommunityCardsRevealed => "community_cards_revealed",
            Self::BettingRoundComplete => "betting_round_complete",
            Self::HandAutoFinish => "hand_auto_finish",
            Self::HandEnded => "hand_ended",
            Self::InvalidAction => "invalid_action",
            Self::RolledBack => "rolled_back",
        };
        write!(f, "{}", name)
    }
}

/// A domain event: what happened, in which phase, with a free-form payload.
///
/// Payloads are json maps rather than typed structs on purpose: consumers
/// range from loggers to UIs to test probes, and none of them should force
/// a schema on the others. Hole cards never appear in payloads; board cards
/// do, since they are public the moment they are dealt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub kind: EventKind,
    pub data: serde_json::Value,
    pub source_phase: Phase,
    pub timestamp: u64,
    pub correlation_id: Option<String>,
}

impl GameEvent {
    pub fn new(kind: EventKind, source_phase: Phase, data: serde_json::Value) -> Self {
        Self {
            kind,
            data,
            source_phase,
            timestamp: now_millis(),
            correlation_id: None,
        }
    }

    pub fn correlated(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// convenience accessor for string payload fields
    pub fn field(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(|v| v.as_str())
    }
}

impl std::fmt::Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[{}] {} {}", self.source_phase, self.kind, self.data)
    }
}
