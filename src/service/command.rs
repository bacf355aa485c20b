use super::outcome::Outcome;
use crate::Chips;
use crate::config::GameConfig;
use crate::error::EngineError;
use crate::events::bus::EventBus;
use crate::events::event::EventKind;
use crate::events::event::GameEvent;
use crate::invariant::validator;
use crate::machine::machine::StateMachine;
use crate::now_millis;
use crate::phases::betting;
use crate::snapshot::manager::SnapshotManager;
use crate::snapshot::snapshot::Snapshot;
use crate::state::action::PlayerAction;
use crate::state::phase::Phase;
use crate::state::table::Table;
use crate::strategy::Strategy;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use uuid::Uuid;

/// Everything the engine keeps per game.
pub struct Session {
    pub(crate) table: Table,
    pub(crate) machine: StateMachine,
    pub(crate) snapshots: SnapshotManager,
    /// total chips in the session, fixed at creation; conservation anchor
    pub(crate) bankroll: Chips,
}

pub(crate) type Sessions = HashMap<String, Session>;

/// The sole mutator of game state.
///
/// Every public command runs inside an atomic scope: snapshot the table,
/// apply the operation, re-check every invariant, then either commit and
/// publish the buffered events in order, or restore the snapshot in place
/// and publish a rollback marker. A failed command leaves the session
/// exactly as it found it; a successful one never publishes events out of
/// order with a later command.
pub struct CommandService {
    sessions: Arc<Mutex<Sessions>>,
    strategies: Mutex<HashMap<String, HashMap<String, Box<dyn Strategy>>>>,
    bus: Arc<EventBus>,
    config: GameConfig,
}

impl CommandService {
    pub fn new(bus: Arc<EventBus>, config: GameConfig) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            strategies: Mutex::new(HashMap::new()),
            bus,
            config,
        }
    }

    /// the read side, sharing this service's session store and bus
    pub fn queries(&self) -> super::query::QueryService {
        super::query::QueryService::new(Arc::clone(&self.sessions), Arc::clone(&self.bus))
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    fn lock_sessions(&self) -> std::sync::MutexGuard<'_, Sessions> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a session in Init with the configured stacks and blinds.
    pub fn create_game(&self, game_id: &str, player_ids: &[&str]) -> Outcome {
        self.create_game_with(
            game_id,
            player_ids,
            self.config.initial_chips,
            self.config.small_blind,
            self.config.big_blind,
        )
    }

    pub fn create_game_with(
        &self,
        game_id: &str,
        player_ids: &[&str],
        initial_chips: Chips,
        small_blind: Chips,
        big_blind: Chips,
    ) -> Outcome {
        if let Err(error) =
            Self::validate_creation(game_id, player_ids, initial_chips, small_blind, big_blind)
        {
            return Outcome::fail(&error);
        }
        let mut sessions = self.lock_sessions();
        if sessions.contains_key(game_id) {
            return Outcome::fail(&EngineError::InvalidInput(format!(
                "game {} already exists",
                game_id
            )));
        }
        let rng = match self.config.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let ids: Vec<String> = player_ids.iter().map(|s| s.to_string()).collect();
        let deck = crate::cards::deck::Deck::from_rng(rng);
        let table = Table::new(game_id, &ids, initial_chips, small_blind, big_blind, deck);
        let bankroll = table.chips_total();
        sessions.insert(
            game_id.to_string(),
            Session {
                table,
                machine: StateMachine::new(),
                snapshots: SnapshotManager::bounded(self.config.snapshot_history),
                bankroll,
            },
        );
        drop(sessions);
        log::info!("game {} created with {} seats", game_id, ids.len());
        self.bus.publish(&GameEvent::new(
            EventKind::GameStarted,
            Phase::Init,
            json!({
                "game_id": game_id,
                "players": ids,
                "initial_chips": initial_chips,
                "small_blind": small_blind,
                "big_blind": big_blind,
            }),
        ));
        Outcome::ok_with(
            format!("game {} created", game_id),
            json!({ "game_id": game_id, "players": player_ids }),
        )
    }

    /// Adopt a session from a snapshot, e.g. one a host persisted earlier.
    /// Structure is validated; the game resumes exactly where the snapshot
    /// left it.
    pub fn restore_game(&self, game_id: &str, snapshot: &Snapshot) -> Outcome {
        let table = match SnapshotManager::restore(snapshot) {
            Ok(mut table) => {
                table.game_id = game_id.to_string();
                table
            }
            Err(error) => return Outcome::fail(&error),
        };
        let mut sessions = self.lock_sessions();
        if sessions.contains_key(game_id) {
            return Outcome::fail(&EngineError::InvalidInput(format!(
                "game {} already exists",
                game_id
            )));
        }
        let bankroll = table.chips_total() + table.pot;
        sessions.insert(
            game_id.to_string(),
            Session {
                table,
                machine: StateMachine::new(),
                snapshots: SnapshotManager::bounded(self.config.snapshot_history),
                bankroll,
            },
        );
        drop(sessions);
        self.bus.publish(&GameEvent::new(
            EventKind::GameStarted,
            snapshot.table.phase,
            json!({ "game_id": game_id, "restored": true }),
        ));
        Outcome::ok(format!("game {} restored", game_id))
    }

    /// Post blinds, deal, and open the first betting round.
    pub fn start_new_hand(&self, game_id: &str) -> Outcome {
        let outcome = self.mutate(game_id, "start_new_hand", false, |session| {
            let Session { table, machine, .. } = session;
            if !matches!(table.phase, Phase::Init | Phase::Finished) {
                return Err(EngineError::PhaseError(format!(
                    "cannot start a hand during {}",
                    table.phase
                )));
            }
            if table.funded_count() < 2 {
                return Err(EngineError::PhaseError(
                    "need at least two funded seats to start a hand".to_string(),
                ));
            }
            let mut events = Vec::new();
            table.hand_number += 1;
            table.showdown_complete = false;
            table.awards.clear();
            table.board.clear();
            table.pot = 0;
            table.stake = 0;
            table.last_raise = 0;
            table.actor = None;
            for seat in table.seats.iter_mut() {
                seat.reset_for_hand();
            }
            table.deck.reset();
            table.deck.shuffle();
            log::info!("game {}: hand {} begins", table.game_id, table.hand_number);
            events.push(GameEvent::new(
                EventKind::HandStarted,
                table.phase,
                json!({
                    "hand_number": table.hand_number,
                    "players": table
                        .seats
                        .iter()
                        .filter(|s| s.stack > 0)
                        .map(|s| s.id.clone())
                        .collect::<Vec<_>>(),
                }),
            ));
            Self::post_blinds(table, &mut events);
            machine.transition(table, Phase::PreFlop, &mut events)?;
            roll_forward(table, machine, &mut events, false)?;
            let data = json!({
                "hand_number": table.hand_number,
                "phase": table.phase.to_string(),
                "active_player_id": table.actor_id(),
            });
            Ok((events, data))
        });
        if outcome.success {
            self.drive(game_id);
        }
        outcome
    }

    /// Validate turn ownership, apply the action through the phase handler,
    /// and carry the hand forward as far as it goes on its own.
    pub fn execute_player_action(
        &self,
        game_id: &str,
        player_id: &str,
        action: PlayerAction,
    ) -> Outcome {
        let outcome = self.execute_inner(game_id, player_id, action);
        if outcome.success {
            self.drive(game_id);
        }
        outcome
    }

    fn execute_inner(&self, game_id: &str, player_id: &str, action: PlayerAction) -> Outcome {
        self.mutate(game_id, "execute_player_action", true, |session| {
            let Session { table, machine, .. } = session;
            let index = table.seat_index(player_id).ok_or_else(|| {
                EngineError::InvalidInput(format!("unknown player {}", player_id))
            })?;
            if table.actor != Some(index) {
                return Err(EngineError::NotYourTurn {
                    player: player_id.to_string(),
                });
            }
            let mut events = Vec::new();
            events.push(GameEvent::new(
                EventKind::PlayerActionExecuted,
                table.phase,
                json!({
                    "player_id": player_id,
                    "action": action.kind,
                    "amount": action.amount,
                }),
            ));
            machine.dispatch(table, index, &action, &mut events)?;
            let auto_finish = events.iter().any(|e| e.kind == EventKind::HandAutoFinish);
            if auto_finish {
                roll_forward(table, machine, &mut events, false)?;
            } else if betting::round_complete(table) {
                events.push(GameEvent::new(
                    EventKind::BettingRoundComplete,
                    table.phase,
                    json!({ "street": table.phase.to_string(), "stake": table.stake }),
                ));
                roll_forward(table, machine, &mut events, true)?;
            }
            let data = json!({
                "phase": table.phase.to_string(),
                "pot": table.pot,
                "active_player_id": table.actor_id(),
            });
            Ok((events, data))
        })
    }

    /// Deterministic progression for hosts that drive phases explicitly:
    /// performs exactly the transitions a completed betting round implies.
    pub fn advance_phase(&self, game_id: &str) -> Outcome {
        let outcome = self.mutate(game_id, "advance_phase", false, |session| {
            let Session { table, machine, .. } = session;
            if !table.phase.is_betting() {
                return Err(EngineError::PhaseError(format!(
                    "nothing to advance during {}",
                    table.phase
                )));
            }
            let finished_betting = betting::round_complete(table);
            if table.in_hand_count() > 1 && !finished_betting {
                return Err(EngineError::PhaseError(
                    "the betting round is still open".to_string(),
                ));
            }
            let mut events = Vec::new();
            roll_forward(table, machine, &mut events, finished_betting)?;
            let data = json!({
                "phase": table.phase.to_string(),
                "active_player_id": table.actor_id(),
            });
            Ok((events, data))
        });
        if outcome.success {
            self.drive(game_id);
        }
        outcome
    }

    /// Destroy a session and everything scoped to it.
    pub fn remove_game(&self, game_id: &str) -> Outcome {
        let removed = self.lock_sessions().remove(game_id);
        self.strategies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(game_id);
        match removed {
            Some(_) => {
                log::info!("game {} removed", game_id);
                Outcome::ok(format!("game {} removed", game_id))
            }
            None => Outcome::fail(&EngineError::InvalidInput(format!(
                "unknown game {}",
                game_id
            ))),
        }
    }

    /// Seat an AI: from now on the service asks this strategy to act
    /// whenever the seat holds the action.
    pub fn attach_strategy(
        &self,
        game_id: &str,
        player_id: &str,
        strategy: Box<dyn Strategy>,
    ) -> Outcome {
        let sessions = self.lock_sessions();
        let Some(session) = sessions.get(game_id) else {
            return Outcome::fail(&EngineError::InvalidInput(format!(
                "unknown game {}",
                game_id
            )));
        };
        if session.table.seat_index(player_id).is_none() {
            return Outcome::fail(&EngineError::InvalidInput(format!(
                "unknown player {}",
                player_id
            )));
        }
        drop(sessions);
        self.strategies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(game_id.to_string())
            .or_default()
            .insert(player_id.to_string(), strategy);
        Outcome::ok(format!("{} now plays {}", player_id, game_id))
    }

    /// Let attached strategies act until the action reaches a human seat or
    /// the hand stops. An illegal AI decision is rolled back like any other
    /// command and answered with a forced fold so the table cannot wedge.
    fn drive(&self, game_id: &str) {
        loop {
            let decision = {
                let sessions = self.lock_sessions();
                let Some(session) = sessions.get(game_id) else { break };
                let Some(actor_id) = session.table.actor_id().map(str::to_string) else {
                    break;
                };
                let strategies = self
                    .strategies
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                let Some(strategy) = strategies
                    .get(game_id)
                    .and_then(|game| game.get(&actor_id))
                else {
                    break;
                };
                let view = Snapshot {
                    snapshot_id: Uuid::new_v4(),
                    version: 0,
                    created_at: now_millis(),
                    hand_number: session.table.hand_number,
                    description: Some("strategy view".to_string()),
                    table: session.table.clone(),
                }
                .redacted_for(&actor_id);
                (actor_id.clone(), strategy.decide(&view, &actor_id))
            };
            let (actor_id, action) = decision;
            log::debug!("{} decides {}", actor_id, action);
            let outcome = self.execute_inner(game_id, &actor_id, action);
            if !outcome.success {
                log::warn!(
                    "strategy for {} produced an illegal action ({}); folding",
                    actor_id,
                    outcome.message
                );
                let folded = self.execute_inner(game_id, &actor_id, PlayerAction::fold());
                if !folded.success {
                    break;
                }
            }
        }
    }

    /// The atomic scope shared by every mutating command.
    fn mutate<F>(&self, game_id: &str, operation: &str, action_shaped: bool, f: F) -> Outcome
    where
        F: FnOnce(&mut Session) -> Result<(Vec<GameEvent>, serde_json::Value), EngineError>,
    {
        let mut sessions = self.lock_sessions();
        let Some(session) = sessions.get_mut(game_id) else {
            return Outcome::fail(&EngineError::InvalidInput(format!(
                "unknown game {}",
                game_id
            )));
        };
        // rollback baseline, kept both locally and in the snapshot history
        session
            .snapshots
            .capture(&session.table, Some(operation.to_string()));
        let baseline = session.table.clone();
        let mark = session.machine.mark();
        let result = f(&mut *session).and_then(|ok| {
            validator::check_all(&session.table, session.bankroll).map(|()| ok)
        });
        match result {
            Ok((mut events, data)) => {
                drop(sessions);
                // one correlation id ties together everything this command did
                let correlation = Uuid::new_v4().to_string();
                for event in events.iter_mut() {
                    event.correlation_id = Some(correlation.clone());
                    self.bus.publish(event);
                }
                Outcome::ok_with(format!("{} committed", operation), data)
            }
            Err(error) => {
                // restore by field replacement; outside references to the
                // session stay valid and nothing half-applied survives
                session.table = baseline;
                session.machine.truncate(mark);
                let phase = session.table.phase;
                drop(sessions);
                log::warn!("{} on {} rolled back: {}", operation, game_id, error);
                if action_shaped && !error.is_fatal() {
                    self.bus.publish(&GameEvent::new(
                        EventKind::InvalidAction,
                        phase,
                        json!({ "operation": operation, "reason": error.to_string() }),
                    ));
                }
                self.bus.publish(&GameEvent::new(
                    EventKind::RolledBack,
                    phase,
                    json!({
                        "operation": operation,
                        "error": error.to_string(),
                        "error_code": error.code(),
                    }),
                ));
                Outcome::fail(&error)
            }
        }
    }

    fn post_blinds(table: &mut Table, events: &mut Vec<GameEvent>) {
        let funded: Vec<usize> = (0..table.seats.len())
            .filter(|&i| table.seats[i].stack > 0)
            .collect();
        let small = funded[0];
        let big = funded[1];
        let dealer = if funded.len() == 2 { small } else { funded[funded.len() - 1] };
        table.seats[dealer].dealer = true;
        table.seats[small].small_blind = true;
        table.seats[big].big_blind = true;
        for (index, blind, name) in [
            (small, table.small_blind, "small"),
            (big, table.big_blind, "big"),
        ] {
            let posted = table.seats[index].bet(blind);
            table.pot += posted;
            log::debug!("{} posts the {} blind: {}", table.seats[index].id, name, posted);
            events.push(GameEvent::new(
                EventKind::BetPlaced,
                table.phase,
                json!({
                    "player_id": table.seats[index].id,
                    "amount": posted,
                    "blind": name,
                }),
            ));
        }
        // the price of entry is the full big blind even if the big blind
        // seat could only post short
        table.stake = table.big_blind;
        table.last_raise = 0;
        events.push(GameEvent::new(
            EventKind::PotUpdated,
            table.phase,
            json!({ "pot": table.pot, "stake": table.stake }),
        ));
    }

    fn validate_creation(
        game_id: &str,
        player_ids: &[&str],
        initial_chips: Chips,
        small_blind: Chips,
        big_blind: Chips,
    ) -> Result<(), EngineError> {
        if game_id.is_empty() {
            return Err(EngineError::InvalidInput("empty game id".to_string()));
        }
        if player_ids.len() < 2 {
            return Err(EngineError::InvalidInput(
                "a game needs at least two players".to_string(),
            ));
        }
        let mut unique: Vec<&str> = player_ids.to_vec();
        unique.sort_unstable();
        unique.dedup();
        if unique.len() != player_ids.len() {
            return Err(EngineError::InvalidInput(
                "duplicate player ids".to_string(),
            ));
        }
        if player_ids.iter().any(|id| id.is_empty()) {
            return Err(EngineError::InvalidInput("empty player id".to_string()));
        }
        if initial_chips == 0 {
            return Err(EngineError::InvalidInput(
                "players need a non-zero starting stack".to_string(),
            ));
        }
        if small_blind == 0 || big_blind <= small_blind {
            return Err(EngineError::InvalidInput(
                "blinds must satisfy 0 < small < big".to_string(),
            ));
        }
        Ok(())
    }
}

/// Carry the hand forward while no betting decision is pending.
///
/// `advance_due` marks that a betting round just completed and the next
/// street is owed. Once a street is entered it only cascades further while
/// at most one seat can act (an all-in runout); two or more live seats
/// stop the roll and wait for input. Showdown settles on entry and falls
/// through to Finished; a hand reduced to one live seat short-circuits to
/// Finished directly.
fn roll_forward(
    table: &mut Table,
    machine: &mut StateMachine,
    events: &mut Vec<GameEvent>,
    mut advance_due: bool,
) -> Result<(), EngineError> {
    loop {
        if table.phase == Phase::Showdown {
            machine.transition(table, Phase::Finished, events)?;
            continue;
        }
        if !table.phase.is_betting() {
            return Ok(());
        }
        if table.in_hand_count() <= 1 {
            machine.transition(table, Phase::Finished, events)?;
            continue;
        }
        if !advance_due {
            if betting::action_pending(table) {
                return Ok(());
            }
            advance_due = true;
            continue;
        }
        let next = table
            .phase
            .next_street()
            .ok_or_else(|| EngineError::StateCorruption("betting phase without successor".to_string()))?;
        machine.transition(table, next, events)?;
        advance_due = false;
    }
}
