use crate::error::EngineError;
use crate::events::event::EventKind;
use crate::events::event::GameEvent;
use crate::now_millis;
use crate::phases;
use crate::state::action::PlayerAction;
use crate::state::phase::Phase;
use crate::state::table::Table;
use serde::Deserialize;
use serde::Serialize;
use serde_json::json;

/// One recorded phase move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: Phase,
    pub to: Phase,
    pub hand_number: u64,
    pub at: u64,
}

/// Drives a [`Table`] through the phase graph.
///
/// The machine owns no game state; it enforces transition legality, runs
/// the target phase's entry effects, and keeps the transition history for
/// diagnostics and replay. Failed commands truncate the history back to
/// where the command started, so the record never shows moves that were
/// rolled away.
#[derive(Default)]
pub struct StateMachine {
    history: Vec<Transition>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the table to `next`, recording the move and running the entry
    /// effects of the phase being entered. A `PhaseChanged` event lands in
    /// the buffer before any event the entry effects produce.
    pub fn transition(
        &mut self,
        table: &mut Table,
        next: Phase,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), EngineError> {
        let from = table.phase;
        if !from.may_enter(next) {
            return Err(EngineError::PhaseError(format!(
                "no transition from {} to {}",
                from, next
            )));
        }
        if from == Phase::Showdown && next == Phase::Finished && !table.showdown_complete {
            return Err(EngineError::PhaseError(
                "showdown has not settled yet".to_string(),
            ));
        }
        log::debug!("phase {} -> {}", from, next);
        table.phase = next;
        self.history.push(Transition {
            from,
            to: next,
            hand_number: table.hand_number,
            at: now_millis(),
        });
        events.push(GameEvent::new(
            EventKind::PhaseChanged,
            next,
            json!({ "from": from.to_string(), "to": next.to_string() }),
        ));
        phases::handler(next).on_enter(table, events)
    }

    /// Route an action to the current phase's handler.
    pub fn dispatch(
        &self,
        table: &mut Table,
        seat: usize,
        action: &PlayerAction,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), EngineError> {
        phases::handler(table.phase).on_action(table, seat, action, events)
    }

    pub fn history(&self) -> &[Transition] {
        &self.history
    }

    pub(crate) fn mark(&self) -> usize {
        self.history.len()
    }

    pub(crate) fn truncate(&mut self, mark: usize) {
        self.history.truncate(mark);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::deck::Deck;

    fn table() -> Table {
        let ids: Vec<String> = ["p0", "p1"].iter().map(|s| s.to_string()).collect();
        Table::new("g", &ids, 1000, 50, 100, Deck::seeded(11))
    }

    #[test]
    fn illegal_transitions_are_refused() {
        let mut machine = StateMachine::new();
        let mut t = table();
        let mut events = Vec::new();
        let err = machine.transition(&mut t, Phase::Flop, &mut events).unwrap_err();
        assert!(matches!(err, EngineError::PhaseError(_)));
        assert!(machine.history().is_empty());
        assert_eq!(t.phase, Phase::Init);
    }

    #[test]
    fn legal_transition_records_history_and_emits() {
        let mut machine = StateMachine::new();
        let mut t = table();
        t.deck.shuffle();
        let mut events = Vec::new();
        machine.transition(&mut t, Phase::PreFlop, &mut events).unwrap();
        assert_eq!(t.phase, Phase::PreFlop);
        assert_eq!(machine.history().len(), 1);
        assert_eq!(machine.history()[0].from, Phase::Init);
        assert_eq!(events[0].kind, EventKind::PhaseChanged);
    }

    #[test]
    fn showdown_exit_is_gated_on_settlement() {
        let mut machine = StateMachine::new();
        let mut t = table();
        t.phase = Phase::Showdown;
        t.showdown_complete = false;
        let mut events = Vec::new();
        let err = machine.transition(&mut t, Phase::Finished, &mut events).unwrap_err();
        assert!(matches!(err, EngineError::PhaseError(_)));
    }
}
