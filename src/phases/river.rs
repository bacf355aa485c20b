use super::PhaseHandler;
use super::betting;
use crate::error::EngineError;
use crate::events::event::GameEvent;
use crate::state::action::PlayerAction;
use crate::state::phase::Phase;
use crate::state::table::Table;

/// Last betting street: the fifth community card.
pub struct RiverPhase;

impl PhaseHandler for RiverPhase {
    fn phase(&self) -> Phase {
        Phase::River
    }

    fn on_enter(&self, table: &mut Table, events: &mut Vec<GameEvent>) -> Result<(), EngineError> {
        betting::enter_street(table, events)
    }

    fn on_action(
        &self,
        table: &mut Table,
        seat: usize,
        action: &PlayerAction,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), EngineError> {
        betting::apply(table, seat, action, events)
    }
}
