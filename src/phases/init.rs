use super::PhaseHandler;
use crate::error::EngineError;
use crate::events::event::GameEvent;
use crate::state::action::PlayerAction;
use crate::state::phase::Phase;
use crate::state::table::Table;

/// The empty table before any hand has been dealt.
pub struct InitPhase;

impl PhaseHandler for InitPhase {
    fn phase(&self) -> Phase {
        Phase::Init
    }

    fn on_enter(&self, table: &mut Table, _events: &mut Vec<GameEvent>) -> Result<(), EngineError> {
        table.board.clear();
        table.pot = 0;
        table.stake = 0;
        table.last_raise = 0;
        table.actor = None;
        Ok(())
    }

    fn on_action(
        &self,
        _table: &mut Table,
        _seat: usize,
        _action: &PlayerAction,
        _events: &mut Vec<GameEvent>,
    ) -> Result<(), EngineError> {
        Err(EngineError::PhaseError(
            "no player actions before the first hand".to_string(),
        ))
    }
}
