pub mod betting;

pub mod finished;
pub use finished::*;

pub mod flop;
pub use flop::*;

pub mod init;
pub use init::*;

pub mod preflop;
pub use preflop::*;

pub mod river;
pub use river::*;

pub mod showdown;
pub use showdown::*;

pub mod turn;
pub use turn::*;

use crate::error::EngineError;
use crate::events::event::GameEvent;
use crate::state::action::PlayerAction;
use crate::state::phase::Phase;
use crate::state::table::Table;

/// One handler per phase. Handlers are stateless apart from their identity;
/// all game state lives on the [`Table`]. Entry effects run before any
/// action is accepted in the phase; events produced along the way are
/// buffered by the caller and only published when the whole command commits.
pub trait PhaseHandler {
    fn phase(&self) -> Phase;

    fn on_enter(&self, table: &mut Table, events: &mut Vec<GameEvent>) -> Result<(), EngineError> {
        let _ = (table, events);
        Ok(())
    }

    fn on_action(
        &self,
        table: &mut Table,
        seat: usize,
        action: &PlayerAction,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), EngineError>;
}

/// dispatch table, one static handler per phase
pub fn handler(phase: Phase) -> &'static dyn PhaseHandler {
    match phase {
        Phase::Init => &InitPhase,
        Phase::PreFlop => &PreFlopPhase,
        Phase::Flop => &FlopPhase,
        Phase::Turn => &TurnPhase,
        Phase::River => &RiverPhase,
        Phase::Showdown => &ShowdownPhase,
        Phase::Finished => &FinishedPhase,
    }
}
