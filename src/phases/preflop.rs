use super::PhaseHandler;
use super::betting;
use crate::error::EngineError;
use crate::events::event::EventKind;
use crate::events::event::GameEvent;
use crate::state::action::PlayerAction;
use crate::state::phase::Phase;
use crate::state::table::Table;
use serde_json::json;

/// First betting street. Entry scrubs any leftover cards from the previous
/// hand, deals two hole cards to every seat that can still bet, and puts
/// the action on the right seat: behind the big blind at a full table, on
/// the small blind heads-up.
pub struct PreFlopPhase;

impl PhaseHandler for PreFlopPhase {
    fn phase(&self) -> Phase {
        Phase::PreFlop
    }

    fn on_enter(&self, table: &mut Table, events: &mut Vec<GameEvent>) -> Result<(), EngineError> {
        table.board.clear();
        for seat in table.seats.iter_mut() {
            seat.hole.clear();
        }
        let mut dealt = Vec::new();
        for index in 0..table.seats.len() {
            if !table.seats[index].actionable() {
                continue;
            }
            let hole = table
                .deck
                .deal(2)
                .map_err(|e| EngineError::StateCorruption(format!("hole deal failed: {}", e)))?;
            log::debug!(
                "dealt {} {} to {}",
                hole[0],
                hole[1],
                table.seats[index].id
            );
            table.seats[index].hole = hole;
            dealt.push(table.seats[index].id.clone());
        }
        // card identities stay out of the payload; holes are private
        events.push(GameEvent::new(
            EventKind::CardsDealt,
            table.phase,
            json!({ "players": dealt, "cards_each": 2 }),
        ));
        if table.actor.is_none() {
            // the action opens behind the big blind wherever the blinds
            // actually landed; busted seats shift them off indices 0 and 1,
            // and heads-up the wrap puts the small blind first
            let start = match table.seats.iter().position(|s| s.big_blind) {
                Some(big) => (big + 1) % table.seats.len(),
                None => match table.seats.len() {
                    n if n >= 3 => 2,
                    _ => 0,
                },
            };
            table.actor = betting::seat_to_act(table, start);
        }
        Ok(())
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
