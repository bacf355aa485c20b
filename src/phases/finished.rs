use super::PhaseHandler;
use crate::error::EngineError;
use crate::events::event::EventKind;
use crate::events::event::GameEvent;
use crate::state::action::PlayerAction;
use crate::state::award::Award;
use crate::state::phase::Phase;
use crate::state::seat::SeatStatus;
use crate::state::table::Table;
use serde_json::json;

/// The rest state between hands.
///
/// When a hand ends without a showdown (everyone else folded), the pot is
/// still sitting on the table; entry awards it to the lone survivor. The
/// defensive branches below should be unreachable through normal play but
/// money is never allowed to evaporate, whatever state we were handed.
pub struct FinishedPhase;

impl PhaseHandler for FinishedPhase {
    fn phase(&self) -> Phase {
        Phase::Finished
    }

    fn on_enter(&self, table: &mut Table, events: &mut Vec<GameEvent>) -> Result<(), EngineError> {
        table.actor = None;
        if table.pot > 0 {
            let survivors: Vec<usize> = (0..table.seats.len())
                .filter(|&i| table.seats[i].in_hand())
                .collect();
            let winners: Vec<usize> = if !survivors.is_empty() {
                if survivors.len() > 1 {
                    log::warn!(
                        "hand finished with {} seats still live; splitting the pot",
                        survivors.len()
                    );
                }
                survivors
            } else {
                log::warn!("hand finished with no live seats; pot goes to funded seats");
                let funded: Vec<usize> = (0..table.seats.len())
                    .filter(|&i| table.seats[i].stack > 0)
                    .collect();
                match funded.is_empty() {
                    true => (0..table.seats.len()).collect(),
                    false => funded,
                }
            };
            let total = table.pot;
            let share = total / winners.len() as crate::Chips;
            let remainder = total as usize % winners.len();
            for (k, &index) in winners.iter().enumerate() {
                let amount = share + if k < remainder { 1 } else { 0 };
                table.seats[index].win(amount);
                table.pot -= amount;
                log::info!(
                    "{} takes {} uncontested",
                    table.seats[index].id,
                    amount
                );
                table.awards.push(Award {
                    player_id: table.seats[index].id.clone(),
                    amount,
                    pot: "uncontested".to_string(),
                    ranking: None,
                });
            }
        }
        if table.pot != 0 {
            return Err(EngineError::InvariantViolation(format!(
                "{} chips left in the pot at hand end",
                table.pot
            )));
        }
        // per-hand flags come off; stacks, holes, and awards stay visible
        // for whoever wants to render the result
        for seat in table.seats.iter_mut() {
            seat.stake = 0;
            seat.spent = 0;
            seat.dealer = false;
            seat.small_blind = false;
            seat.big_blind = false;
            seat.status = if seat.stack > 0 { SeatStatus::Active } else { SeatStatus::Out };
        }
        table.stake = 0;
        table.last_raise = 0;
        events.push(GameEvent::new(
            EventKind::HandEnded,
            table.phase,
            json!({
                "hand_number": table.hand_number,
                "awards": table
                    .awards
                    .iter()
                    .map(|a| json!({ "player_id": a.player_id, "amount": a.amount, "pot": a.pot }))
                    .collect::<Vec<_>>(),
            }),
        ));
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
            "the hand is over; start a new one".to_string(),
        ))
    }
}
