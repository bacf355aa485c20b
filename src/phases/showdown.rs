use super::PhaseHandler;
use crate::error::EngineError;
use crate::evaluation::evaluator::HandEvaluator;
use crate::evaluation::result::HandResult;
use crate::events::event::EventKind;
use crate::events::event::GameEvent;
use crate::pots::carve::Contribution;
use crate::pots::carve::carve;
use crate::state::action::PlayerAction;
use crate::state::award::Award;
use crate::state::phase::Phase;
use crate::state::table::Table;
use serde_json::json;

/// Settlement. Entry audits the pot against hand totals, carves it into
/// main and side pots by contribution tier, ranks every eligible hand, and
/// pays winners immediately. Before the phase yields, every bet record is
/// zeroed in the same breath as the pot, so observers never see the
/// in-between state where money exists twice.
pub struct ShowdownPhase;

impl PhaseHandler for ShowdownPhase {
    fn phase(&self) -> Phase {
        Phase::Showdown
    }

    fn on_enter(&self, table: &mut Table, events: &mut Vec<GameEvent>) -> Result<(), EngineError> {
        table.actor = None;
        let spent = table.spent_total();
        if table.pot != spent {
            return Err(EngineError::InvariantViolation(format!(
                "settling a pot of {} against total bets of {}",
                table.pot, spent
            )));
        }

        let contributions: Vec<Contribution> = table
            .seats
            .iter()
            .map(|s| Contribution {
                player_id: s.id.clone(),
                amount: s.spent,
                folded: !s.in_hand(),
            })
            .collect();
        let carve = carve(&contributions);
        if carve.total() != table.pot {
            return Err(EngineError::InvariantViolation(format!(
                "pot decomposition lost money: {} carved from {}",
                carve.total(),
                table.pot
            )));
        }

        let board = table.board.clone();
        let mut awards: Vec<Award> = Vec::new();

        for (player_id, amount) in carve.refunds {
            let index = table.seat_index(&player_id).ok_or_else(|| {
                EngineError::StateCorruption(format!("refund for unknown seat {}", player_id))
            })?;
            table.seats[index].win(amount);
            table.pot -= amount;
            log::debug!("{} takes back an uncalled {}", player_id, amount);
            awards.push(Award {
                player_id,
                amount,
                pot: "refund".to_string(),
                ranking: None,
            });
        }

        for pot in carve.pots {
            // rank whoever can show two cards; seats dealt out of the hand
            // cannot win a contested pot
            let mut ranked: Vec<(usize, HandResult)> = Vec::new();
            for player_id in &pot.eligible {
                let index = table.seat_index(player_id).ok_or_else(|| {
                    EngineError::StateCorruption(format!("pot eligible unknown seat {}", player_id))
                })?;
                if table.seats[index].hole.len() == 2 {
                    let result = HandEvaluator::evaluate(&table.seats[index].hole, &board)?;
                    ranked.push((index, result));
                }
            }
            let winners: Vec<(usize, Option<HandResult>)> = if ranked.is_empty() {
                pot.eligible
                    .iter()
                    .filter_map(|id| table.seat_index(id))
                    .map(|i| (i, None))
                    .collect()
            } else {
                let best = ranked
                    .iter()
                    .map(|(_, r)| r.clone())
                    .max()
                    .ok_or_else(|| EngineError::StateCorruption("empty ranking".to_string()))?;
                ranked
                    .into_iter()
                    .filter(|(_, r)| *r == best)
                    .map(|(i, r)| (i, Some(r)))
                    .collect()
            };
            if winners.is_empty() {
                return Err(EngineError::StateCorruption(format!(
                    "no winner for {}",
                    pot.label
                )));
            }
            // equal shares; odd chips go to the earliest seats in join order
            let share = pot.amount / winners.len() as crate::Chips;
            let remainder = pot.amount as usize % winners.len();
            for (k, (index, ranking)) in winners.into_iter().enumerate() {
                let amount = share + if k < remainder { 1 } else { 0 };
                table.seats[index].win(amount);
                table.pot -= amount;
                log::info!(
                    "{} wins {} from the {}",
                    table.seats[index].id,
                    amount,
                    pot.label
                );
                awards.push(Award {
                    player_id: table.seats[index].id.clone(),
                    amount,
                    pot: pot.label.clone(),
                    ranking,
                });
            }
        }

        if table.pot != 0 {
            return Err(EngineError::InvariantViolation(format!(
                "{} chips left undistributed after settlement",
                table.pot
            )));
        }
        // wipe the bet records in the same step as the award, so the pot
        // identity holds again the moment anyone looks
        for seat in table.seats.iter_mut() {
            seat.stake = 0;
            seat.spent = 0;
        }
        table.stake = 0;
        table.last_raise = 0;
        table.awards = awards;
        table.showdown_complete = true;
        events.push(GameEvent::new(
            EventKind::PotUpdated,
            table.phase,
            json!({
                "pot": 0,
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
            "no player actions during showdown".to_string(),
        ))
    }
}
