//! The betting core shared by every street.
//!
//! PreFlop through River differ only in their entry effects; once action is
//! on a seat the rules are identical, so all four handlers delegate here.
//! Chip movement always goes through [`Seat::bet`], which is what keeps
//! pot == Σ spent true at every rest point and flips seats to all-in the
//! moment their last chip commits.

use crate::error::EngineError;
use crate::events::event::EventKind;
use crate::events::event::GameEvent;
use crate::invariant::validator;
use crate::state::action::ActionKind;
use crate::state::action::PlayerAction;
use crate::state::seat::SeatStatus;
use crate::state::table::Table;
use serde_json::json;

pub(crate) fn apply(
    table: &mut Table,
    index: usize,
    action: &PlayerAction,
    events: &mut Vec<GameEvent>,
) -> Result<(), EngineError> {
    if action.kind == ActionKind::Raise && action.amount == 0 {
        return Err(EngineError::InvalidInput(
            "raise requires a target amount".to_string(),
        ));
    }
    match action.kind {
        ActionKind::Fold => fold(table, index, events),
        ActionKind::Check => check(table, index, events),
        ActionKind::Call => call(table, index, events),
        ActionKind::Raise => raise(table, index, action.amount, events),
        ActionKind::AllIn => all_in(table, index, events),
    }
}

/// A betting round is complete when no seat that can still act is short of
/// the table stake. Covers both closing shapes: everyone matched, and
/// everyone but the shovers/folders gone.
pub(crate) fn round_complete(table: &Table) -> bool {
    table
        .seats
        .iter()
        .filter(|s| s.actionable())
        .all(|s| s.stake == table.stake)
}

/// Whose turn opens (or continues) betting, scanning from `start`: with two
/// or more live bettors, the first of them; with exactly one, only if that
/// seat still owes chips (a blind shoved past them, say); with none,
/// nobody. None here means the street plays itself out.
pub(crate) fn seat_to_act(table: &Table, start: usize) -> Option<usize> {
    let actionable: Vec<usize> = (0..table.seats.len())
        .filter(|&i| table.seats[i].actionable())
        .collect();
    match actionable.as_slice() {
        [] => None,
        [lone] => (table.owed(*lone) > 0).then_some(*lone),
        _ => table.first_actionable_from(start),
    }
}

/// any betting decision left on this street?
pub(crate) fn action_pending(table: &Table) -> bool {
    seat_to_act(table, 0).is_some()
}

/// Street entry shared by Flop, Turn, and River: reveal the street's cards,
/// audit the pot against hand totals, collapse the betting round, and put
/// the action on the first seat that can still bet (nobody, when the hand
/// is running out all-in).
pub(crate) fn enter_street(
    table: &mut Table,
    events: &mut Vec<GameEvent>,
) -> Result<(), EngineError> {
    let n = table.phase.n_revealed();
    let cards = table
        .deck
        .deal(n)
        .map_err(|e| EngineError::StateCorruption(format!("street deal failed: {}", e)))?;
    log::debug!(
        "{}: revealing {}",
        table.phase,
        cards.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" ")
    );
    table.board.extend(cards.iter().copied());
    events.push(GameEvent::new(
        EventKind::CommunityCardsRevealed,
        table.phase,
        json!({
            "street": table.phase.to_string(),
            "revealed": cards.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
            "board": table.board.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
        }),
    ));
    validator::pot_consistency(table)?;
    table.reset_betting_round();
    table.actor = seat_to_act(table, 0);
    Ok(())
}

fn fold(table: &mut Table, index: usize, events: &mut Vec<GameEvent>) -> Result<(), EngineError> {
    let seat = &mut table.seats[index];
    seat.status = SeatStatus::Folded;
    seat.stake = 0;
    let player_id = seat.id.clone();
    events.push(GameEvent::new(
        EventKind::PlayerFolded,
        table.phase,
        json!({ "player_id": player_id }),
    ));
    if table.in_hand_count() <= 1 {
        // last opposition gone; the hand decides itself
        table.actor = None;
        events.push(GameEvent::new(
            EventKind::HandAutoFinish,
            table.phase,
            json!({ "reason": "everyone else folded", "last_folder": player_id }),
        ));
    } else {
        table.advance_actor();
    }
    Ok(())
}

fn check(table: &mut Table, index: usize, events: &mut Vec<GameEvent>) -> Result<(), EngineError> {
    let owed = table.owed(index);
    if owed > 0 {
        return Err(EngineError::IllegalAction(format!(
            "cannot check facing a bet of {}",
            owed
        )));
    }
    events.push(GameEvent::new(
        EventKind::PlayerChecked,
        table.phase,
        json!({ "player_id": table.seats[index].id }),
    ));
    table.advance_actor();
    Ok(())
}

fn call(table: &mut Table, index: usize, events: &mut Vec<GameEvent>) -> Result<(), EngineError> {
    let owed = table.owed(index);
    if owed == 0 {
        // nothing to call; the action stands as a check
        events.push(GameEvent::new(
            EventKind::PlayerChecked,
            table.phase,
            json!({ "player_id": table.seats[index].id, "converted_from": "call" }),
        ));
        table.advance_actor();
        return Ok(());
    }
    let moved = table.seats[index].bet(owed);
    table.pot += moved;
    let seat = &table.seats[index];
    events.push(GameEvent::new(
        EventKind::PlayerCalled,
        table.phase,
        json!({
            "player_id": seat.id,
            "amount": moved,
            "stake": seat.stake,
            "all_in": seat.is_all_in(),
        }),
    ));
    events.push(pot_updated(table));
    table.advance_actor();
    Ok(())
}

fn raise(
    table: &mut Table,
    index: usize,
    target: crate::Chips,
    events: &mut Vec<GameEvent>,
) -> Result<(), EngineError> {
    if target <= table.stake {
        return Err(EngineError::IllegalAction(format!(
            "raise to {} does not exceed the current bet of {}",
            target, table.stake
        )));
    }
    let all_in_total = table.seats[index].stake + table.seats[index].stack;
    if target >= all_in_total {
        // the target exceeds the stack: an all-in for less, always legal
        let stack = table.seats[index].stack;
        let moved = table.seats[index].bet(stack);
        table.pot += moved;
        lift_stake(table, index);
        let seat = &table.seats[index];
        events.push(GameEvent::new(
            EventKind::PlayerRaised,
            table.phase,
            json!({
                "player_id": seat.id,
                "to": seat.stake,
                "amount": moved,
                "all_in": true,
            }),
        ));
    } else {
        if target < table.min_raise_target() {
            return Err(EngineError::IllegalAction(format!(
                "raise to {} below the minimum of {}",
                target,
                table.min_raise_target()
            )));
        }
        let owed = target - table.seats[index].stake;
        let moved = table.seats[index].bet(owed);
        table.pot += moved;
        let previous = table.stake;
        table.stake = target;
        table.last_raise = target - previous;
        events.push(GameEvent::new(
            EventKind::PlayerRaised,
            table.phase,
            json!({
                "player_id": table.seats[index].id,
                "to": target,
                "amount": moved,
                "all_in": false,
            }),
        ));
    }
    events.push(pot_updated(table));
    table.advance_actor();
    Ok(())
}

fn all_in(table: &mut Table, index: usize, events: &mut Vec<GameEvent>) -> Result<(), EngineError> {
    let stack = table.seats[index].stack;
    if stack == 0 {
        return Err(EngineError::IllegalAction(
            "no chips left to move all in".to_string(),
        ));
    }
    let moved = table.seats[index].bet(stack);
    table.pot += moved;
    lift_stake(table, index);
    let seat = &table.seats[index];
    events.push(GameEvent::new(
        EventKind::PlayerAllIn,
        table.phase,
        json!({
            "player_id": seat.id,
            "amount": moved,
            "stake": seat.stake,
        }),
    ));
    events.push(pot_updated(table));
    table.advance_actor();
    Ok(())
}

/// After an all-in, pull the table stake up to the shover's total. Only a
/// full-sized raise moves the minimum-raise marker; an all-in for less
/// leaves it where it was.
fn lift_stake(table: &mut Table, index: usize) {
    let stake = table.seats[index].stake;
    if stake > table.stake {
        let increment = stake - table.stake;
        if increment >= table.last_raise.max(table.big_blind) {
            table.last_raise = increment;
        }
        table.stake = stake;
    }
}

fn pot_updated(table: &Table) -> GameEvent {
    GameEvent::new(
        EventKind::PotUpdated,
        table.phase,
        json!({ "pot": table.pot, "stake": table.stake }),
    )
}
