//! Pure conservation checks over a [`Table`].
//!
//! Nothing here mutates anything. The command service runs [`check_all`]
//! after every mutation and rolls back on the first failure; street entries
//! additionally run [`pot_consistency`] before resetting a betting round.
//! Failure messages carry the full per-seat picture because by the time one
//! of these fires, the interesting state is about to be rolled away.

use crate::Chips;
use crate::error::EngineError;
use crate::state::action::ActionKind;
use crate::state::phase::Phase;
use crate::state::table::Table;

fn seat_dump(table: &Table) -> String {
    table
        .seats
        .iter()
        .map(|s| {
            format!(
                "{}{{stack:{} stake:{} spent:{} {}}}",
                s.id, s.stack, s.stake, s.spent, s.status
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// pot == Σ spent, except after a settlement has already folded bets away
pub fn pot_consistency(table: &Table) -> Result<(), EngineError> {
    if matches!(table.phase, Phase::Showdown | Phase::Finished) {
        return Ok(());
    }
    let spent = table.spent_total();
    if table.pot != spent {
        return Err(EngineError::InvariantViolation(format!(
            "pot {} != total bets {} in {}: {}",
            table.pot,
            spent,
            table.phase,
            seat_dump(table)
        )));
    }
    Ok(())
}

/// per-seat sanity: the seat exists and its round stake never exceeds its
/// hand total while a street is open
pub fn seat_consistency(table: &Table, player_id: &str) -> Result<(), EngineError> {
    let seat = table
        .seat(player_id)
        .ok_or_else(|| EngineError::InvalidInput(format!("unknown player {}", player_id)))?;
    if table.phase.is_betting() && seat.spent < seat.stake {
        return Err(EngineError::InvariantViolation(format!(
            "{} has hand total {} below round stake {} in {}",
            seat.id, seat.spent, seat.stake, table.phase
        )));
    }
    Ok(())
}

/// shape check for a proposed bet: the seat exists and is not asked for
/// more than it holds (all-in conversion happens before this is consulted)
pub fn betting_action(
    table: &Table,
    player_id: &str,
    kind: ActionKind,
    amount: Chips,
) -> Result<(), EngineError> {
    let seat = table
        .seat(player_id)
        .ok_or_else(|| EngineError::InvalidInput(format!("unknown player {}", player_id)))?;
    match kind {
        ActionKind::Raise if amount == 0 => Err(EngineError::InvalidInput(
            "raise requires a target amount".to_string(),
        )),
        ActionKind::Raise if amount.saturating_sub(seat.stake) > seat.stack => {
            Err(EngineError::InsufficientChips {
                needed: amount - seat.stake,
                held: seat.stack,
            })
        }
        _ => Ok(()),
    }
}

/// chips never leave the session: Σ stacks + pot is the bankroll, always
pub fn chip_conservation(table: &Table, bankroll: Chips) -> Result<(), EngineError> {
    let stacks = table.chips_total();
    let current = stacks + table.pot;
    if current != bankroll {
        return Err(EngineError::InvariantViolation(format!(
            "bankroll {} drifted to {} (stacks {} + pot {}): {}",
            bankroll,
            current,
            stacks,
            table.pot,
            seat_dump(table)
        )));
    }
    Ok(())
}

/// deck ∪ holes ∪ board must be exactly the 52 distinct cards
pub fn deck_discipline(table: &Table) -> Result<(), EngineError> {
    let mut seen = [false; 52];
    let mut total = 0usize;
    let everywhere = table
        .deck
        .cards()
        .iter()
        .chain(table.board.iter())
        .chain(table.seats.iter().flat_map(|s| s.hole.iter()));
    for card in everywhere {
        let index = u8::from(*card) as usize;
        if seen[index] {
            return Err(EngineError::InvariantViolation(format!(
                "card {} appears twice across deck, holes, and board",
                card
            )));
        }
        seen[index] = true;
        total += 1;
    }
    if total != 52 {
        return Err(EngineError::InvariantViolation(format!(
            "{} cards in circulation, expected 52",
            total
        )));
    }
    Ok(())
}

/// the actor is either nobody or a seat that can actually act
pub fn actor_validity(table: &Table) -> Result<(), EngineError> {
    match table.actor {
        None => Ok(()),
        Some(i) => match table.seats.get(i) {
            Some(seat) if seat.actionable() => Ok(()),
            Some(seat) => Err(EngineError::InvariantViolation(format!(
                "actor points at {} which cannot act ({}, stack {})",
                seat.id, seat.status, seat.stack
            ))),
            None => Err(EngineError::InvariantViolation(format!(
                "actor index {} out of bounds",
                i
            ))),
        },
    }
}

/// every invariant the atomic wrapper re-checks before a commit
pub fn check_all(table: &Table, bankroll: Chips) -> Result<(), EngineError> {
    pot_consistency(table)?;
    actor_validity(table)?;
    chip_conservation(table, bankroll)?;
    deck_discipline(table)?;
    for seat in table.seats.iter() {
        seat_consistency(table, &seat.id)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::deck::Deck;

    fn table() -> Table {
        let ids: Vec<String> = ["p0", "p1"].iter().map(|s| s.to_string()).collect();
        let mut t = Table::new("g", &ids, 500, 10, 20, Deck::seeded(3));
        t.phase = Phase::PreFlop;
        t
    }

    #[test]
    fn balanced_table_passes() {
        let mut t = table();
        t.seats[0].bet(20);
        t.seats[1].bet(20);
        t.pot = 40;
        t.stake = 20;
        assert!(check_all(&t, 1000).is_ok());
    }

    #[test]
    fn short_pot_is_reported_with_detail() {
        let mut t = table();
        t.seats[0].bet(20);
        t.pot = 5;
        let err = pot_consistency(&t).unwrap_err();
        assert!(matches!(err, EngineError::InvariantViolation(_)));
        assert!(err.to_string().contains("pot 5"));
        assert!(err.to_string().contains("p0"));
    }

    #[test]
    fn settled_phases_skip_the_pot_check() {
        let mut t = table();
        t.phase = Phase::Showdown;
        t.pot = 99; // already being distributed
        assert!(pot_consistency(&t).is_ok());
        t.phase = Phase::Finished;
        assert!(pot_consistency(&t).is_ok());
    }

    #[test]
    fn missing_chips_fail_conservation() {
        let mut t = table();
        t.seats[0].stack = 400; // 100 chips vanish
        assert!(chip_conservation(&t, 1000).is_err());
    }

    #[test]
    fn duplicate_card_breaks_discipline() {
        let mut t = table();
        assert!(deck_discipline(&t).is_ok());
        let stolen = t.deck.peek().expect("full deck");
        t.seats[0].hole.push(stolen);
        assert!(deck_discipline(&t).is_err());
    }

    #[test]
    fn dealt_cards_keep_discipline() {
        let mut t = table();
        t.deck.shuffle();
        let hole = t.deck.deal(2).unwrap();
        t.seats[0].hole = hole;
        let board = t.deck.deal(3).unwrap();
        t.board = board;
        assert!(deck_discipline(&t).is_ok());
    }

    #[test]
    fn actor_must_be_actionable() {
        let mut t = table();
        t.actor = Some(0);
        assert!(actor_validity(&t).is_ok());
        t.seats[0].bet(500); // all in
        t.pot = 500;
        assert!(actor_validity(&t).is_err());
        t.actor = None;
        assert!(actor_validity(&t).is_ok());
    }

    #[test]
    fn raise_beyond_stack_is_flagged() {
        let t = table();
        let err = betting_action(&t, "p0", ActionKind::Raise, 600).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientChips { .. }));
        assert!(betting_action(&t, "p0", ActionKind::Raise, 400).is_ok());
        assert!(betting_action(&t, "ghost", ActionKind::Call, 0).is_err());
    }
}
