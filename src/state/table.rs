use super::award::Award;
use super::phase::Phase;
use super::seat::Seat;
use crate::Chips;
use crate::cards::card::Card;
use crate::cards::deck::Deck;
use serde::Deserialize;
use serde::Serialize;

/// The entire mutable state of one game session.
///
/// Seats are kept in join order and that order is the authority for blinds,
/// acting order, and remainder distribution. Everything here is plain data
/// with value semantics: `clone()` is a deep copy, which is what the atomic
/// command wrapper and the snapshot manager rely on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub game_id: String,
    pub phase: Phase,
    pub seats: Vec<Seat>,
    pub board: Vec<Card>,
    pub deck: Deck,
    pub pot: Chips,
    /// highest total stake of the current betting round
    pub stake: Chips,
    /// size of the last full raise this street; 0 until someone raises
    pub last_raise: Chips,
    /// index into `seats`, or None when no action is pending
    pub actor: Option<usize>,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub hand_number: u64,
    pub showdown_complete: bool,
    pub awards: Vec<Award>,
}

impl Table {
    pub fn new(
        game_id: impl Into<String>,
        player_ids: &[String],
        stack: Chips,
        small_blind: Chips,
        big_blind: Chips,
        deck: Deck,
    ) -> Self {
        Self {
            game_id: game_id.into(),
            phase: Phase::Init,
            seats: player_ids
                .iter()
                .enumerate()
                .map(|(position, id)| Seat::new(id.clone(), position, stack))
                .collect(),
            board: Vec::new(),
            deck,
            pot: 0,
            stake: 0,
            last_raise: 0,
            actor: None,
            small_blind,
            big_blind,
            hand_number: 0,
            showdown_complete: false,
            awards: Vec::new(),
        }
    }

    pub fn seat_index(&self, player_id: &str) -> Option<usize> {
        self.seats.iter().position(|s| s.id == player_id)
    }
    pub fn seat(&self, player_id: &str) -> Option<&Seat> {
        self.seats.iter().find(|s| s.id == player_id)
    }
    pub fn actor_seat(&self) -> Option<&Seat> {
        self.actor.and_then(|i| self.seats.get(i))
    }
    pub fn actor_id(&self) -> Option<&str> {
        self.actor_seat().map(|s| s.id.as_str())
    }

    pub fn actionable_count(&self) -> usize {
        self.seats.iter().filter(|s| s.actionable()).count()
    }
    pub fn in_hand_count(&self) -> usize {
        self.seats.iter().filter(|s| s.in_hand()).count()
    }
    pub fn funded_count(&self) -> usize {
        self.seats.iter().filter(|s| s.stack > 0).count()
    }

    pub fn chips_total(&self) -> Chips {
        self.seats.iter().map(|s| s.stack).sum()
    }
    pub fn spent_total(&self) -> Chips {
        self.seats.iter().map(|s| s.spent).sum()
    }

    /// what the given seat still owes to match the table stake
    pub fn owed(&self, index: usize) -> Chips {
        self.stake.saturating_sub(self.seats[index].stake)
    }

    /// the smallest legal full-raise target: current stake plus the last
    /// raise size, floored at the big blind
    pub fn min_raise_target(&self) -> Chips {
        self.stake + self.last_raise.max(self.big_blind)
    }

    /// First actionable seat scanning from `start` inclusive, wrapping once.
    pub fn first_actionable_from(&self, start: usize) -> Option<usize> {
        let n = self.seats.len();
        (0..n)
            .map(|i| (start + i) % n)
            .find(|&i| self.seats[i].actionable())
    }

    /// Single-assignment advancement: scan from the current actor's next
    /// seat, wrapping once, and land on the first actionable seat or None.
    /// There is never an intermediate state where the actor points at a
    /// seat that cannot act.
    pub fn advance_actor(&mut self) {
        let n = self.seats.len();
        let from = match self.actor {
            Some(i) => i,
            None => {
                self.actor = None;
                return;
            }
        };
        self.actor = (1..=n)
            .map(|step| (from + step) % n)
            .find(|&i| i != from && self.seats[i].actionable());
        if let Some(i) = self.actor {
            log::trace!("action moves to seat {} ({})", i, self.seats[i].id);
        }
    }

    /// street rollover: stakes collapse to zero, hand totals survive
    pub fn reset_betting_round(&mut self) {
        for seat in self.seats.iter_mut() {
            seat.reset_stake();
        }
        self.stake = 0;
        self.last_raise = 0;
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for seat in self.seats.iter() {
            write!(f, "{}  ", seat)?;
        }
        write!(f, "@ {:>6} {}", self.pot, self.phase)
    }
}
