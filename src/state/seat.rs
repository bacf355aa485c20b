use crate::Chips;
use crate::cards::card::Card;
use serde::Deserialize;
use serde::Serialize;

/// Where a seat stands within the current hand.
///
/// `AllIn` seats are still in the hand (their cards go to showdown) but can
/// take no further action; `Out` seats are felted and skipped entirely until
/// they would rebuy, which this engine does not model.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatStatus {
    Active,
    Folded,
    AllIn,
    Out,
}

impl std::fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Folded => write!(f, "folded"),
            Self::AllIn => write!(f, "all_in"),
            Self::Out => write!(f, "out"),
        }
    }
}

/// One chair at the table.
///
/// Chip flow vocabulary: `stack` is what the player still holds, `stake` is
/// what they have in front of them this betting round, `spent` is their
/// total contribution to the hand. `stake` folds into `spent` the moment
/// chips move, so pot == Σ spent at every rest point of a betting street.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub id: String,
    pub name: String,
    pub position: usize,
    pub stack: Chips,
    pub stake: Chips,
    pub spent: Chips,
    pub status: SeatStatus,
    pub hole: Vec<Card>,
    pub dealer: bool,
    pub small_blind: bool,
    pub big_blind: bool,
}

impl Seat {
    pub fn new(id: impl Into<String>, position: usize, stack: Chips) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            position,
            stack,
            stake: 0,
            spent: 0,
            status: if stack > 0 { SeatStatus::Active } else { SeatStatus::Out },
            hole: Vec::new(),
            dealer: false,
            small_blind: false,
            big_blind: false,
        }
    }

    /// still contesting the pot (has not folded and was dealt in)
    pub fn in_hand(&self) -> bool {
        matches!(self.status, SeatStatus::Active | SeatStatus::AllIn)
    }

    /// may take a betting decision right now
    pub fn actionable(&self) -> bool {
        matches!(self.status, SeatStatus::Active) && self.stack > 0
    }

    pub fn is_all_in(&self) -> bool {
        matches!(self.status, SeatStatus::AllIn)
    }

    /// Move up to `amount` from stack into stake+spent; returns what moved.
    /// A seat that commits its last chip flips to AllIn on the spot.
    pub fn bet(&mut self, amount: Chips) -> Chips {
        let moved = amount.min(self.stack);
        self.stack -= moved;
        self.stake += moved;
        self.spent += moved;
        if self.stack == 0 && moved > 0 {
            self.status = SeatStatus::AllIn;
        }
        moved
    }

    pub fn win(&mut self, amount: Chips) {
        self.stack += amount;
    }

    /// per-hand reinitialization; the stack is the only thing that persists
    pub fn reset_for_hand(&mut self) {
        self.stake = 0;
        self.spent = 0;
        self.hole.clear();
        self.dealer = false;
        self.small_blind = false;
        self.big_blind = false;
        self.status = if self.stack > 0 { SeatStatus::Active } else { SeatStatus::Out };
    }

    /// street rollover: the round stake resets, the hand total survives
    pub fn reset_stake(&mut self) {
        self.stake = 0;
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:<8} {:<7} {:>6}", self.id, self.status, self.stack)
    }
}
