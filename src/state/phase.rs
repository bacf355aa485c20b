/// Lifecycle of one hand.
///
/// The betting streets run PreFlop through River; Showdown settles the pot;
/// Finished is the resting state between hands. Transitions are only legal
/// along [`Phase::may_enter`], which the state machine enforces on every
/// move.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Init,
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
    Finished,
}

impl Phase {
    pub const fn all() -> &'static [Self] {
        &[
            Self::Init,
            Self::PreFlop,
            Self::Flop,
            Self::Turn,
            Self::River,
            Self::Showdown,
            Self::Finished,
        ]
    }

    /// the legal transition graph; everything else is a phase error
    pub const fn may_enter(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Init, Self::PreFlop)
                | (Self::PreFlop, Self::Flop)
                | (Self::PreFlop, Self::Showdown)
                | (Self::PreFlop, Self::Finished)
                | (Self::Flop, Self::Turn)
                | (Self::Flop, Self::Showdown)
                | (Self::Flop, Self::Finished)
                | (Self::Turn, Self::River)
                | (Self::Turn, Self::Showdown)
                | (Self::Turn, Self::Finished)
                | (Self::River, Self::Showdown)
                | (Self::River, Self::Finished)
                | (Self::Showdown, Self::Finished)
                | (Self::Finished, Self::PreFlop)
                | (Self::Finished, Self::Init)
        )
    }

    /// where a completed betting round goes next
    pub const fn next_street(self) -> Option<Self> {
        match self {
            Self::PreFlop => Some(Self::Flop),
            Self::Flop => Some(Self::Turn),
            Self::Turn => Some(Self::River),
            Self::River => Some(Self::Showdown),
            _ => None,
        }
    }

    /// community cards revealed on entry
    pub const fn n_revealed(self) -> usize {
        match self {
            Self::Flop => 3,
            Self::Turn | Self::River => 1,
            _ => 0,
        }
    }

    pub const fn is_betting(self) -> bool {
        matches!(self, Self::PreFlop | Self::Flop | Self::Turn | Self::River)
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::PreFlop => write!(f, "preflop"),
            Self::Flop => write!(f, "flop"),
            Self::Turn => write!(f, "turn"),
            Self::River => write!(f, "river"),
            Self::Showdown => write!(f, "showdown"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

use serde::Deserialize;
use serde::Serialize;
use std::fmt::{Display, Formatter, Result};
