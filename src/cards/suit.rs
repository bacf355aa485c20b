#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Club = 0,
    Diamond = 1,
    Heart = 2,
    Spade = 3,
}

impl Suit {
    pub const fn all() -> &'static [Self] {
        &[Self::Club, Self::Diamond, Self::Heart, Self::Spade]
    }
}

// u8 isomorphism
impl From<Suit> for u8 {
    fn from(s: Suit) -> u8 {
        s as u8
    }
}
impl From<u8> for Suit {
    fn from(n: u8) -> Suit {
        match n {
            0 => Suit::Club,
            1 => Suit::Diamond,
            2 => Suit::Heart,
            3 => Suit::Spade,
            _ => panic!("invalid suit index"),
        }
    }
}

// letter notation ("c", "d", "h", "s"), symbols accepted too
impl TryFrom<char> for Suit {
    type Error = EngineError;
    fn try_from(c: char) -> std::result::Result<Self, EngineError> {
        match c {
            'c' | 'C' | '♣' => Ok(Suit::Club),
            'd' | 'D' | '♦' => Ok(Suit::Diamond),
            'h' | 'H' | '♥' => Ok(Suit::Heart),
            's' | 'S' | '♠' => Ok(Suit::Spade),
            _ => Err(EngineError::InvalidInput(format!("unknown suit {:?}", c))),
        }
    }
}

impl Display for Suit {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(
            f,
            "{}",
            match self {
                Suit::Club => "♣",
                Suit::Diamond => "♦",
                Suit::Heart => "♥",
                Suit::Spade => "♠",
            }
        )
    }
}

use crate::error::EngineError;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::{Display, Formatter, Result};
