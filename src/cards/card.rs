#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub fn rank(&self) -> Rank {
        self.rank
    }
    pub fn suit(&self) -> Suit {
        self.suit
    }
}

impl From<(Rank, Suit)> for Card {
    fn from((rank, suit): (Rank, Suit)) -> Self {
        Self { rank, suit }
    }
}

// u8 isomorphism over 0..52
impl From<Card> for u8 {
    fn from(c: Card) -> u8 {
        (c.rank.value() - 2) * 4 + u8::from(c.suit)
    }
}
impl From<u8> for Card {
    fn from(n: u8) -> Self {
        Self {
            rank: Rank::from(n / 4 + 2),
            suit: Suit::from(n % 4),
        }
    }
}

/// rank-then-suit notation: "Ah", "Td", "9♠"
impl std::str::FromStr for Card {
    type Err = EngineError;
    fn from_str(s: &str) -> std::result::Result<Self, EngineError> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(r), Some(q), None) => Ok(Self {
                rank: Rank::try_from(r)?,
                suit: Suit::try_from(q)?,
            }),
            _ => Err(EngineError::InvalidInput(format!(
                "expected rank and suit, got {:?}",
                s
            ))),
        }
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

use super::rank::Rank;
use super::suit::Suit;
use crate::error::EngineError;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::{Display, Formatter, Result};
