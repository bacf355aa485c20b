/// The ten hand categories, weakest first.
///
/// Category alone does not decide a showdown; ties inside a category fall
/// through to the primary/secondary values and kickers on
/// [`super::result::HandResult`].
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HandRank {
    HighCard = 1,
    OnePair = 2,
    TwoPair = 3,
    ThreeOfAKind = 4,
    Straight = 5,
    Flush = 6,
    FullHouse = 7,
    FourOfAKind = 8,
    StraightFlush = 9,
    RoyalFlush = 10,
}

impl HandRank {
    /// how many side cards participate in tie-breaks for this category
    pub const fn n_kickers(&self) -> usize {
        match self {
            Self::HighCard => 4,
            Self::OnePair => 3,
            Self::ThreeOfAKind => 2,
            Self::TwoPair | Self::FourOfAKind => 1,
            _ => 0,
        }
    }
}

impl Display for HandRank {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            Self::HighCard => write!(f, "high card"),
            Self::OnePair => write!(f, "one pair"),
            Self::TwoPair => write!(f, "two pair"),
            Self::ThreeOfAKind => write!(f, "three of a kind"),
            Self::Straight => write!(f, "straight"),
            Self::Flush => write!(f, "flush"),
            Self::FullHouse => write!(f, "full house"),
            Self::FourOfAKind => write!(f, "four of a kind"),
            Self::StraightFlush => write!(f, "straight flush"),
            Self::RoyalFlush => write!(f, "royal flush"),
        }
    }
}

use serde::Deserialize;
use serde::Serialize;
use std::fmt::{Display, Formatter, Result};
