use super::card::Card;
use crate::error::EngineError;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use serde::Serialize;

/// A standard 52-card deck with an injected rng.
///
/// Shuffling is deterministic given the seed the deck was built with, which
/// is what makes whole hands replayable. The rng travels with in-memory
/// clones (so a rolled-back table re-deals the exact same future cards) but
/// is not part of the persisted snapshot layout; decks deserialized from
/// JSON come back cold-seeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
    #[serde(skip, default = "Deck::cold")]
    rng: SmallRng,
}

impl Deck {
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(SmallRng::seed_from_u64(seed))
    }
    pub fn from_rng(rng: SmallRng) -> Self {
        Self {
            cards: (0..52).map(Card::from).collect(),
            rng,
        }
    }
    fn cold() -> SmallRng {
        SmallRng::seed_from_u64(0)
    }

    /// The complement deck: every card except the ones already out. This is
    /// how a mid-hand table gets rebuilt around known holes and board.
    pub fn lacking(removed: &[Card]) -> Self {
        Self {
            cards: (0..52)
                .map(Card::from)
                .filter(|c| !removed.contains(c))
                .collect(),
            rng: Self::cold(),
        }
    }

    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut self.rng);
    }

    /// put all 52 cards back, in canonical order; the rng keeps its state
    pub fn reset(&mut self) {
        self.cards = (0..52).map(Card::from).collect();
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn deal(&mut self, n: usize) -> Result<Vec<Card>, EngineError> {
        if n > self.cards.len() {
            return Err(EngineError::InvalidInput(format!(
                "cannot deal {} cards, {} remaining",
                n,
                self.cards.len()
            )));
        }
        Ok((0..n).filter_map(|_| self.cards.pop()).collect())
    }

    pub fn peek(&self) -> Option<Card> {
        self.cards.last().copied()
    }
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
    pub fn contains(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// empty the deck entirely; redacted views hand strategies no deal order
    pub(crate) fn clear(&mut self) {
        self.cards.clear();
    }
}

// rng state is invisible to equality; two decks compare by card order
impl PartialEq for Deck {
    fn eq(&self, other: &Self) -> bool {
        self.cards == other.cards
    }
}
impl Eq for Deck {}
