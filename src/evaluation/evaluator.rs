use super::ranking::HandRank;
use super::result::HandResult;
use crate::cards::card::Card;
use crate::error::EngineError;

/// Finds the best five-card value reachable from hole plus community cards.
///
/// Works on compact masks rather than card combinations: a u16 of present
/// ranks (bit index == rank value), one such mask per suit, and per-rank
/// multiplicities. Every category probe reads those three projections, so a
/// seven-card evaluation costs a handful of bitwise passes instead of a
/// 21-way combination walk.
pub struct HandEvaluator;

impl HandEvaluator {
    /// Evaluate exactly 2 hole cards against 0..=5 community cards.
    /// At least 5 cards total are required to form a hand.
    pub fn evaluate(hole: &[Card], community: &[Card]) -> Result<HandResult, EngineError> {
        if hole.len() != 2 {
            return Err(EngineError::InvalidInput(format!(
                "expected 2 hole cards, got {}",
                hole.len()
            )));
        }
        if community.len() > 5 {
            return Err(EngineError::InvalidInput(format!(
                "expected at most 5 community cards, got {}",
                community.len()
            )));
        }
        if hole.len() + community.len() < 5 {
            return Err(EngineError::InvalidInput(format!(
                "need at least 5 cards to evaluate, got {}",
                hole.len() + community.len()
            )));
        }
        let cards: Vec<Card> = hole.iter().chain(community.iter()).copied().collect();
        Ok(Self::best(&cards))
    }

    /// three-way comparison; +1 when `a` wins, -1 when `b` wins
    pub fn compare(a: &HandResult, b: &HandResult) -> i32 {
        a.compare(b)
    }

    fn best(cards: &[Card]) -> HandResult {
        let mut counts = [0u8; 15];
        let mut rank_mask = 0u16;
        let mut suit_masks = [0u16; 4];
        let mut suit_counts = [0u8; 4];
        for card in cards {
            let r = card.rank().value();
            let s = u8::from(card.suit()) as usize;
            counts[r as usize] += 1;
            rank_mask |= 1 << r;
            suit_masks[s] |= 1 << r;
            suit_counts[s] += 1;
        }
        let flush_suit = suit_counts.iter().position(|&n| n >= 5);

        if let Some(suit) = flush_suit {
            if let Some(high) = Self::straight_high(suit_masks[suit]) {
                return match high {
                    14 => HandResult::new(HandRank::RoyalFlush, 14),
                    _ => HandResult::new(HandRank::StraightFlush, high),
                };
            }
        }
        if let Some(quads) = Self::highest_with_count(&counts, 4) {
            let kickers = Self::top_ranks(rank_mask, 1, 1 << quads);
            return HandResult::new(HandRank::FourOfAKind, quads).with_kickers(kickers);
        }
        if let Some(trips) = Self::highest_with_count(&counts, 3) {
            let pair = (2..=14u8)
                .rev()
                .filter(|&r| r != trips)
                .find(|&r| counts[r as usize] >= 2);
            if let Some(pair) = pair {
                return HandResult::new(HandRank::FullHouse, trips).with_secondary(pair);
            }
        }
        if let Some(suit) = flush_suit {
            let ranks = Self::top_ranks(suit_masks[suit], 5, 0);
            return HandResult::new(HandRank::Flush, ranks[0]).with_kickers(ranks[1..].to_vec());
        }
        if let Some(high) = Self::straight_high(rank_mask) {
            return HandResult::new(HandRank::Straight, high);
        }
        if let Some(trips) = Self::highest_with_count(&counts, 3) {
            let kickers = Self::top_ranks(rank_mask, 2, 1 << trips);
            return HandResult::new(HandRank::ThreeOfAKind, trips).with_kickers(kickers);
        }
        let pairs: Vec<u8> = (2..=14u8)
            .rev()
            .filter(|&r| counts[r as usize] == 2)
            .collect();
        match pairs.as_slice() {
            &[hi, lo, ..] => {
                let kickers = Self::top_ranks(rank_mask, 1, (1 << hi) | (1 << lo));
                HandResult::new(HandRank::TwoPair, hi)
                    .with_secondary(lo)
                    .with_kickers(kickers)
            }
            &[pair] => {
                let kickers = Self::top_ranks(rank_mask, 3, 1 << pair);
                HandResult::new(HandRank::OnePair, pair).with_kickers(kickers)
            }
            _ => {
                let ranks = Self::top_ranks(rank_mask, 5, 0);
                HandResult::new(HandRank::HighCard, ranks[0]).with_kickers(ranks[1..].to_vec())
            }
        }
    }

    /// highest rank whose 5-run is fully present; the wheel counts with a 5 high
    fn straight_high(mask: u16) -> Option<u8> {
        const WHEEL: u16 = (1 << 14) | (1 << 5) | (1 << 4) | (1 << 3) | (1 << 2);
        let mut bits = mask;
        bits &= bits << 1;
        bits &= bits << 1;
        bits &= bits << 1;
        bits &= bits << 1;
        if bits > 0 {
            Some((15 - bits.leading_zeros()) as u8)
        } else if mask & WHEEL == WHEEL {
            Some(5)
        } else {
            None
        }
    }

    fn highest_with_count(counts: &[u8; 15], n: u8) -> Option<u8> {
        (2..=14u8).rev().find(|&r| counts[r as usize] >= n)
    }

    /// up to `n` present ranks, highest first, skipping the excluded bits
    fn top_ranks(mask: u16, n: usize, exclude: u16) -> Vec<u8> {
        (2..=14u8)
            .rev()
            .filter(|&r| mask & !exclude & (1 << r) != 0)
            .take(n)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::rank::Rank;
    use crate::cards::suit::Suit;

    fn evaluate(deal: Vec<(Rank, Suit)>) -> HandResult {
        let cards: Vec<Card> = deal.into_iter().map(Card::from).collect();
        let (hole, community) = cards.split_at(2);
        HandEvaluator::evaluate(hole, community).unwrap()
    }

    #[test]
    fn high_card() {
        let result = evaluate(vec![
            (Rank::Ace, Suit::Spade),
            (Rank::King, Suit::Heart),
            (Rank::Queen, Suit::Diamond),
            (Rank::Jack, Suit::Club),
            (Rank::Nine, Suit::Spade),
        ]);
        assert_eq!(result.rank, HandRank::HighCard);
        assert_eq!(result.primary, 14);
        assert_eq!(result.kickers, vec![13, 12, 11, 9]);
    }

    #[test]
    fn one_pair_keeps_three_kickers() {
        let result = evaluate(vec![
            (Rank::Ace, Suit::Spade),
            (Rank::Ace, Suit::Heart),
            (Rank::King, Suit::Diamond),
            (Rank::Queen, Suit::Club),
            (Rank::Jack, Suit::Spade),
        ]);
        assert_eq!(result.rank, HandRank::OnePair);
        assert_eq!(result.primary, 14);
        assert_eq!(result.kickers, vec![13, 12, 11]);
    }

    #[test]
    fn two_pair() {
        let result = evaluate(vec![
            (Rank::Ace, Suit::Spade),
            (Rank::Ace, Suit::Heart),
            (Rank::King, Suit::Diamond),
            (Rank::King, Suit::Club),
            (Rank::Queen, Suit::Spade),
        ]);
        assert_eq!(result.rank, HandRank::TwoPair);
        assert_eq!((result.primary, result.secondary), (14, 13));
        assert_eq!(result.kickers, vec![12]);
    }

    #[test]
    fn three_pair_keeps_the_best_two() {
        let result = evaluate(vec![
            (Rank::Ace, Suit::Spade),
            (Rank::Ace, Suit::Heart),
            (Rank::King, Suit::Diamond),
            (Rank::King, Suit::Club),
            (Rank::Queen, Suit::Spade),
            (Rank::Queen, Suit::Heart),
            (Rank::Jack, Suit::Diamond),
        ]);
        assert_eq!(result.rank, HandRank::TwoPair);
        assert_eq!((result.primary, result.secondary), (14, 13));
        assert_eq!(result.kickers, vec![12]);
    }

    #[test]
    fn straight() {
        let result = evaluate(vec![
            (Rank::Ten, Suit::Spade),
            (Rank::Jack, Suit::Heart),
            (Rank::Queen, Suit::Diamond),
            (Rank::King, Suit::Club),
            (Rank::Ace, Suit::Spade),
        ]);
        assert_eq!(result.rank, HandRank::Straight);
        assert_eq!(result.primary, 14);
    }

    #[test]
    fn wheel_straight_is_five_high() {
        let result = evaluate(vec![
            (Rank::Ace, Suit::Spade),
            (Rank::Two, Suit::Heart),
            (Rank::Three, Suit::Diamond),
            (Rank::Four, Suit::Club),
            (Rank::Five, Suit::Spade),
        ]);
        assert_eq!(result.rank, HandRank::Straight);
        assert_eq!(result.primary, 5);
    }

    #[test]
    fn flush_beats_straight() {
        let result = evaluate(vec![
            (Rank::Four, Suit::Heart),
            (Rank::Six, Suit::Heart),
            (Rank::Seven, Suit::Heart),
            (Rank::Eight, Suit::Heart),
            (Rank::Nine, Suit::Heart),
            (Rank::Ten, Suit::Spade),
        ]);
        assert_eq!(result.rank, HandRank::Flush);
        assert_eq!(result.primary, 9);
        assert_eq!(result.kickers, vec![8, 7, 6, 4]);
    }

    #[test]
    fn full_house_over_flush() {
        let result = evaluate(vec![
            (Rank::Ace, Suit::Spade),
            (Rank::Ace, Suit::Heart),
            (Rank::Ace, Suit::Diamond),
            (Rank::King, Suit::Spade),
            (Rank::King, Suit::Heart),
            (Rank::Queen, Suit::Spade),
            (Rank::Jack, Suit::Spade),
        ]);
        assert_eq!(result.rank, HandRank::FullHouse);
        assert_eq!((result.primary, result.secondary), (14, 13));
    }

    #[test]
    fn two_sets_make_a_full_house() {
        let result = evaluate(vec![
            (Rank::Ace, Suit::Spade),
            (Rank::Ace, Suit::Heart),
            (Rank::Ace, Suit::Diamond),
            (Rank::King, Suit::Club),
            (Rank::King, Suit::Spade),
            (Rank::King, Suit::Heart),
            (Rank::Queen, Suit::Diamond),
        ]);
        assert_eq!(result.rank, HandRank::FullHouse);
        assert_eq!((result.primary, result.secondary), (14, 13));
    }

    #[test]
    fn four_of_a_kind_over_full_house() {
        let result = evaluate(vec![
            (Rank::Ace, Suit::Spade),
            (Rank::Ace, Suit::Heart),
            (Rank::Ace, Suit::Diamond),
            (Rank::Ace, Suit::Club),
            (Rank::King, Suit::Spade),
            (Rank::King, Suit::Heart),
            (Rank::Queen, Suit::Diamond),
        ]);
        assert_eq!(result.rank, HandRank::FourOfAKind);
        assert_eq!(result.primary, 14);
        assert_eq!(result.kickers, vec![13]);
    }

    #[test]
    fn straight_flush_over_three_of_a_kind() {
        let result = evaluate(vec![
            (Rank::Ten, Suit::Spade),
            (Rank::Jack, Suit::Spade),
            (Rank::Queen, Suit::Spade),
            (Rank::King, Suit::Spade),
            (Rank::Nine, Suit::Spade),
            (Rank::Nine, Suit::Heart),
            (Rank::Nine, Suit::Diamond),
        ]);
        assert_eq!(result.rank, HandRank::StraightFlush);
        assert_eq!(result.primary, 13);
    }

    #[test]
    fn royal_flush_is_its_own_category() {
        let result = evaluate(vec![
            (Rank::Ten, Suit::Spade),
            (Rank::Jack, Suit::Spade),
            (Rank::Queen, Suit::Spade),
            (Rank::King, Suit::Spade),
            (Rank::Ace, Suit::Spade),
        ]);
        assert_eq!(result.rank, HandRank::RoyalFlush);
        assert_eq!(result.primary, 14);
    }

    #[test]
    fn wheel_straight_flush_is_not_royal() {
        let result = evaluate(vec![
            (Rank::Ace, Suit::Spade),
            (Rank::Two, Suit::Spade),
            (Rank::Three, Suit::Spade),
            (Rank::Four, Suit::Spade),
            (Rank::Five, Suit::Spade),
        ]);
        assert_eq!(result.rank, HandRank::StraightFlush);
        assert_eq!(result.primary, 5);
    }

    #[test]
    fn six_card_straight_takes_the_top() {
        let result = evaluate(vec![
            (Rank::Ace, Suit::Spade),
            (Rank::Two, Suit::Spade),
            (Rank::Three, Suit::Heart),
            (Rank::Four, Suit::Diamond),
            (Rank::Five, Suit::Club),
            (Rank::Six, Suit::Spade),
        ]);
        assert_eq!(result.rank, HandRank::Straight);
        assert_eq!(result.primary, 6);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let deal = vec![
            (Rank::Nine, Suit::Club),
            (Rank::Nine, Suit::Diamond),
            (Rank::Ace, Suit::Spade),
            (Rank::Seven, Suit::Heart),
            (Rank::Two, Suit::Club),
            (Rank::Nine, Suit::Spade),
            (Rank::Four, Suit::Diamond),
        ];
        assert_eq!(evaluate(deal.clone()), evaluate(deal));
    }

    #[test]
    fn rejects_bad_card_counts() {
        let ace = Card::from((Rank::Ace, Suit::Spade));
        let king = Card::from((Rank::King, Suit::Spade));
        assert!(HandEvaluator::evaluate(&[ace], &[king; 5]).is_err());
        assert!(HandEvaluator::evaluate(&[ace, king], &[ace; 6]).is_err());
        assert!(HandEvaluator::evaluate(&[ace, king], &[ace; 2]).is_err());
    }
}
