use crate::Chips;
use crate::evaluation::result::HandResult;
use serde::Deserialize;
use serde::Serialize;

/// One settlement line: which seat got how much out of which pot.
/// Refunded overbets carry no ranking; won pots carry the winning hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Award {
    pub player_id: String,
    pub amount: Chips,
    pub pot: String,
    pub ranking: Option<HandResult>,
}

impl std::fmt::Display for Award {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} +{} ({})", self.player_id, self.amount, self.pot)
    }
}
