use crate::Chips;
use serde::Deserialize;
use serde::Serialize;

/// One pot carved out of matched contributions.
///
/// `eligible` is the set of player ids that can win this pot: contributors
/// who matched the tier and have not folded. Labels follow creation order
/// ("main", "side 1", "side 2", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidePot {
    pub label: String,
    pub amount: Chips,
    pub eligible: Vec<String>,
}

impl SidePot {
    pub fn is_eligible(&self, player_id: &str) -> bool {
        self.eligible.iter().any(|id| id == player_id)
    }
}

impl std::fmt::Display for SidePot {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}: {} [{}]", self.label, self.amount, self.eligible.join(", "))
    }
}
