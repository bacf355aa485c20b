use super::sidepot::SidePot;
use crate::Chips;
use serde::Deserialize;
use serde::Serialize;

/// What one seat put into the hand, and whether it can still win.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub player_id: String,
    pub amount: Chips,
    pub folded: bool,
}

/// The result of carving contributions into pots.
///
/// Conservation holds by construction: Σ pot amounts + Σ refunds equals
/// Σ contributions, checked again by the invariant layer before awarding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Carve {
    pub pots: Vec<SidePot>,
    pub refunds: Vec<(String, Chips)>,
}

impl Carve {
    pub fn total(&self) -> Chips {
        self.pots.iter().map(|p| p.amount).sum::<Chips>()
            + self.refunds.iter().map(|(_, c)| c).sum::<Chips>()
    }
}

/// Carve per-seat hand contributions into a main pot and side pots.
///
/// Walks the distinct contribution levels ascending; each level closes one
/// tier whose size is (level - previous) × contributors-at-level. A tier
/// with a single contributor is not a pot at all: nobody matched that
/// money, so it goes straight back to its owner. Eligibility for a tier is
/// its unfolded contributors; if every contributor of a tier has folded,
/// the dead money widens to all unfolded contributors of the hand so it is
/// never orphaned.
pub fn carve(contributions: &[Contribution]) -> Carve {
    let staked: Vec<&Contribution> = contributions.iter().filter(|c| c.amount > 0).collect();
    let mut levels: Vec<Chips> = staked.iter().map(|c| c.amount).collect();
    levels.sort_unstable();
    levels.dedup();

    let survivors: Vec<String> = staked
        .iter()
        .filter(|c| !c.folded)
        .map(|c| c.player_id.clone())
        .collect();

    let mut pots = Vec::new();
    let mut refunds = Vec::new();
    let mut previous = 0;
    for level in levels {
        let tier: Vec<&&Contribution> = staked.iter().filter(|c| c.amount >= level).collect();
        let delta = level - previous;
        previous = level;
        match tier.as_slice() {
            [single] => {
                // uncalled money; no pot forms over a lone contributor
                refunds.push((single.player_id.clone(), delta));
            }
            _ => {
                let mut eligible: Vec<String> = tier
                    .iter()
                    .filter(|c| !c.folded)
                    .map(|c| c.player_id.clone())
                    .collect();
                if eligible.is_empty() {
                    eligible = survivors.clone();
                }
                let label = match pots.len() {
                    0 => "main".to_string(),
                    n => format!("side {}", n),
                };
                pots.push(SidePot {
                    label,
                    amount: delta * tier.len() as Chips,
                    eligible,
                });
            }
        }
    }
    Carve { pots, refunds }
}
