use crate::Chips;
use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Raise,
    AllIn,
}

/// A betting decision as submitted by a host.
///
/// `amount` is only meaningful for raises, where it names the target total
/// bet for the round (not the increment). Other kinds carry 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAction {
    pub kind: ActionKind,
    #[serde(default)]
    pub amount: Chips,
}

impl PlayerAction {
    pub fn fold() -> Self {
        Self { kind: ActionKind::Fold, amount: 0 }
    }
    pub fn check() -> Self {
        Self { kind: ActionKind::Check, amount: 0 }
    }
    pub fn call() -> Self {
        Self { kind: ActionKind::Call, amount: 0 }
    }
    pub fn raise(amount: Chips) -> Self {
        Self { kind: ActionKind::Raise, amount }
    }
    pub fn all_in() -> Self {
        Self { kind: ActionKind::AllIn, amount: 0 }
    }
}

impl std::fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.kind {
            ActionKind::Fold => write!(f, "FOLD"),
            ActionKind::Check => write!(f, "CHECK"),
            ActionKind::Call => write!(f, "CALL"),
            ActionKind::Raise => write!(f, "RAISE {}", self.amount),
            ActionKind::AllIn => write!(f, "ALL-IN"),
        }
    }
}
