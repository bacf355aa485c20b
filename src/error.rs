use crate::Chips;
use serde::Deserialize;
use serde::Serialize;

/// Stable error discriminants surfaced to hosts inside a
/// [`crate::service::Outcome`]. One code per error kind; messages carry the
/// detail, codes carry the taxonomy.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidInput,
    NotYourTurn,
    IllegalAction,
    InsufficientChips,
    PhaseError,
    InvariantViolation,
    StateCorruption,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::InvalidInput => write!(f, "invalid_input"),
            Self::NotYourTurn => write!(f, "not_your_turn"),
            Self::IllegalAction => write!(f, "illegal_action"),
            Self::InsufficientChips => write!(f, "insufficient_chips"),
            Self::PhaseError => write!(f, "phase_error"),
            Self::InvariantViolation => write!(f, "invariant_violation"),
            Self::StateCorruption => write!(f, "state_corruption"),
        }
    }
}

/// Everything that can go wrong inside the engine.
///
/// The first five variants are recoverable: the command is rejected and the
/// table is left exactly as it was. The last two are fatal for the command
/// that produced them; the atomic wrapper restores the pre-command snapshot
/// before the error reaches the caller, so no error ever leaves partially
/// applied state behind.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not {player}'s turn")]
    NotYourTurn { player: String },

    #[error("illegal action: {0}")]
    IllegalAction(String),

    #[error("insufficient chips: need {needed}, holding {held}")]
    InsufficientChips { needed: Chips, held: Chips },

    #[error("phase error: {0}")]
    PhaseError(String),

    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("state corruption: {0}")]
    StateCorruption(String),
}

impl EngineError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput(_) => ErrorCode::InvalidInput,
            Self::NotYourTurn { .. } => ErrorCode::NotYourTurn,
            Self::IllegalAction(_) => ErrorCode::IllegalAction,
            Self::InsufficientChips { .. } => ErrorCode::InsufficientChips,
            Self::PhaseError(_) => ErrorCode::PhaseError,
            Self::InvariantViolation(_) => ErrorCode::InvariantViolation,
            Self::StateCorruption(_) => ErrorCode::StateCorruption,
        }
    }

    /// fatal failures are the ones that can never be the caller's fault
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvariantViolation(_) | Self::StateCorruption(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_maps_to_its_code() {
        let cases = [
            (EngineError::InvalidInput("x".into()), ErrorCode::InvalidInput),
            (
                EngineError::NotYourTurn { player: "p0".into() },
                ErrorCode::NotYourTurn,
            ),
            (EngineError::IllegalAction("x".into()), ErrorCode::IllegalAction),
            (
                EngineError::InsufficientChips { needed: 5, held: 1 },
                ErrorCode::InsufficientChips,
            ),
            (EngineError::PhaseError("x".into()), ErrorCode::PhaseError),
            (
                EngineError::InvariantViolation("x".into()),
                ErrorCode::InvariantViolation,
            ),
            (
                EngineError::StateCorruption("x".into()),
                ErrorCode::StateCorruption,
            ),
        ];
        for (error, code) in cases {
            assert_eq!(error.code(), code);
        }
    }

    #[test]
    fn only_engine_faults_are_fatal() {
        assert!(EngineError::InvariantViolation("x".into()).is_fatal());
        assert!(EngineError::StateCorruption("x".into()).is_fatal());
        assert!(!EngineError::IllegalAction("x".into()).is_fatal());
        assert!(!EngineError::NotYourTurn { player: "p0".into() }.is_fatal());
        assert!(!EngineError::InsufficientChips { needed: 2, held: 1 }.is_fatal());
    }

    #[test]
    fn messages_carry_the_detail() {
        let error = EngineError::InsufficientChips { needed: 200, held: 50 };
        assert_eq!(error.to_string(), "insufficient chips: need 200, holding 50");
        assert_eq!(ErrorCode::NotYourTurn.to_string(), "not_your_turn");
    }
}
