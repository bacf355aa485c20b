use crate::error::EngineError;
use crate::error::ErrorCode;
use serde::Deserialize;
use serde::Serialize;

/// The result envelope every command returns.
///
/// Failures always carry an error code from the fixed taxonomy; successes
/// may carry an operation-specific json payload. Hosts are expected to show
/// `message` verbatim or translate it, never to parse it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub success: bool,
    pub message: String,
    pub error_code: Option<ErrorCode>,
    pub data: Option<serde_json::Value>,
}

impl Outcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error_code: None,
            data: None,
        }
    }

    pub fn ok_with(message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            error_code: None,
            data: Some(data),
        }
    }

    pub fn fail(error: &EngineError) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            error_code: Some(error.code()),
            data: None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.error_code {
            Some(code) => write!(f, "error[{}]: {}", code, self.message),
            None => write!(f, "ok: {}", self.message),
        }
    }
}
