//! Outward result envelope.

use serde::{Deserialize, Serialize};

/// Status code plus optional message, used when reporting an operation to an
/// outer layer. It carries no payload; callers return records alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl ResultEnvelope {
    pub const OK: u16 = 200;
    pub const MULTI_STATUS: u16 = 207;
    pub const BAD_REQUEST: u16 = 400;
    pub const NOT_FOUND: u16 = 404;
    pub const CONFLICT: u16 = 409;
    pub const INTERNAL_ERROR: u16 = 500;

    pub fn success() -> Self {
        Self {
            code: Self::OK,
            msg: None,
        }
    }

    pub fn success_with(msg: impl Into<String>) -> Self {
        Self {
            code: Self::OK,
            msg: Some(msg.into()),
        }
    }

    pub fn error(code: u16, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: Some(msg.into()),
        }
    }

    /// Generic failure with the default 500 code.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::error(Self::INTERNAL_ERROR, msg)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

impl Default for ResultEnvelope {
    fn default() -> Self {
        Self::success()
    }
}
