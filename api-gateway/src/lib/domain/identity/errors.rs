use thiserror::Error;

/// Why the auth service turned a request down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Validation,
    AlreadyExists,
    InvalidCredentials,
    AccountDisabled,
    NotFound,
    TokenExpired,
    TokenMalformed,
    InvalidToken,
    Forbidden,
    Internal,
    Unspecified,
}

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Business failure reported inside the response envelope
    #[error("{message}")]
    Rejected { kind: FailureKind, message: String },

    #[error("Auth service did not answer in time")]
    Timeout,

    #[error("Auth service unavailable: {0}")]
    Unavailable(String),

    #[error("Auth service call failed: {0}")]
    Transport(String),

    #[error("Malformed auth service response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    pub fn rejected(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Rejected {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            GatewayError::Rejected { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
