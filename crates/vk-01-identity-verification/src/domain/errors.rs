//! # Identity Errors

use thiserror::Error;

/// Errors raised while verifying a voter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// The credential is not a fixed-length numeric string.
    #[error("Invalid credential format: {0}")]
    InvalidFormat(String),

    /// The biometric sample did not confirm the claimed identity.
    #[error("Biometric sample did not match")]
    NoMatch,

    /// No usable sample arrived within the capture timeout.
    #[error("Biometric capture timed out")]
    CaptureTimeout,
}

impl IdentityError {
    /// Short machine-readable label for audit messages.
    pub fn label(&self) -> &'static str {
        match self {
            IdentityError::InvalidFormat(_) => "invalid-format",
            IdentityError::NoMatch => "no-match",
            IdentityError::CaptureTimeout => "capture-timeout",
        }
    }
}
