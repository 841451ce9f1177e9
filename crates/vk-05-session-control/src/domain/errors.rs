//! # Session Control Errors

use super::state::{Action, SessionStateKind};
use serde::{Deserialize, Serialize};
use shared_crypto::CryptoError;
use shared_types::Severity;
use std::fmt;
use thiserror::Error;
use vk_01_identity_verification::IdentityError;

/// Why a session ended in `Aborted`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbortReason {
    /// The voter pressed cancel.
    VoterCancelled,
    /// A polling officer cancelled the session.
    OperatorCancelled,
    /// The session outlived its TTL.
    Expired,
    /// Too many malformed credentials.
    CredentialAttemptsExhausted,
    /// Too many failed biometric checks.
    BiometricAttemptsExhausted,
    /// Sealing failed or timed out.
    SealingFailed,
    /// Kiosk shutting down.
    Shutdown,
}

impl AbortReason {
    /// Severity of the audit event recorded for this abort.
    pub fn severity(&self) -> Severity {
        match self {
            AbortReason::CredentialAttemptsExhausted
            | AbortReason::BiometricAttemptsExhausted
            | AbortReason::SealingFailed => Severity::Alert,
            AbortReason::VoterCancelled
            | AbortReason::OperatorCancelled
            | AbortReason::Expired
            | AbortReason::Shutdown => Severity::Warning,
        }
    }
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AbortReason::VoterCancelled => "cancelled by voter",
            AbortReason::OperatorCancelled => "cancelled by operator",
            AbortReason::Expired => "session expired",
            AbortReason::CredentialAttemptsExhausted => "credential attempts exhausted",
            AbortReason::BiometricAttemptsExhausted => "biometric attempts exhausted",
            AbortReason::SealingFailed => "vote sealing failed",
            AbortReason::Shutdown => "kiosk shutdown",
        };
        f.write_str(label)
    }
}

/// Why a caller cancelled the active session through `abort`.
///
/// Expiry, shutdown and exhausted retries are raised by the controller
/// itself and cannot be requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CancelReason {
    /// The voter pressed cancel.
    VoterCancelled,
    /// A polling officer cancelled the session.
    OperatorCancelled,
}

impl From<CancelReason> for AbortReason {
    fn from(reason: CancelReason) -> Self {
        match reason {
            CancelReason::VoterCancelled => AbortReason::VoterCancelled,
            CancelReason::OperatorCancelled => AbortReason::OperatorCancelled,
        }
    }
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        AbortReason::from(*self).fmt(f)
    }
}

/// Errors returned by the session controller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Another session is active.
    #[error("A voter session is already active")]
    SessionBusy,

    /// Recoverable input problem; the session stays where it was.
    #[error("Invalid input: {0}")]
    InputError(String),

    /// Identity check failed below the retry bound.
    #[error("Identity verification failed: {0}")]
    IdentityError(IdentityError),

    /// The action is not legal in the current state. Nothing changed.
    #[error("{action} is not allowed in state {state}")]
    StateError {
        /// Requested action.
        action: Action,
        /// State at the time of the request.
        state: SessionStateKind,
    },

    /// A capture or seal for this session is still running.
    #[error("An operation is already in progress for this session")]
    OperationInFlight,

    /// Sealing failed; the vote was not cast.
    #[error("Vote sealing failed: {0}")]
    CryptoError(String),

    /// The session was aborted.
    #[error("Session aborted: {0}")]
    Aborted(AbortReason),

    /// The session was replaced while an operation was in flight.
    #[error("Session ended while the operation was in flight")]
    SessionEnded,
}

/// Errors returned by operator actions on the admin API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdminError {
    /// Operator credential rejected.
    #[error("Operator {0} failed authentication")]
    Unauthorized(String),

    /// Audit log refused the resolution.
    #[error(transparent)]
    Audit(#[from] vk_04_audit_log::AuditError),
}

/// Errors raised while exporting or opening an encrypted bundle.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExportError {
    /// Both credentials name the same operator.
    #[error("Dual authorization requires two distinct operators")]
    SameOperator,

    /// An operator credential was rejected.
    #[error("Operator {0} failed authentication")]
    Unauthorized(String),

    /// Bundle payload could not be encoded or decoded.
    #[error("Bundle encoding failed: {0}")]
    Encoding(String),

    /// Encryption or decryption failed.
    #[error("Bundle crypto failure: {0}")]
    Crypto(#[from] CryptoError),

    /// The bundle signature does not verify.
    #[error("Bundle signature is invalid")]
    InvalidSignature,
}
