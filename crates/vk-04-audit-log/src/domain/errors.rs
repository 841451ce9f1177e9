//! Audit log error types.

use thiserror::Error;

/// Errors raised by audit log operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuditError {
    /// No event carries this sequence number.
    #[error("Event #{0} not found")]
    NotFound(u64),

    /// The event was already resolved.
    #[error("Event #{0} already resolved")]
    AlreadyResolved(u64),
}
