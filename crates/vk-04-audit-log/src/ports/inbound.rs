//! # Inbound Ports (Driving Ports / API)

use crate::domain::AuditError;
use shared_types::{NewSecurityEvent, SecurityEvent};

/// Append-only security event log.
///
/// Writers are serialized; readers always observe a consistent prefix of the
/// log.
pub trait AuditLogApi: Send + Sync {
    /// Append an event and return its sequence number.
    fn append(&self, event: NewSecurityEvent) -> u64;

    /// Events after `since` (exclusive), oldest first, at most `limit`.
    fn query(&self, since: Option<u64>, limit: Option<usize>) -> Vec<SecurityEvent>;

    /// The `limit` most recent events, newest first.
    fn recent(&self, limit: usize) -> Vec<SecurityEvent>;

    /// Mark an event resolved. The resolution is itself appended as a new
    /// event; its sequence number is returned.
    ///
    /// # Errors
    /// * `AuditError::NotFound` - no such sequence
    /// * `AuditError::AlreadyResolved` - resolved earlier
    fn resolve(&self, sequence: u64, operator: &str) -> Result<u64, AuditError>;

    /// Consistent copy of the whole log.
    fn snapshot(&self) -> Vec<SecurityEvent>;
}
