//! # Inbound Ports (Driving Ports / API)

use crate::domain::{
    AdminError, CancelReason, DualAuthorization, EncryptedBundle, ExportError, KioskStats,
    OperatorCredential, SessionError, SessionSnapshot, VoteReceipt,
};
use async_trait::async_trait;
use shared_types::{CandidateId, EventSource, SecurityEvent, SecurityStatus};
use std::collections::BTreeMap;
use vk_01_identity_verification::BiometricSample;

/// Voter-facing session API.
///
/// Every call returns the new snapshot or an error; a failed call never
/// leaves the session in an intermediate state.
#[async_trait]
pub trait SessionControlApi: Send + Sync {
    /// Start a session.
    ///
    /// # Errors
    /// * `SessionBusy` - a non-terminal session is active
    fn begin(&self) -> Result<SessionSnapshot, SessionError>;

    /// Submit the voter credential.
    ///
    /// # Errors
    /// * `InputError` - malformed, retry allowed
    /// * `Aborted(CredentialAttemptsExhausted)` - retry bound reached
    /// * `StateError` - not in `CredentialPending`
    fn submit_credential(&self, raw: &str) -> Result<SessionSnapshot, SessionError>;

    /// Submit a biometric sample. Cancelled by `abort` or expiry.
    ///
    /// # Errors
    /// * `IdentityError` - no match or capture timeout, retry allowed
    /// * `Aborted(BiometricAttemptsExhausted)` - retry bound reached
    /// * `StateError` - not in `BiometricPending`
    async fn submit_biometric(&self, sample: BiometricSample)
        -> Result<SessionSnapshot, SessionError>;

    /// Select (or reselect) a candidate.
    ///
    /// # Errors
    /// * `InputError` - unknown candidate
    /// * `StateError` - not in `BallotOpen`
    fn select_candidate(&self, candidate: &CandidateId) -> Result<SessionSnapshot, SessionError>;

    /// Seal and record the selected vote, then print the receipt.
    ///
    /// # Errors
    /// * `CryptoError` - sealing failed or timed out; the vote was not cast
    /// * `StateError` - not in `BallotOpen` or nothing selected
    async fn submit_vote(&self) -> Result<VoteReceipt, SessionError>;

    /// Abort the active session. Always recorded as a Warning.
    ///
    /// # Errors
    /// * `StateError` - no active session
    fn abort(&self, reason: CancelReason) -> Result<SessionSnapshot, SessionError>;

    /// Current UI snapshot.
    fn snapshot(&self) -> SessionSnapshot;

    /// Abort the active session if it is past its expiry. Returns true if it
    /// did.
    fn expire_stale(&self) -> bool;
}

/// Operator-facing read API and export.
pub trait AdminReportingApi: Send + Sync {
    /// Dashboard statistics.
    fn stats(&self) -> KioskStats;

    /// Most recent audit events, newest first.
    fn recent_events(&self, limit: usize) -> Vec<SecurityEvent>;

    /// Kiosk security status.
    fn security_status(&self) -> SecurityStatus;

    /// Status per component.
    fn component_status(&self) -> BTreeMap<EventSource, SecurityStatus>;

    /// Acknowledge an audit event.
    ///
    /// # Errors
    /// * `Unauthorized` - operator credential rejected
    /// * `Audit` - unknown or already resolved event
    fn resolve_event(
        &self,
        sequence: u64,
        operator: &OperatorCredential,
    ) -> Result<u64, AdminError>;

    /// Produce the encrypted, signed end-of-day bundle.
    ///
    /// # Errors
    /// * `SameOperator` / `Unauthorized` - dual authorization failed
    fn export_encrypted_bundle(
        &self,
        auth: &DualAuthorization,
    ) -> Result<EncryptedBundle, ExportError>;
}
