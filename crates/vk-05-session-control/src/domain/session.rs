//! # Voter Session
//!
//! The session record held in the controller's single slot, and the
//! snapshot the UI renders after every transition.

use super::errors::{AbortReason, SessionError};
use super::receipt::VoteReceipt;
use super::state::{Action, SessionPhase, SessionStateKind};
use serde::{Deserialize, Serialize};
use shared_types::{CandidateId, SessionId, Timestamp};
use tokio::sync::watch;
use vk_02_ballot_registry::SessionSalt;

/// One voter session.
#[derive(Debug)]
pub struct VoterSession {
    id: SessionId,
    phase: SessionPhase,
    session_salt: SessionSalt,
    created_at: Timestamp,
    expires_at: Timestamp,
    consumed: bool,
    in_flight: bool,
    cancel: watch::Sender<bool>,
}

impl VoterSession {
    /// A new session in `Idle`.
    pub fn new(id: SessionId, session_salt: SessionSalt, now: Timestamp, ttl_ms: u64) -> Self {
        let (cancel, _) = watch::channel(false);
        Self {
            id,
            phase: SessionPhase::Idle,
            session_salt,
            created_at: now,
            expires_at: now.saturating_add(ttl_ms),
            consumed: false,
            in_flight: false,
            cancel,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn state(&self) -> SessionStateKind {
        self.phase.kind()
    }

    pub fn session_salt(&self) -> SessionSalt {
        self.session_salt
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    /// True once a sealed vote was produced. Never reverts.
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// True while a capture or seal is awaiting.
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Past `expires_at` and not yet terminal.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expires_at && !self.state().is_terminal()
    }

    /// Move to `next` if the transition table allows it.
    pub(crate) fn advance(&mut self, action: Action, next: SessionPhase) -> Result<(), SessionError> {
        let from = self.state();
        let to = next.kind();
        if !from.can_transition_to(to) || (to == SessionStateKind::Completed && self.consumed) {
            return Err(SessionError::StateError {
                action,
                state: from,
            });
        }
        if to == SessionStateKind::Completed {
            self.consumed = true;
        }
        self.phase = next;
        Ok(())
    }

    pub(crate) fn phase_mut(&mut self) -> &mut SessionPhase {
        &mut self.phase
    }

    pub(crate) fn set_in_flight(&mut self, in_flight: bool) {
        self.in_flight = in_flight;
    }

    /// Cancellation flag observed by in-flight operations.
    pub(crate) fn cancellation(&self) -> watch::Receiver<bool> {
        self.cancel.subscribe()
    }

    /// Abort and signal cancellation. Returns false if already terminal.
    pub(crate) fn abort(&mut self, reason: AbortReason) -> bool {
        if self.state().is_terminal() {
            return false;
        }
        self.phase = SessionPhase::Aborted { reason };
        self.cancel.send_replace(true);
        true
    }
}

/// What the UI renders after every transition.
///
/// Carries no voter id or credential data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: Option<SessionId>,
    pub state: SessionStateKind,
    pub allowed_actions: Vec<Action>,
    /// Retries left in the current step, where one applies.
    pub attempts_remaining: Option<u32>,
    /// Constituency once a credential was accepted.
    pub constituency: Option<String>,
    pub selected_candidate: Option<CandidateId>,
    pub expires_at: Option<Timestamp>,
    pub consumed: bool,
    pub operation_in_flight: bool,
    pub receipt: Option<VoteReceipt>,
    pub abort_reason: Option<AbortReason>,
}

impl SessionSnapshot {
    /// Snapshot with no session.
    pub fn idle() -> Self {
        Self {
            session_id: None,
            state: SessionStateKind::Idle,
            allowed_actions: SessionPhase::Idle.allowed_actions(),
            attempts_remaining: None,
            constituency: None,
            selected_candidate: None,
            expires_at: None,
            consumed: false,
            operation_in_flight: false,
            receipt: None,
            abort_reason: None,
        }
    }

    /// Snapshot of `session` given the credential and biometric retry limits.
    pub fn of(session: &VoterSession, credential_limit: u32, biometric_limit: u32) -> Self {
        let phase = session.phase();
        let mut snapshot = Self {
            session_id: Some(session.id()),
            state: phase.kind(),
            allowed_actions: phase.allowed_actions(),
            expires_at: Some(session.expires_at()),
            consumed: session.is_consumed(),
            operation_in_flight: session.in_flight(),
            ..Self::idle()
        };

        match phase {
            SessionPhase::CredentialPending { attempts } => {
                snapshot.attempts_remaining = Some(credential_limit.saturating_sub(*attempts));
            }
            SessionPhase::BiometricPending { claimed, attempts } => {
                snapshot.attempts_remaining = Some(biometric_limit.saturating_sub(*attempts));
                snapshot.constituency = Some(claimed.constituency().to_string());
            }
            SessionPhase::Verified { identity } => {
                snapshot.constituency = Some(identity.constituency().to_string());
            }
            SessionPhase::BallotOpen {
                identity,
                selection,
            } => {
                snapshot.constituency = Some(identity.constituency().to_string());
                snapshot.selected_candidate = selection.as_ref().map(|r| r.candidate_id.clone());
            }
            SessionPhase::Sealing { record } => {
                snapshot.selected_candidate = Some(record.candidate_id.clone());
            }
            SessionPhase::Completed { receipt } => {
                snapshot.receipt = Some(receipt.clone());
            }
            SessionPhase::Aborted { reason } => {
                snapshot.abort_reason = Some(*reason);
            }
            SessionPhase::Idle => {}
        }
        snapshot
    }
}
