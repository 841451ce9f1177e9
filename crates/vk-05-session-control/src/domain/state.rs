//! # Session State
//!
//! `SessionPhase` is a sum type: each variant carries only the data that is
//! valid in that state. The voter identity lives in `BiometricPending`,
//! `Verified` and `BallotOpen` and is dropped on entry to `Sealing`.

use super::receipt::VoteReceipt;
use super::errors::AbortReason;
use serde::{Deserialize, Serialize};
use std::fmt;
use vk_01_identity_verification::VoterIdentity;
use vk_02_ballot_registry::VoteRecord;

/// Session state without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStateKind {
    /// No session.
    Idle,
    /// Waiting for the voter credential.
    CredentialPending,
    /// Credential accepted, waiting for a biometric sample.
    BiometricPending,
    /// Identity confirmed.
    Verified,
    /// Ballot shown, selection allowed.
    BallotOpen,
    /// Vote being sealed.
    Sealing,
    /// Vote sealed (terminal).
    Completed,
    /// Session aborted (terminal).
    Aborted,
}

impl SessionStateKind {
    /// True for `Completed` and `Aborted`.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStateKind::Completed | SessionStateKind::Aborted)
    }

    /// The transition table. Self-loops cover retries and reselection.
    pub fn can_transition_to(self, next: SessionStateKind) -> bool {
        use SessionStateKind::*;
        match (self, next) {
            (Idle, CredentialPending)
            | (CredentialPending, CredentialPending)
            | (CredentialPending, BiometricPending)
            | (BiometricPending, BiometricPending)
            | (BiometricPending, Verified)
            | (Verified, BallotOpen)
            | (BallotOpen, BallotOpen)
            | (BallotOpen, Sealing)
            | (Sealing, Completed) => true,
            (from, Aborted) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for SessionStateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Requests a caller can make of the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Start a session.
    Begin,
    /// Enter the credential.
    SubmitCredential,
    /// Provide a biometric sample.
    SubmitBiometric,
    /// Pick a candidate.
    SelectCandidate,
    /// Cast the selected vote.
    SubmitVote,
    /// Cancel the session.
    Abort,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::Begin => "begin",
            Action::SubmitCredential => "submit-credential",
            Action::SubmitBiometric => "submit-biometric",
            Action::SelectCandidate => "select-candidate",
            Action::SubmitVote => "submit-vote",
            Action::Abort => "abort",
        };
        f.write_str(label)
    }
}

/// Session state with per-state data.
#[derive(Clone, Debug)]
pub enum SessionPhase {
    /// No session started yet.
    Idle,
    /// Waiting for a credential; `attempts` malformed entries so far.
    CredentialPending {
        /// Failed attempts.
        attempts: u32,
    },
    /// Waiting for a biometric sample confirming `claimed`.
    BiometricPending {
        /// Identity claimed by the credential.
        claimed: VoterIdentity,
        /// Failed attempts.
        attempts: u32,
    },
    /// Identity confirmed.
    Verified {
        /// Confirmed identity.
        identity: VoterIdentity,
    },
    /// Ballot open.
    BallotOpen {
        /// Confirmed identity.
        identity: VoterIdentity,
        /// Current selection, replaced on reselection.
        selection: Option<VoteRecord>,
    },
    /// Sealing in progress.
    Sealing {
        /// The record being sealed.
        record: VoteRecord,
    },
    /// Vote sealed.
    Completed {
        /// Receipt handed to the voter.
        receipt: VoteReceipt,
    },
    /// Session aborted.
    Aborted {
        /// Why.
        reason: AbortReason,
    },
}

impl SessionPhase {
    /// State kind.
    pub fn kind(&self) -> SessionStateKind {
        match self {
            SessionPhase::Idle => SessionStateKind::Idle,
            SessionPhase::CredentialPending { .. } => SessionStateKind::CredentialPending,
            SessionPhase::BiometricPending { .. } => SessionStateKind::BiometricPending,
            SessionPhase::Verified { .. } => SessionStateKind::Verified,
            SessionPhase::BallotOpen { .. } => SessionStateKind::BallotOpen,
            SessionPhase::Sealing { .. } => SessionStateKind::Sealing,
            SessionPhase::Completed { .. } => SessionStateKind::Completed,
            SessionPhase::Aborted { .. } => SessionStateKind::Aborted,
        }
    }

    /// Actions the UI may offer in this phase.
    pub fn allowed_actions(&self) -> Vec<Action> {
        match self {
            SessionPhase::Idle | SessionPhase::Completed { .. } | SessionPhase::Aborted { .. } => {
                vec![Action::Begin]
            }
            SessionPhase::CredentialPending { .. } => vec![Action::SubmitCredential, Action::Abort],
            SessionPhase::BiometricPending { .. } => vec![Action::SubmitBiometric, Action::Abort],
            SessionPhase::BallotOpen { selection, .. } => {
                if selection.is_some() {
                    vec![Action::SelectCandidate, Action::SubmitVote, Action::Abort]
                } else {
                    vec![Action::SelectCandidate, Action::Abort]
                }
            }
            SessionPhase::Verified { .. } | SessionPhase::Sealing { .. } => vec![Action::Abort],
        }
    }
}
