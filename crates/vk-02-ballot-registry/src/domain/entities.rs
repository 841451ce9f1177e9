//! Ballot entities.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use shared_types::{CandidateId, Timestamp};

/// A candidate on the ballot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Ballot id (e.g. `C001`).
    pub id: CandidateId,
    /// Display name.
    pub name: String,
    /// Party affiliation.
    pub party: String,
    /// Ballot symbol.
    pub symbol: String,
}

impl Candidate {
    /// Create a candidate.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        party: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Self {
        Self {
            id: CandidateId::new(id),
            name: name.into(),
            party: party.into(),
            symbol: symbol.into(),
        }
    }
}

/// Per-session random salt. Makes two identical selections produce distinct
/// vote records without linking either to a voter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionSalt([u8; 16]);

impl SessionSalt {
    /// Draw a salt from the given randomness source.
    pub fn random<R: RngCore>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 16];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

/// The content of a cast vote.
///
/// There is intentionally no voter field: anonymity is a property of the
/// type. The timestamp is truncated to the minute so it cannot be joined
/// against session logs to the millisecond.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    /// Random per-session salt.
    pub session_salt: SessionSalt,
    /// Selected candidate.
    pub candidate_id: CandidateId,
    /// Selection time, truncated to `TIMESTAMP_GRANULARITY_MS`.
    pub timestamp: Timestamp,
}

impl VoteRecord {
    /// Granularity of `timestamp`.
    pub const TIMESTAMP_GRANULARITY_MS: u64 = 60_000;

    /// Build a record, truncating the timestamp.
    pub fn new(session_salt: SessionSalt, candidate_id: CandidateId, at: Timestamp) -> Self {
        Self {
            session_salt,
            candidate_id,
            timestamp: at - at % Self::TIMESTAMP_GRANULARITY_MS,
        }
    }
}
