//! Ballot error types.

use shared_types::CandidateId;
use thiserror::Error;

/// Errors raised by the ballot registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BallotError {
    /// The selected candidate is not on the ballot.
    #[error("Unknown candidate: {0}")]
    UnknownCandidate(CandidateId),

    /// A ballot must list at least one candidate.
    #[error("Ballot has no candidates")]
    EmptyBallot,

    /// Two candidates share an id.
    #[error("Duplicate candidate id: {0}")]
    DuplicateCandidate(CandidateId),

    /// A candidate entry is incomplete.
    #[error("Invalid candidate entry: {0}")]
    InvalidCandidate(String),

    /// The ballot definition could not be parsed.
    #[error("Malformed ballot definition: {0}")]
    Malformed(String),
}
