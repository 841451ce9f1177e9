//! # Inbound Ports (Driving Ports / API)

use crate::domain::{SealError, SealedVote};
use async_trait::async_trait;
use vk_02_ballot_registry::VoteRecord;

/// The sealing contract.
///
/// An implementation is the only place allowed to produce a `SealedVote`, and
/// `seal` must be all-or-nothing: it either returns a complete, verifiable
/// `SealedVote` or an error, never a partial artifact.
#[async_trait]
pub trait VoteSealer: Send + Sync {
    /// Seal a vote record.
    ///
    /// # Errors
    /// * `SealError::Crypto` - a primitive failed; nothing was produced
    async fn seal(&self, record: &VoteRecord) -> Result<SealedVote, SealError>;

    /// Re-verify a sealed vote without decrypting it.
    fn verify(&self, sealed: &SealedVote) -> bool;
}
