//! Voter receipt.

use serde::{Deserialize, Serialize};
use shared_types::{StationId, Timestamp};
use vk_03_vote_sealing::{SealedVote, TransactionId};

/// What the voter takes home. Built from the sealed vote and station
/// metadata only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    /// Transaction id for later audit lookup.
    pub transaction_id: TransactionId,
    /// Seal time.
    pub sealed_at: Timestamp,
    /// Station that sealed the vote.
    pub station_id: StationId,
    /// Short fingerprint of the integrity code.
    pub integrity_digest: String,
    /// Receipt came out of the printer.
    pub printed: bool,
    /// Printer gave up; an officer must hand-write the receipt.
    pub manual_fallback: bool,
}

impl VoteReceipt {
    /// Receipt for a freshly sealed vote, not yet printed.
    pub fn for_sealed(sealed: &SealedVote, station_id: &StationId) -> Self {
        Self {
            transaction_id: sealed.transaction_id().clone(),
            sealed_at: sealed.sealed_at(),
            station_id: station_id.clone(),
            integrity_digest: sealed.integrity_digest(),
            printed: false,
            manual_fallback: false,
        }
    }
}
