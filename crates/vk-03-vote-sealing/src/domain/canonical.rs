//! Canonical encoding of vote records.
//!
//! bincode with the default fixed-int little-endian configuration: fields are
//! written in declaration order, so the same record always yields the same
//! bytes.

use super::errors::SealError;
use vk_02_ballot_registry::VoteRecord;

/// Encode a record canonically.
pub fn canonical_encode(record: &VoteRecord) -> Result<Vec<u8>, SealError> {
    bincode::serialize(record).map_err(|e| SealError::Encoding(e.to_string()))
}

/// Decode a canonically encoded record.
pub fn canonical_decode(bytes: &[u8]) -> Result<VoteRecord, SealError> {
    bincode::deserialize(bytes).map_err(|e| SealError::Encoding(e.to_string()))
}
