//! Sealing error types.

use shared_crypto::CryptoError;
use thiserror::Error;

/// Errors raised while sealing or re-verifying a vote.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SealError {
    /// A cryptographic primitive failed.
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// The record could not be encoded or decoded.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The sealed vote failed re-verification.
    #[error("Sealed vote failed verification")]
    VerificationFailed,

    /// A transaction id was recorded twice.
    #[error("Duplicate transaction id: {0}")]
    DuplicateTransaction(String),
}
