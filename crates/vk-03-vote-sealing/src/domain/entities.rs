//! Sealing entities.

use serde::{Deserialize, Serialize};
use shared_types::Timestamp;
use std::fmt;
use zeroize::Zeroize;

/// Vote-side transaction id: `VE` + zero-padded counter + `-` + 8 hex digits
/// of a random nonce. Printed on the receipt for later audit lookup.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Prefix of every transaction id.
    pub const PREFIX: &'static str = "VE";

    pub(crate) fn compose(counter: u64, nonce: [u8; 4]) -> Self {
        Self(format!(
            "{}{:06}-{}",
            Self::PREFIX,
            counter,
            shared_crypto::fingerprint(&nonce, 4)
        ))
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the id has the `VE<digits>-<8 hex>` shape.
    pub fn is_well_formed(&self) -> bool {
        let Some(rest) = self.0.strip_prefix(Self::PREFIX) else {
            return false;
        };
        let Some((counter, nonce)) = rest.split_once('-') else {
            return false;
        };
        !counter.is_empty()
            && counter.bytes().all(|b| b.is_ascii_digit())
            && nonce.len() == 8
            && nonce.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An encrypted, signed, integrity-checked vote.
///
/// Only a `VoteSealer` can construct one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedVote {
    transaction_id: TransactionId,
    ciphertext: Vec<u8>,
    nonce: [u8; 24],
    signature: Vec<u8>,
    integrity_code: [u8; 32],
    sealed_at: Timestamp,
}

impl SealedVote {
    pub(crate) fn assemble(
        transaction_id: TransactionId,
        ciphertext: Vec<u8>,
        nonce: [u8; 24],
        signature: Vec<u8>,
        integrity_code: [u8; 32],
        sealed_at: Timestamp,
    ) -> Self {
        Self {
            transaction_id,
            ciphertext,
            nonce,
            signature,
            integrity_code,
            sealed_at,
        }
    }

    /// Transaction id.
    pub fn transaction_id(&self) -> &TransactionId {
        &self.transaction_id
    }

    /// Encrypted canonical record.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Encryption nonce.
    pub fn nonce(&self) -> &[u8; 24] {
        &self.nonce
    }

    /// Station signature.
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Integrity code over ciphertext, nonce, signature and seal time.
    pub fn integrity_code(&self) -> &[u8; 32] {
        &self.integrity_code
    }

    /// Seal time.
    pub fn sealed_at(&self) -> Timestamp {
        self.sealed_at
    }

    /// Short fingerprint of the integrity code for printed receipts.
    pub fn integrity_digest(&self) -> String {
        shared_crypto::fingerprint(&self.integrity_code, 8)
    }

    #[cfg(test)]
    pub(crate) fn ciphertext_mut(&mut self) -> &mut Vec<u8> {
        &mut self.ciphertext
    }

    #[cfg(test)]
    pub(crate) fn set_sealed_at(&mut self, at: Timestamp) {
        self.sealed_at = at;
    }
}

/// Key derivation context of the station signing key.
pub const STATION_SIGNING_CONTEXT: &str = "votesafe 2024 station signing key";

/// Sealing configuration.
#[derive(Clone)]
pub struct SealingConfig {
    /// Station sealing secret. Encryption, integrity and signing keys are
    /// derived from it with distinct contexts.
    pub sealing_secret: [u8; 32],
}

impl SealingConfig {
    /// Derive a 32-byte key for `context` from the sealing secret.
    pub fn derive_key(&self, context: &str) -> [u8; 32] {
        shared_crypto::blake3_derive_key(context, &self.sealing_secret)
    }

    /// The station Ed25519 key pair (signs sealed votes and exports).
    pub fn station_signing_key(&self) -> shared_crypto::Ed25519KeyPair {
        let mut seed = self.derive_key(STATION_SIGNING_CONTEXT);
        let key = shared_crypto::Ed25519KeyPair::from_seed(seed);
        seed.zeroize();
        key
    }
}

impl Default for SealingConfig {
    fn default() -> Self {
        Self {
            sealing_secret: [0u8; 32],
        }
    }
}

impl fmt::Debug for SealingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SealingConfig")
            .field("sealing_secret", &"<redacted>")
            .finish()
    }
}
