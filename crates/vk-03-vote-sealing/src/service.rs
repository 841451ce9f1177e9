//! # Standard Vote Sealer
//!
//! XChaCha20-Poly1305 + Ed25519 + HMAC-SHA256 implementation of the
//! `VoteSealer` contract. Keys are derived from `SealingConfig::sealing_secret`;
//! randomness comes from the injected `KioskRng`.

use crate::domain::{
    canonical_decode, canonical_encode, SealError, SealedVote, SealingConfig, TransactionId,
};
use crate::ports::inbound::VoteSealer;
use async_trait::async_trait;
use parking_lot::Mutex;
use rand::RngCore;
use shared_crypto::{
    decrypt, encrypt, integrity_code, verify_integrity_code, Ed25519KeyPair, Ed25519PublicKey,
    Ed25519Signature, KioskRng, Nonce, SecretKey,
};
use shared_types::{TimeSource, Timestamp};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};
use vk_02_ballot_registry::VoteRecord;
use zeroize::Zeroize;

const ENCRYPTION_CONTEXT: &str = "votesafe 2024 vote sealing encryption";
const INTEGRITY_CONTEXT: &str = "votesafe 2024 vote sealing integrity";

/// Standard sealer backed by `shared-crypto`.
pub struct StandardVoteSealer {
    encryption_key: SecretKey,
    integrity_key: [u8; 32],
    signing_key: Ed25519KeyPair,
    rng: Mutex<KioskRng>,
    counter: AtomicU64,
    clock: Arc<dyn TimeSource>,
}

impl StandardVoteSealer {
    /// Create a sealer.
    pub fn new(config: &SealingConfig, rng: KioskRng, clock: Arc<dyn TimeSource>) -> Self {
        Self {
            encryption_key: SecretKey::from_bytes(config.derive_key(ENCRYPTION_CONTEXT)),
            integrity_key: config.derive_key(INTEGRITY_CONTEXT),
            signing_key: config.station_signing_key(),
            rng: Mutex::new(rng),
            counter: AtomicU64::new(0),
            clock,
        }
    }

    /// Station public key that verifies seal signatures.
    pub fn public_key(&self) -> Ed25519PublicKey {
        self.signing_key.public_key()
    }

    /// Number of seal operations completed, including seals the caller
    /// later discarded without recording them.
    pub fn sealed_count(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }

    /// Decrypt a sealed vote back to its record (tally / audit side).
    ///
    /// # Errors
    ///
    /// `VerificationFailed` if the seal does not verify, `Crypto` or
    /// `Encoding` if the payload cannot be recovered.
    pub fn unseal(&self, sealed: &SealedVote) -> Result<VoteRecord, SealError> {
        if !self.verify(sealed) {
            return Err(SealError::VerificationFailed);
        }
        let nonce = Nonce::from_bytes(*sealed.nonce());
        let plaintext = decrypt(&self.encryption_key, &nonce, sealed.ciphertext())?;
        canonical_decode(&plaintext)
    }

    fn signed_message(ciphertext: &[u8], nonce: &[u8; 24], sealed_at: Timestamp) -> Vec<u8> {
        let mut message = Vec::with_capacity(ciphertext.len() + 24 + 8);
        message.extend_from_slice(ciphertext);
        message.extend_from_slice(nonce);
        message.extend_from_slice(&sealed_at.to_le_bytes());
        message
    }

    fn integrity_of(
        &self,
        ciphertext: &[u8],
        nonce: &[u8; 24],
        signature: &[u8],
        sealed_at: Timestamp,
    ) -> [u8; 32] {
        integrity_code(
            &self.integrity_key,
            &[ciphertext, nonce, signature, &sealed_at.to_le_bytes()],
        )
    }
}

#[async_trait]
impl VoteSealer for StandardVoteSealer {
    async fn seal(&self, record: &VoteRecord) -> Result<SealedVote, SealError> {
        let sealed_at = self.clock.now();

        // 1. Canonical serialization
        let mut plaintext = canonical_encode(record)?;

        // 2. Encrypt
        let (nonce, tx_nonce) = {
            let mut rng = self.rng.lock();
            let nonce = Nonce::random(&mut *rng);
            let mut tx_nonce = [0u8; 4];
            rng.fill_bytes(&mut tx_nonce);
            (nonce, tx_nonce)
        };
        let encrypted = encrypt(&self.encryption_key, &nonce, &plaintext);
        plaintext.zeroize();
        let ciphertext = encrypted.inspect_err(|e| warn!("[vk-03] encryption failed: {}", e))?;

        // 3. Sign
        let signature = self
            .signing_key
            .sign(&Self::signed_message(&ciphertext, nonce.as_bytes(), sealed_at));

        // 4. Integrity code
        let integrity =
            self.integrity_of(&ciphertext, nonce.as_bytes(), signature.as_bytes(), sealed_at);

        // 5. Transaction id (counter advances only for complete seals)
        let counter = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let transaction_id = TransactionId::compose(counter, tx_nonce);

        debug!(transaction_id = %transaction_id, "[vk-03] vote sealed");

        Ok(SealedVote::assemble(
            transaction_id,
            ciphertext,
            *nonce.as_bytes(),
            signature.as_bytes().to_vec(),
            integrity,
            sealed_at,
        ))
    }

    fn verify(&self, sealed: &SealedVote) -> bool {
        if !sealed.transaction_id().is_well_formed() {
            return false;
        }

        let Ok(signature_bytes) = <[u8; 64]>::try_from(sealed.signature()) else {
            return false;
        };
        let signature = Ed25519Signature::from_bytes(signature_bytes);
        let message =
            Self::signed_message(sealed.ciphertext(), sealed.nonce(), sealed.sealed_at());
        if self.public_key().verify(&message, &signature).is_err() {
            return false;
        }

        verify_integrity_code(
            &self.integrity_key,
            &[
                sealed.ciphertext(),
                sealed.nonce(),
                sealed.signature(),
                &sealed.sealed_at().to_le_bytes(),
            ],
            sealed.integrity_code(),
        )
        .is_ok()
    }
}

impl Drop for StandardVoteSealer {
    fn drop(&mut self) {
        self.integrity_key.zeroize();
    }
}
