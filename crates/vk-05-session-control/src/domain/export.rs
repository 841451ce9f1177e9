//! # Encrypted Export
//!
//! End-of-day export of the ballot box and audit log. Releasing a bundle
//! needs two distinct operators; the bundle is encrypted with the export key
//! and signed with the station key.
//!
//! ```text
//! ExportPayload ──bincode──→ bytes ──XChaCha20-Poly1305──→ ciphertext ──Ed25519──→ EncryptedBundle
//! ```

use super::errors::ExportError;
use serde::{Deserialize, Serialize};
use shared_crypto::{
    blake3_keyed_hash, decrypt, encrypt, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature,
    KioskRng, Nonce, SecretKey,
};
use shared_types::{SecurityEvent, StationId, Timestamp};
use std::collections::HashMap;
use std::fmt;
use subtle::ConstantTimeEq;
use vk_03_vote_sealing::{SealedVote, SealingConfig};
use zeroize::{Zeroize, ZeroizeOnDrop};

const EXPORT_ENCRYPTION_CONTEXT: &str = "votesafe 2024 export bundle encryption";
const OPERATOR_PIN_CONTEXT: &str = "votesafe 2024 operator pin digest";

/// One operator's credential as typed at the kiosk.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct OperatorCredential {
    operator_id: String,
    pin: String,
}

impl OperatorCredential {
    pub fn new(operator_id: impl Into<String>, pin: impl Into<String>) -> Self {
        Self {
            operator_id: operator_id.into(),
            pin: pin.into(),
        }
    }

    pub fn operator_id(&self) -> &str {
        &self.operator_id
    }
}

impl fmt::Debug for OperatorCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorCredential")
            .field("operator_id", &self.operator_id)
            .field("pin", &"<redacted>")
            .finish()
    }
}

/// Two independent operator credentials.
#[derive(Clone, Debug)]
pub struct DualAuthorization {
    pub first: OperatorCredential,
    pub second: OperatorCredential,
}

impl DualAuthorization {
    pub fn new(first: OperatorCredential, second: OperatorCredential) -> Self {
        Self { first, second }
    }
}

/// Registered operators, stored as keyed PIN digests.
pub struct OperatorRegistry {
    pin_key: [u8; 32],
    digests: HashMap<String, [u8; 32]>,
}

impl OperatorRegistry {
    /// Empty registry; PIN digests are keyed by `pin_key`.
    pub fn new(pin_key: [u8; 32]) -> Self {
        Self {
            pin_key,
            digests: HashMap::new(),
        }
    }

    /// Registry keyed from the station sealing secret.
    pub fn for_station(config: &SealingConfig) -> Self {
        Self::new(config.derive_key(OPERATOR_PIN_CONTEXT))
    }

    /// Register (or replace) an operator.
    pub fn register(&mut self, operator_id: impl Into<String>, pin: &str) {
        let digest = blake3_keyed_hash(&self.pin_key, pin.as_bytes());
        self.digests.insert(operator_id.into(), digest);
    }

    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    /// Constant-time PIN check. Unknown operators are compared against a
    /// zero digest so both paths do the same work.
    pub fn verify(&self, credential: &OperatorCredential) -> bool {
        let presented = blake3_keyed_hash(&self.pin_key, credential.pin.as_bytes());
        let (stored, known) = match self.digests.get(&credential.operator_id) {
            Some(d) => (*d, true),
            None => ([0u8; 32], false),
        };
        bool::from(presented.ct_eq(&stored)) && known
    }

    /// Check both credentials of a dual authorization.
    pub fn authorize(&self, auth: &DualAuthorization) -> Result<(), ExportError> {
        if auth.first.operator_id == auth.second.operator_id {
            return Err(ExportError::SameOperator);
        }
        for credential in [&auth.first, &auth.second] {
            if !self.verify(credential) {
                return Err(ExportError::Unauthorized(credential.operator_id.clone()));
            }
        }
        Ok(())
    }
}

impl Drop for OperatorRegistry {
    fn drop(&mut self) {
        self.pin_key.zeroize();
    }
}

/// Keys used to produce export bundles.
pub struct ExportKeys {
    encryption_key: SecretKey,
    signing_key: Ed25519KeyPair,
}

impl ExportKeys {
    /// Derive from the station sealing secret.
    pub fn for_station(config: &SealingConfig) -> Self {
        Self {
            encryption_key: SecretKey::from_bytes(config.derive_key(EXPORT_ENCRYPTION_CONTEXT)),
            signing_key: config.station_signing_key(),
        }
    }

    pub fn encryption_key(&self) -> &SecretKey {
        &self.encryption_key
    }

    /// Station public key that verifies bundles.
    pub fn public_key(&self) -> Ed25519PublicKey {
        self.signing_key.public_key()
    }
}

/// Plaintext content of a bundle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportPayload {
    pub station_id: StationId,
    pub exported_at: Timestamp,
    pub sealed_votes: Vec<SealedVote>,
    pub audit_events: Vec<SecurityEvent>,
}

/// Opaque signed blob handed to the operators.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedBundle {
    pub station_id: StationId,
    pub exported_at: Timestamp,
    pub nonce: [u8; 24],
    pub ciphertext: Vec<u8>,
    pub signature: Vec<u8>,
}

impl EncryptedBundle {
    fn signed_message(
        station_id: &StationId,
        exported_at: Timestamp,
        nonce: &[u8; 24],
        ciphertext: &[u8],
    ) -> Vec<u8> {
        let station = station_id.as_str().as_bytes();
        let mut message = Vec::with_capacity(8 + station.len() + 8 + 24 + ciphertext.len());
        message.extend_from_slice(&(station.len() as u64).to_le_bytes());
        message.extend_from_slice(station);
        message.extend_from_slice(&exported_at.to_le_bytes());
        message.extend_from_slice(nonce);
        message.extend_from_slice(ciphertext);
        message
    }
}

/// Encrypt and sign a payload.
pub fn seal_bundle(
    payload: &ExportPayload,
    keys: &ExportKeys,
    rng: &mut KioskRng,
) -> Result<EncryptedBundle, ExportError> {
    let mut plaintext =
        bincode::serialize(payload).map_err(|e| ExportError::Encoding(e.to_string()))?;
    let nonce = Nonce::random(rng);
    let ciphertext = encrypt(&keys.encryption_key, &nonce, &plaintext);
    plaintext.zeroize();
    let ciphertext = ciphertext?;

    let signature = keys.signing_key.sign(&EncryptedBundle::signed_message(
        &payload.station_id,
        payload.exported_at,
        nonce.as_bytes(),
        &ciphertext,
    ));

    Ok(EncryptedBundle {
        station_id: payload.station_id.clone(),
        exported_at: payload.exported_at,
        nonce: *nonce.as_bytes(),
        ciphertext,
        signature: signature.as_bytes().to_vec(),
    })
}

/// Check the station signature on a bundle.
pub fn verify_bundle(bundle: &EncryptedBundle, station_key: &Ed25519PublicKey) -> bool {
    let Ok(bytes) = <[u8; 64]>::try_from(bundle.signature.as_slice()) else {
        return false;
    };
    let message = EncryptedBundle::signed_message(
        &bundle.station_id,
        bundle.exported_at,
        &bundle.nonce,
        &bundle.ciphertext,
    );
    station_key
        .verify(&message, &Ed25519Signature::from_bytes(bytes))
        .is_ok()
}

/// Verify and decrypt a bundle (counting centre side).
pub fn open_bundle(
    bundle: &EncryptedBundle,
    station_key: &Ed25519PublicKey,
    encryption_key: &SecretKey,
) -> Result<ExportPayload, ExportError> {
    if !verify_bundle(bundle, station_key) {
        return Err(ExportError::InvalidSignature);
    }
    let plaintext = decrypt(encryption_key, &Nonce::from_bytes(bundle.nonce), &bundle.ciphertext)?;
    bincode::deserialize(&plaintext).map_err(|e| ExportError::Encoding(e.to_string()))
}
