//! # Credential Parsing
//!
//! Structural validation only: the kiosk is offline and never consults a
//! voter registry. Digits may be entered in space-separated groups
//! (`"1234 5678 9012"`).

use super::errors::IdentityError;
use shared_crypto::blake3_keyed_hash;
use zeroize::Zeroize;

/// Digest of a credential under the station identity key.
pub type CredentialHash = [u8; 32];

/// A structurally valid credential. Zeroized on drop.
pub struct Credential {
    digits: String,
}

impl Credential {
    /// Parse raw keypad input.
    ///
    /// # Errors
    ///
    /// `IdentityError::InvalidFormat` unless, after removing ASCII spaces, the
    /// input is exactly `expected_len` ASCII digits.
    pub fn parse(raw: &str, expected_len: usize) -> Result<Self, IdentityError> {
        let mut digits: String = raw.chars().filter(|c| *c != ' ').collect();

        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_digit()) {
            let reason = if bad.is_ascii() {
                "credential must contain digits only".to_string()
            } else {
                "credential contains non-ASCII characters".to_string()
            };
            digits.zeroize();
            return Err(IdentityError::InvalidFormat(reason));
        }

        if digits.len() != expected_len {
            let reason = format!("expected {} digits, got {}", expected_len, digits.len());
            digits.zeroize();
            return Err(IdentityError::InvalidFormat(reason));
        }

        Ok(Self { digits })
    }

    /// Keyed digest of the digits. The only form in which a credential is kept.
    pub fn digest(&self, identity_key: &[u8; 32]) -> CredentialHash {
        blake3_keyed_hash(identity_key, self.digits.as_bytes())
    }

    /// Number of digits.
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    /// Always false for a parsed credential.
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }
}

impl Drop for Credential {
    fn drop(&mut self) {
        self.digits.zeroize();
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credential(<{} digits>)", self.digits.len())
    }
}
