//! # Integrity Codes
//!
//! HMAC-SHA256 over the sealed artifact. Verification is constant-time.

use crate::CryptoError;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// 256-bit integrity code.
pub type IntegrityCode = [u8; 32];

/// Compute the integrity code of `parts` (concatenated) under `key`.
pub fn integrity_code(key: &[u8; 32], parts: &[&[u8]]) -> IntegrityCode {
    let mut mac = mac_for(key);
    for part in parts {
        mac.update(part);
    }
    let mut code = [0u8; 32];
    code.copy_from_slice(&mac.finalize().into_bytes());
    code
}

/// Check an integrity code in constant time.
///
/// # Errors
///
/// Returns `CryptoError::IntegrityMismatch` if the code does not match.
pub fn verify_integrity_code(
    key: &[u8; 32],
    parts: &[&[u8]],
    expected: &IntegrityCode,
) -> Result<(), CryptoError> {
    let mut mac = mac_for(key);
    for part in parts {
        mac.update(part);
    }
    mac.verify_slice(expected)
        .map_err(|_| CryptoError::IntegrityMismatch)
}

fn mac_for(key: &[u8; 32]) -> HmacSha256 {
    // HMAC accepts keys of any length; 32 bytes can never be rejected.
    match <HmacSha256 as Mac>::new_from_slice(key) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC-SHA256 accepts any key length"),
    }
}
