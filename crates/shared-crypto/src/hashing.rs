//! # BLAKE3 Hashing
//!
//! Keyed digests for credentials and operator PINs, and key derivation from
//! the station's sealing secret.

/// BLAKE3 hash output (256-bit).
pub type Hash = [u8; 32];

/// Keyed hash (MAC).
pub fn blake3_keyed_hash(key: &[u8; 32], data: &[u8]) -> Hash {
    *blake3::keyed_hash(key, data).as_bytes()
}

/// Derive a key from a context string and input key material.
pub fn blake3_derive_key(context: &str, key_material: &[u8]) -> [u8; 32] {
    blake3::derive_key(context, key_material)
}

/// Short uppercase hex fingerprint (first `bytes` bytes) for receipts and logs.
pub fn fingerprint(data: &[u8], bytes: usize) -> String {
    let end = bytes.min(data.len());
    hex::encode_upper(&data[..end])
}
