//! # Shared Crypto - Sealing Primitives
//!
//! Concrete primitives backing the vote sealing contract. The kiosk core only
//! depends on the contract (`vk-03-vote-sealing::ports`); this crate is the
//! standard implementation wired in by the runtime.
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `symmetric` | XChaCha20-Poly1305 | Vote / export encryption |
//! | `signatures` | Ed25519 | Station signature over sealed votes |
//! | `mac` | HMAC-SHA256 | Integrity code of a sealed vote |
//! | `hashing` | BLAKE3 | Credential digests, key derivation |
//! | `rng` | ChaCha-based `StdRng` | Injected, seedable randomness |
//!
//! ## Security Properties
//!
//! - **XChaCha20**: 192-bit nonce, safe with random nonces
//! - **Ed25519**: Deterministic signatures, no RNG dependency
//! - **Randomness**: Never ambient; every consumer receives a `KioskRng`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod mac;
pub mod rng;
pub mod signatures;
pub mod symmetric;

// Re-exports
pub use errors::CryptoError;
pub use hashing::{blake3_derive_key, blake3_keyed_hash, fingerprint};
pub use mac::{integrity_code, verify_integrity_code, IntegrityCode};
pub use rng::KioskRng;
pub use signatures::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
pub use symmetric::{decrypt, encrypt, Nonce, SecretKey};
