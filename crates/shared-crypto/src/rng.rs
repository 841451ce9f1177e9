//! # Injected Randomness
//!
//! `KioskRng` wraps a ChaCha-based `StdRng`. Production seeds it from the OS;
//! tests seed it with a fixed value so transaction ids and nonces are
//! reproducible.

use rand::rngs::StdRng;
use rand::{CryptoRng, RngCore, SeedableRng};

/// Seedable cryptographic randomness source.
#[derive(Debug, Clone)]
pub struct KioskRng(StdRng);

impl KioskRng {
    /// Seed from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    /// Deterministic source for tests and replays.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RngCore for KioskRng {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.0.try_fill_bytes(dest)
    }
}

impl CryptoRng for KioskRng {}
