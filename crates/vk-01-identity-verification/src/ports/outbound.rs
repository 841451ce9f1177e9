//! # Outbound Ports (Driven Ports / SPI)
//!
//! Real matching algorithms are out of scope for the kiosk core; the matcher is
//! a hardware/firmware collaborator behind this port.

use crate::domain::{BiometricSample, CredentialHash};
use async_trait::async_trait;

/// Result of a single match attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Sample confirms the claim.
    Match,
    /// Sample does not confirm the claim.
    NoMatch,
    /// Scanner produced no usable capture.
    NoCapture,
}

/// Biometric matcher (scanner firmware or matching module).
#[async_trait]
pub trait BiometricMatcher: Send + Sync {
    /// Compare a sample against the claimed credential.
    async fn matches(&self, credential_hash: &CredentialHash, sample: &BiometricSample)
        -> MatchOutcome;
}
