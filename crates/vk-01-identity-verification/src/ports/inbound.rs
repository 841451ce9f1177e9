//! # Inbound Ports (Driving Ports / API)

use crate::domain::{BiometricSample, IdentityError, VoterIdentity};
use async_trait::async_trait;

/// Identity verification API.
///
/// Implementations must be deterministic given identical inputs.
#[async_trait]
pub trait IdentityVerificationApi: Send + Sync {
    /// Validate the structure of a credential and produce the claimed identity.
    ///
    /// # Errors
    /// * `IdentityError::InvalidFormat` - not a fixed-length numeric credential
    fn verify_credential(&self, raw: &str) -> Result<VoterIdentity, IdentityError>;

    /// Confirm a claimed identity with a biometric sample.
    ///
    /// # Errors
    /// * `IdentityError::NoMatch` - sample does not confirm the claim
    /// * `IdentityError::CaptureTimeout` - no usable sample within the timeout
    async fn verify_biometric(
        &self,
        claimed: &VoterIdentity,
        sample: &BiometricSample,
    ) -> Result<VoterIdentity, IdentityError>;
}
