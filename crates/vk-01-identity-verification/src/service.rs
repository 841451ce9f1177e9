//! # Identity Verification Service
//!
//! Implements `IdentityVerificationApi` on top of the credential rules and an
//! outbound `BiometricMatcher`. Each match is bounded by
//! `IdentityConfig::capture_timeout`.

use crate::domain::{BiometricSample, Credential, IdentityConfig, IdentityError, VoterIdentity};
use crate::ports::inbound::IdentityVerificationApi;
use crate::ports::outbound::{BiometricMatcher, MatchOutcome};
use async_trait::async_trait;
use shared_types::TimeSource;
use std::sync::Arc;
use tracing::debug;

/// Identity verifier.
pub struct IdentityVerifier<M: BiometricMatcher> {
    config: IdentityConfig,
    matcher: M,
    clock: Arc<dyn TimeSource>,
}

impl<M: BiometricMatcher> IdentityVerifier<M> {
    /// Create a verifier.
    pub fn new(config: IdentityConfig, matcher: M, clock: Arc<dyn TimeSource>) -> Self {
        Self {
            config,
            matcher,
            clock,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &IdentityConfig {
        &self.config
    }
}

#[async_trait]
impl<M: BiometricMatcher> IdentityVerificationApi for IdentityVerifier<M> {
    fn verify_credential(&self, raw: &str) -> Result<VoterIdentity, IdentityError> {
        let credential = Credential::parse(raw, self.config.credential_length)?;
        let hash = credential.digest(&self.config.identity_key);
        debug!("[vk-01] credential structurally valid");
        Ok(VoterIdentity::claimed(hash, self.config.constituency.clone()))
    }

    async fn verify_biometric(
        &self,
        claimed: &VoterIdentity,
        sample: &BiometricSample,
    ) -> Result<VoterIdentity, IdentityError> {
        let outcome = tokio::time::timeout(
            self.config.capture_timeout,
            self.matcher.matches(claimed.credential_hash(), sample),
        )
        .await
        .map_err(|_| IdentityError::CaptureTimeout)?;

        debug!(method = %sample.method, ?outcome, "[vk-01] biometric match evaluated");

        match outcome {
            MatchOutcome::Match => Ok(claimed
                .clone()
                .confirm(sample.method, self.clock.now())),
            MatchOutcome::NoMatch => Err(IdentityError::NoMatch),
            MatchOutcome::NoCapture => Err(IdentityError::CaptureTimeout),
        }
    }
}
