//! Deterministic quality-threshold matcher.
//!
//! Accepts a sample when the template is long enough and its mean feature
//! quality reaches the threshold. Identical inputs always give identical
//! outcomes.

use crate::domain::{BiometricSample, CredentialHash};
use crate::ports::outbound::{BiometricMatcher, MatchOutcome};
use async_trait::async_trait;

/// Matcher driven purely by template length and mean quality.
#[derive(Clone, Debug)]
pub struct QualityThresholdMatcher {
    /// Minimum number of template bytes.
    pub min_template_len: usize,
    /// Minimum mean byte value (0-255).
    pub min_mean_quality: u8,
}

impl Default for QualityThresholdMatcher {
    fn default() -> Self {
        Self {
            min_template_len: 16,
            min_mean_quality: 128,
        }
    }
}

impl QualityThresholdMatcher {
    /// Synchronous evaluation, shared by the async port.
    pub fn evaluate(&self, sample: &BiometricSample) -> MatchOutcome {
        if sample.template.is_empty() {
            return MatchOutcome::NoCapture;
        }
        if sample.template.len() < self.min_template_len {
            return MatchOutcome::NoMatch;
        }
        let total: u64 = sample.template.iter().map(|b| u64::from(*b)).sum();
        let mean = total / sample.template.len() as u64;
        if mean >= u64::from(self.min_mean_quality) {
            MatchOutcome::Match
        } else {
            MatchOutcome::NoMatch
        }
    }
}

#[async_trait]
impl BiometricMatcher for QualityThresholdMatcher {
    async fn matches(
        &self,
        _credential_hash: &CredentialHash,
        sample: &BiometricSample,
    ) -> MatchOutcome {
        self.evaluate(sample)
    }
}
