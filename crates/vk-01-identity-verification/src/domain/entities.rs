//! Core domain entities for identity verification.

use super::credential::CredentialHash;
use shared_crypto::fingerprint;
use shared_types::Timestamp;
use std::fmt;
use std::time::Duration;

/// Biometric modality offered by the kiosk scanner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BiometricMethod {
    /// Fingerprint reader.
    Fingerprint,
    /// Iris camera.
    Iris,
}

impl fmt::Display for BiometricMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BiometricMethod::Fingerprint => f.write_str("fingerprint"),
            BiometricMethod::Iris => f.write_str("iris"),
        }
    }
}

/// A captured biometric sample.
///
/// `template` holds per-feature quality bytes from the scanner; an empty
/// template means the scanner returned nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BiometricSample {
    /// Modality used for the capture.
    pub method: BiometricMethod,
    /// Raw template bytes.
    pub template: Vec<u8>,
}

impl BiometricSample {
    /// Create a sample.
    pub fn new(method: BiometricMethod, template: Vec<u8>) -> Self {
        Self { method, template }
    }
}

/// Pseudonymous voter identifier derived from the credential digest.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VoterId(String);

impl VoterId {
    /// Derive the pseudonym (`V` + 8 hex digits) from a credential digest.
    pub fn from_credential_hash(hash: &CredentialHash) -> Self {
        Self(format!("V{}", fingerprint(hash, 4)))
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A voter identity owned by exactly one session.
///
/// Deliberately not `Serialize`: it can never be written into a vote, a
/// receipt or an export bundle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoterIdentity {
    voter_id: VoterId,
    constituency: String,
    credential_hash: CredentialHash,
    biometric_method: Option<BiometricMethod>,
    verified_at: Option<Timestamp>,
}

impl VoterIdentity {
    /// Identity claimed by a structurally valid credential, not yet confirmed.
    pub fn claimed(credential_hash: CredentialHash, constituency: impl Into<String>) -> Self {
        Self {
            voter_id: VoterId::from_credential_hash(&credential_hash),
            constituency: constituency.into(),
            credential_hash,
            biometric_method: None,
            verified_at: None,
        }
    }

    /// Consume a claimed identity and mark it biometrically confirmed.
    pub fn confirm(self, method: BiometricMethod, at: Timestamp) -> Self {
        Self {
            biometric_method: Some(method),
            verified_at: Some(at),
            ..self
        }
    }

    /// Pseudonymous voter id.
    pub fn voter_id(&self) -> &VoterId {
        &self.voter_id
    }

    /// Constituency the kiosk serves.
    pub fn constituency(&self) -> &str {
        &self.constituency
    }

    /// Keyed digest of the credential.
    pub fn credential_hash(&self) -> &CredentialHash {
        &self.credential_hash
    }

    /// Method that confirmed the identity, if any.
    pub fn biometric_method(&self) -> Option<BiometricMethod> {
        self.biometric_method
    }

    /// Confirmation time, if confirmed.
    pub fn verified_at(&self) -> Option<Timestamp> {
        self.verified_at
    }

    /// True once a biometric sample confirmed the claim.
    pub fn is_verified(&self) -> bool {
        self.verified_at.is_some()
    }
}

/// Identity verification configuration.
#[derive(Clone, Debug)]
pub struct IdentityConfig {
    /// Required number of credential digits.
    pub credential_length: usize,
    /// Constituency served by this kiosk.
    pub constituency: String,
    /// Key for credential digests (derived from the station secret).
    pub identity_key: [u8; 32],
    /// Upper bound on a single biometric capture/match.
    pub capture_timeout: Duration,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            credential_length: 12,
            constituency: "Demo Constituency 001".to_string(),
            identity_key: [0u8; 32],
            capture_timeout: Duration::from_secs(10),
        }
    }
}
