//! # Identity Verification Subsystem (VK-01)
//!
//! Validates a voter credential and a biometric claim, producing a
//! [`VoterIdentity`] or failing with an [`IdentityError`].
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Credential format rules, identity entity, errors
//! - **Ports Layer** (`ports/`): `IdentityVerificationApi` (inbound),
//!   `BiometricMatcher` (outbound)
//! - **Adapters** (`adapters/`): Deterministic `QualityThresholdMatcher`
//! - **Service Layer** (`service.rs`): `IdentityVerifier`
//!
//! ## Offline Guarantees
//!
//! | Check | Where | Notes |
//! |-------|-------|-------|
//! | Credential structure | `domain/credential.rs` | Fixed-length numeric, no registry lookup |
//! | Biometric match | `ports/outbound.rs` | Bounded by the capture timeout |
//! | Credential storage | `domain/entities.rs` | Only a keyed digest is kept |
//!
//! The raw credential digits never leave `Credential`, which is zeroized on drop.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::QualityThresholdMatcher;
pub use domain::*;
pub use ports::inbound::IdentityVerificationApi;
pub use ports::outbound::{BiometricMatcher, MatchOutcome};
pub use service::IdentityVerifier;
