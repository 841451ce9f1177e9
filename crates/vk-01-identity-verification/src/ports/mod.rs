//! # Ports Layer
//!
//! - **Inbound (Driving)**: `IdentityVerificationApi`, used by the session controller
//! - **Outbound (Driven)**: `BiometricMatcher`, the scanner/matcher hardware

pub mod inbound;
pub mod outbound;
