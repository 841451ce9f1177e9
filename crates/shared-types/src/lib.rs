//! # Shared Types Crate
//!
//! Value types shared by every VoteSafe kiosk subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Identifiers, timestamps and security events are
//!   defined once here and re-exported by the subsystems.
//! - **No Identity Leakage**: Nothing in this crate can carry voter-identifying data.
//!   Voter identity lives exclusively in `vk-01-identity-verification`.
//! - **Sequence Over Clock**: `SecurityEvent::sequence` is the ordering authority;
//!   `Timestamp` is informational only.

pub mod entities;
pub mod security;
pub mod time;

pub use entities::*;
pub use security::*;
pub use time::*;
