//! # Domain Layer - Identity Verification
//!
//! - `credential`: Credential parsing and digesting
//! - `entities`: `VoterIdentity`, `BiometricSample`, `IdentityConfig`
//! - `errors`: `IdentityError`

pub mod credential;
pub mod entities;
pub mod errors;

pub use credential::*;
pub use entities::*;
pub use errors::*;
