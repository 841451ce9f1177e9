//! # Domain Layer - Vote Sealing
//!
//! - `entities`: `SealedVote`, `TransactionId`, `SealingConfig`
//! - `canonical`: Deterministic record encoding
//! - `ballot_box`: Append-only store of sealed votes
//! - `errors`: `SealError`

pub mod ballot_box;
pub mod canonical;
pub mod entities;
pub mod errors;

pub use ballot_box::*;
pub use canonical::*;
pub use entities::*;
pub use errors::*;
