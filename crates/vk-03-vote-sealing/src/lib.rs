//! # Vote Sealing Subsystem (VK-03)
//!
//! Turns a [`VoteRecord`](vk_02_ballot_registry::VoteRecord) into a
//! [`SealedVote`]: encrypted, signed, integrity-checked and labelled with a
//! transaction id that has no link to the voter.
//!
//! ## Sealing Pipeline
//!
//! ```text
//! VoteRecord ──canonical──→ bytes ──encrypt──→ ciphertext ──sign──→ signature
//!                                                                     │
//!                         SealedVote ←──assign tx id──── integrity code
//! ```
//!
//! ## Contract
//!
//! | Rule | Enforcement |
//! |------|-------------|
//! | Only the sealer produces `SealedVote` | Fields are private; no public constructor |
//! | All-or-nothing | Every step writes to locals; the value is built after the last fallible step |
//! | Tx id independent of voter | Random nonce + monotonic counter only |
//! | Re-verifiable without decrypting | `VoteSealer::verify` checks signature and integrity code |
//!
//! Concrete primitives come from `shared-crypto`; the kiosk core depends only
//! on the [`VoteSealer`] port.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::inbound::VoteSealer;
pub use service::StandardVoteSealer;
