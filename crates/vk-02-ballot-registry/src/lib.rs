//! # Ballot Registry Subsystem (VK-02)
//!
//! Holds the candidate list for the sitting and turns a selection into a
//! [`VoteRecord`].
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | Registry is immutable after load | `BallotRegistry` exposes no mutators; candidates live in an `Arc<[Candidate]>` |
//! | Candidate ids are unique | `BallotRegistry::new` |
//! | A vote record carries no voter identity | `VoteRecord` has no identity field; salts are random |

pub mod domain;

pub use domain::*;
