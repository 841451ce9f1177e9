//! # Domain Layer - Session Control
//!
//! - `state`: Session phases, transition table, allowed actions
//! - `session`: `VoterSession` and the UI snapshot
//! - `config`: `SessionConfig`
//! - `receipt`: `VoteReceipt`
//! - `stats`: Session counters and `KioskStats`
//! - `export`: Operator registry, dual authorization, encrypted bundles
//! - `errors`: `SessionError`, `AbortReason`, `CancelReason`, `AdminError`, `ExportError`

pub mod config;
pub mod errors;
pub mod export;
pub mod receipt;
pub mod session;
pub mod state;
pub mod stats;

pub use config::*;
pub use errors::*;
pub use export::*;
pub use receipt::*;
pub use session::*;
pub use state::*;
pub use stats::*;
