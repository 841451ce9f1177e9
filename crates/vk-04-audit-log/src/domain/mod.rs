//! # Domain Layer - Audit Log
//!
//! - `event_log`: Sequenced, append-only event storage
//! - `aggregation`: Pure severity aggregation
//! - `errors`: `AuditError`

pub mod aggregation;
pub mod errors;
pub mod event_log;

pub use aggregation::*;
pub use errors::*;
pub use event_log::*;
