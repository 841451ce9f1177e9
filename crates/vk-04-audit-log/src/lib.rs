//! # Audit Log Subsystem (VK-04)
//!
//! Append-only, totally ordered log of [`SecurityEvent`]s from every kiosk
//! component, and the read-side aggregation of those events into a
//! [`SecurityStatus`].
//!
//! ## Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | Sequence starts at 1, strictly increasing, gapless | Assigned under the exclusive append lock |
//! | Append-only | No removal API; `resolve` appends a new record |
//! | Consistent reads | Readers clone under the shared lock |
//! | Status = max unresolved severity | Recomputed from a snapshot on every read |
//!
//! ## Writers
//!
//! ```text
//! SessionController ──┐
//! Hardware ingest ────┼──→ AuditLog::append ──→ [seq 1, 2, 3, ...]
//! Operator resolve ───┘                               │
//!                                                     ↓
//!                               SecurityStatusAggregator (read-only)
//! ```
//!
//! [`SecurityEvent`]: shared_types::SecurityEvent
//! [`SecurityStatus`]: shared_types::SecurityStatus

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::hardware::{run_hardware_ingest, HardwareSignal};
pub use domain::*;
pub use ports::inbound::AuditLogApi;
pub use service::{AuditLog, SecurityStatusAggregator};
