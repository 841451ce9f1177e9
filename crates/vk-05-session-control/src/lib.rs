//! # Session Control Subsystem (VK-05)
//!
//! Orchestrates one voter session at a time from credential entry to a sealed,
//! anonymous vote, and exposes the operator read API and the dual-authorized
//! export.
//!
//! ## State Machine
//!
//! ```text
//! Idle → CredentialPending → BiometricPending → Verified → BallotOpen → Sealing → Completed
//!              │                    │              │            │           │
//!              └────────────────────┴──────────────┴────────────┴───────────┴──→ Aborted
//! ```
//!
//! ## Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | One active session per kiosk | Single `Mutex<Option<VoterSession>>` slot |
//! | No backward transitions except abort | `SessionStateKind::can_transition_to` |
//! | At most one sealed vote per session | `consumed` set once on entering `Completed` |
//! | Identity never reaches the vote | `Sealing` carries only the `VoteRecord` |
//! | No partial vote on cancellation | Results re-checked against the slot after every `.await` |
//! | Invalid requests have no side effect | `StateError` returned before any mutation |
//!
//! ## Audit Side Effects
//!
//! | Outcome | Event |
//! |---------|-------|
//! | Bad credential / unknown candidate | Info |
//! | Biometric failure below bound | Info |
//! | Retry bound exhausted | Alert + abort |
//! | Sealing failure or timeout | Alert + abort |
//! | Printer failure after retries | Warning (manual fallback) |
//! | Abort / expiry | Warning |
//! | Vote sealed | Info |
//! | `StateError`, `SessionBusy` | none |
//!
//! The slot lock is never held across an `.await`.

pub mod admin;
pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::inbound::{AdminReportingApi, SessionControlApi};
pub use ports::outbound::{Narrator, PrinterError, ReceiptPrinter};
pub use service::{run_expiry_watchdog, SessionController, SessionPorts};
