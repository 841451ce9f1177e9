//! # VoteSafe Kiosk Runtime
//!
//! Wires the kiosk subsystems into one process.
//!
//! ## Modular Structure
//!
//! - `container/` - Configuration and subsystem construction
//! - `adapters/` - Narrator and receipt printer implementations
//!
//! ## Wiring
//!
//! ```text
//!                    ┌──────────────────────┐
//!  UI ──────────────→│ SessionController(5) │──→ Narrator / ReceiptPrinter
//!                    └──────────────────────┘
//!                      │      │      │     │
//!                      ↓      ↓      ↓     ↓
//!               Identity(1) Ballot(2) Sealing(3) AuditLog(4) ←── hardware signals (mpsc)
//!                                                    ↑
//!  Operator console ──────── stats / export ─────────┘
//! ```
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Refuse an all-zero sealing secret unless in dev mode
//! 3. Build subsystems (audit log first, controller last)
//! 4. Spawn the expiry watchdog and hardware ingest loop
//! 5. Record a hardware health check

pub mod adapters;
pub mod container;

pub use container::config::{load_config, ConfigError, KioskConfig};
pub use container::KioskContainer;
