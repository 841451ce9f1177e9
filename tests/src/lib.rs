//! # VoteSafe Kiosk Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Sealing and audit-log throughput
//! └── src/integration/  # Cross-subsystem flows on a wired kiosk
//!     ├── session_flows.rs
//!     ├── audit_concurrency.rs
//!     └── operator_flows.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p vk-tests
//! cargo test -p vk-tests integration::session_flows
//! cargo bench -p vk-tests
//! ```

pub mod integration;
