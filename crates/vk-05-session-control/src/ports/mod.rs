//! # Ports Layer
//!
//! - **Inbound (Driving)**: `SessionControlApi` for the kiosk UI,
//!   `AdminReportingApi` for the operator console
//! - **Outbound (Driven)**: `Narrator`, `ReceiptPrinter`

pub mod inbound;
pub mod outbound;
