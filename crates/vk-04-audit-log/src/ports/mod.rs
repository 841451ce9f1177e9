//! # Ports Layer
//!
//! - **Inbound (Driving)**: `AuditLogApi`, used by the session controller,
//!   the hardware ingest loop and the operator console

pub mod inbound;
