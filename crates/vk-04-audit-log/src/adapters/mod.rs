//! # Adapters Layer
//!
//! - `hardware`: Kiosk sensor signals → security events

pub mod hardware;
