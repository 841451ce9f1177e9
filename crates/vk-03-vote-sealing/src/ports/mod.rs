//! # Ports Layer
//!
//! - **Inbound (Driving)**: `VoteSealer`, the sealing contract used by the session controller

pub mod inbound;
