//! # Adapters
//!
//! Stand-in implementations of the outbound ports.

pub mod matcher;

pub use matcher::QualityThresholdMatcher;
