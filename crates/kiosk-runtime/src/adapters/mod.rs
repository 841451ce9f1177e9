//! Device adapters for the session controller's outbound ports.

pub mod narrator;
pub mod printer;

pub use narrator::TracingNarrator;
pub use printer::LogReceiptPrinter;
