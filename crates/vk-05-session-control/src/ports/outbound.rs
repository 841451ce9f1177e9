//! # Outbound Ports (Driven Ports / SPI)

use crate::domain::VoteReceipt;
use async_trait::async_trait;
use thiserror::Error;

/// Audio narration. Fire-and-forget: the controller never waits on it.
pub trait Narrator: Send + Sync {
    fn announce(&self, message: &str);
}

/// Receipt printer failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PrinterError {
    #[error("Printer offline")]
    Offline,

    #[error("Out of paper")]
    PaperOut,

    #[error("Printer jammed")]
    Jammed,

    #[error("Print timed out")]
    Timeout,

    #[error("Printer I/O error: {0}")]
    Io(String),
}

/// Thermal receipt printer.
#[async_trait]
pub trait ReceiptPrinter: Send + Sync {
    async fn print(&self, receipt: &VoteReceipt) -> Result<(), PrinterError>;
}
