//! # Receipt Printer (log-backed)
//!
//! Renders the receipt as text and writes it to the log. Tracks the paper
//! roll: each receipt uses one slip, `PaperLow` is raised on the hardware
//! channel when the roll drops to the threshold, and an empty roll fails
//! with `PaperOut` so the controller falls back to a manual receipt.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::mpsc;
use tracing::{info, warn};
use vk_04_audit_log::HardwareSignal;
use vk_05_session_control::{PrinterError, ReceiptPrinter, VoteReceipt};

/// Slips remaining at which `PaperLow` is signalled.
pub const PAPER_LOW_THRESHOLD: u32 = 20;

/// Printer that logs rendered receipts.
pub struct LogReceiptPrinter {
    paper: AtomicU32,
    signals: mpsc::Sender<HardwareSignal>,
}

impl LogReceiptPrinter {
    /// Printer loaded with `paper` slips.
    pub fn new(paper: u32, signals: mpsc::Sender<HardwareSignal>) -> Self {
        Self {
            paper: AtomicU32::new(paper),
            signals,
        }
    }

    /// Slips left on the roll.
    pub fn paper_remaining(&self) -> u32 {
        self.paper.load(Ordering::SeqCst)
    }

    /// Render a receipt as printable lines.
    pub fn render(receipt: &VoteReceipt) -> Vec<String> {
        let sealed_at = i64::try_from(receipt.sealed_at)
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| receipt.sealed_at.to_string());
        vec![
            "VOTE RECEIPT".to_string(),
            format!("Transaction: {}", receipt.transaction_id),
            format!("Sealed:      {sealed_at}"),
            format!("Station:     {}", receipt.station_id),
            format!("Integrity:   {}", receipt.integrity_digest),
            "Keep this slip to confirm your vote was counted.".to_string(),
        ]
    }
}

#[async_trait]
impl ReceiptPrinter for LogReceiptPrinter {
    async fn print(&self, receipt: &VoteReceipt) -> Result<(), PrinterError> {
        let remaining = self
            .paper
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .map_err(|_| PrinterError::PaperOut)?
            - 1;

        for line in Self::render(receipt) {
            info!(target: "printer", "[kiosk] {}", line);
        }

        if remaining == PAPER_LOW_THRESHOLD {
            if let Err(e) = self.signals.try_send(HardwareSignal::PaperLow) {
                warn!("[kiosk] Could not raise paper-low signal: {}", e);
            }
        }
        Ok(())
    }
}
