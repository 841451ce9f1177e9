//! # Hardware Signal Ingestion
//!
//! Sensors (tamper switch, printer, scanner, battery) report over an `mpsc`
//! channel. The ingest loop turns each signal into a security event until the
//! shutdown flag flips or every sender is dropped.

use crate::ports::inbound::AuditLogApi;
use shared_types::{EventSource, NewSecurityEvent, Severity};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

/// A signal raised by kiosk hardware.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HardwareSignal {
    /// Enclosure tamper switch opened.
    TamperOpened,
    /// Enclosure closed again.
    EnclosureClosed,
    /// Receipt paper running low.
    PaperLow,
    /// Printer jammed.
    PrinterJam,
    /// Biometric scanner reported a fault.
    ScannerFault(String),
    /// Backup battery low.
    BatteryLow {
        /// Remaining charge.
        percent: u8,
    },
    /// Periodic self-test passed.
    HealthCheckPassed,
}

impl HardwareSignal {
    /// The security event this signal produces.
    pub fn to_event(&self) -> NewSecurityEvent {
        let (source, severity, message) = match self {
            HardwareSignal::TamperOpened => (
                EventSource::TamperSensor,
                Severity::Alert,
                "Tamper switch activated".to_string(),
            ),
            HardwareSignal::EnclosureClosed => (
                EventSource::TamperSensor,
                Severity::Info,
                "Enclosure closed".to_string(),
            ),
            HardwareSignal::PaperLow => (
                EventSource::Printer,
                Severity::Warning,
                "Low paper warning".to_string(),
            ),
            HardwareSignal::PrinterJam => (
                EventSource::Printer,
                Severity::Warning,
                "Printer jam".to_string(),
            ),
            HardwareSignal::ScannerFault(detail) => (
                EventSource::Scanner,
                Severity::Warning,
                format!("Scanner fault: {detail}"),
            ),
            HardwareSignal::BatteryLow { percent } => (
                EventSource::Power,
                Severity::Warning,
                format!("Battery low ({percent}%)"),
            ),
            HardwareSignal::HealthCheckPassed => (
                EventSource::Session,
                Severity::Info,
                "Hardware health check passed".to_string(),
            ),
        };
        NewSecurityEvent::new(source, severity, message)
    }
}

/// Drain hardware signals into the audit log.
///
/// Returns the number of signals recorded.
pub async fn run_hardware_ingest(
    log: Arc<dyn AuditLogApi>,
    mut signals: mpsc::Receiver<HardwareSignal>,
    mut shutdown: watch::Receiver<bool>,
) -> u64 {
    let mut recorded = 0u64;
    loop {
        tokio::select! {
            signal = signals.recv() => {
                let Some(signal) = signal else {
                    debug!("[vk-04] hardware channel closed");
                    break;
                };
                let sequence = log.append(signal.to_event());
                debug!(sequence, ?signal, "[vk-04] hardware signal recorded");
                recorded += 1;
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    info!("[vk-04] Shutdown signal received");
                    break;
                }
            }
        }
    }
    recorded
}
