//! # Security Events
//!
//! The append-only audit log is a sequence of [`SecurityEvent`]s. Severity is
//! ordered `Info < Warning < Alert` so that the security status can be derived
//! as a plain maximum.

use crate::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a security event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Informational; never raises the security status.
    Info,
    /// Operator attention needed.
    Warning,
    /// Possible tampering, fraud or loss of a vote.
    Alert,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Alert => "ALERT",
        };
        f.write_str(label)
    }
}

/// Subsystem or hardware component that produced an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSource {
    /// Enclosure tamper switch.
    TamperSensor,
    /// Thermal receipt printer.
    Printer,
    /// Biometric scanner.
    Scanner,
    /// Vote sealing subsystem.
    Sealer,
    /// Identity verification.
    Identity,
    /// Session controller.
    Session,
    /// Power supply / battery backup.
    Power,
    /// Operator actions (resolution, export).
    Operator,
}

impl EventSource {
    /// Every source, in dashboard order.
    pub const ALL: [EventSource; 8] = [
        EventSource::TamperSensor,
        EventSource::Printer,
        EventSource::Scanner,
        EventSource::Sealer,
        EventSource::Identity,
        EventSource::Session,
        EventSource::Power,
        EventSource::Operator,
    ];
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EventSource::TamperSensor => "tamper-sensor",
            EventSource::Printer => "printer",
            EventSource::Scanner => "scanner",
            EventSource::Sealer => "sealer",
            EventSource::Identity => "identity",
            EventSource::Session => "session",
            EventSource::Power => "power",
            EventSource::Operator => "operator",
        };
        f.write_str(label)
    }
}

/// A security event as submitted by a producer, before sequencing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewSecurityEvent {
    /// Producer of the event.
    pub source: EventSource,
    /// Severity.
    pub severity: Severity,
    /// Human-readable description. Must not contain voter-identifying data.
    pub message: String,
}

impl NewSecurityEvent {
    /// Create an event.
    pub fn new(source: EventSource, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            source,
            severity,
            message: message.into(),
        }
    }

    /// Shorthand for an `Info` event.
    pub fn info(source: EventSource, message: impl Into<String>) -> Self {
        Self::new(source, Severity::Info, message)
    }

    /// Shorthand for a `Warning` event.
    pub fn warning(source: EventSource, message: impl Into<String>) -> Self {
        Self::new(source, Severity::Warning, message)
    }

    /// Shorthand for an `Alert` event.
    pub fn alert(source: EventSource, message: impl Into<String>) -> Self {
        Self::new(source, Severity::Alert, message)
    }
}

/// A sequenced entry in the audit log.
///
/// INVARIANT: `sequence` starts at 1 and is gapless across the whole log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityEvent {
    /// Position in the log (sole ordering authority).
    pub sequence: u64,
    /// Wall-clock time of the append (informational).
    pub timestamp: Timestamp,
    /// Producer of the event.
    pub source: EventSource,
    /// Severity.
    pub severity: Severity,
    /// Description.
    pub message: String,
    /// Set once an operator acknowledges the event.
    pub resolved: bool,
    /// For resolution records: the sequence of the event being resolved.
    pub resolves: Option<u64>,
}

impl SecurityEvent {
    /// True if the event still counts towards the security status.
    pub fn is_unresolved(&self) -> bool {
        !self.resolved
    }
}

/// Kiosk security status derived from the unresolved audit events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SecurityStatus {
    /// No unresolved Warning or Alert.
    Secure,
    /// At least one unresolved Warning, no unresolved Alert.
    Warning,
    /// At least one unresolved Alert.
    Alert,
}

impl From<Severity> for SecurityStatus {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Info => SecurityStatus::Secure,
            Severity::Warning => SecurityStatus::Warning,
            Severity::Alert => SecurityStatus::Alert,
        }
    }
}

impl fmt::Display for SecurityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SecurityStatus::Secure => "SECURE",
            SecurityStatus::Warning => "WARNING",
            SecurityStatus::Alert => "ALERT",
        };
        f.write_str(label)
    }
}
