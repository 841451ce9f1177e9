//! # Security Status Aggregation
//!
//! Pure functions over an event slice. Only unresolved events count.

use shared_types::{EventSource, SecurityEvent, SecurityStatus, Severity};
use std::collections::BTreeMap;

/// Highest unresolved severity, `Secure` if none.
pub fn aggregate(events: &[SecurityEvent]) -> SecurityStatus {
    events
        .iter()
        .filter(|e| e.is_unresolved())
        .map(|e| e.severity)
        .max()
        .map_or(SecurityStatus::Secure, SecurityStatus::from)
}

/// Status per event source. Every source appears, `Secure` when quiet.
pub fn component_status(events: &[SecurityEvent]) -> BTreeMap<EventSource, SecurityStatus> {
    let mut status: BTreeMap<EventSource, SecurityStatus> = EventSource::ALL
        .iter()
        .map(|source| (*source, SecurityStatus::Secure))
        .collect();

    for event in events.iter().filter(|e| e.is_unresolved()) {
        let entry = status.entry(event.source).or_insert(SecurityStatus::Secure);
        *entry = (*entry).max(SecurityStatus::from(event.severity));
    }
    status
}

/// Number of unresolved Warning and Alert events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UnresolvedCounts {
    /// Unresolved warnings.
    pub warnings: usize,
    /// Unresolved alerts.
    pub alerts: usize,
}

/// Count unresolved warnings and alerts.
pub fn unresolved_counts(events: &[SecurityEvent]) -> UnresolvedCounts {
    events
        .iter()
        .filter(|e| e.is_unresolved())
        .fold(UnresolvedCounts::default(), |mut acc, e| {
            match e.severity {
                Severity::Warning => acc.warnings += 1,
                Severity::Alert => acc.alerts += 1,
                Severity::Info => {}
            }
            acc
        })
}
