//! # Audit Log Service
//!
//! `AuditLog` owns the event log behind a `parking_lot::RwLock`: appends and
//! resolutions take the write lock, queries clone under the read lock.

use crate::domain::{
    aggregate, component_status, unresolved_counts, AuditError, EventLog, UnresolvedCounts,
};
use crate::ports::inbound::AuditLogApi;
use parking_lot::RwLock;
use shared_types::{
    EventSource, NewSecurityEvent, SecurityEvent, SecurityStatus, Severity, TimeSource,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The kiosk audit log.
pub struct AuditLog {
    log: RwLock<EventLog>,
    clock: Arc<dyn TimeSource>,
}

impl AuditLog {
    /// Create an empty audit log.
    pub fn new(clock: Arc<dyn TimeSource>) -> Self {
        Self {
            log: RwLock::new(EventLog::new()),
            clock,
        }
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.log.read().len()
    }

    /// True if nothing was logged yet.
    pub fn is_empty(&self) -> bool {
        self.log.read().is_empty()
    }
}

impl AuditLogApi for AuditLog {
    fn append(&self, event: NewSecurityEvent) -> u64 {
        let severity = event.severity;
        let source = event.source;
        let sequence = {
            let mut log = self.log.write();
            // Timestamp taken under the lock so timestamps follow sequence order.
            log.append(event, self.clock.now())
        };

        match severity {
            Severity::Alert => warn!(sequence, %source, "[vk-04] ALERT recorded"),
            Severity::Warning => info!(sequence, %source, "[vk-04] warning recorded"),
            Severity::Info => debug!(sequence, %source, "[vk-04] event recorded"),
        }
        sequence
    }

    fn query(&self, since: Option<u64>, limit: Option<usize>) -> Vec<SecurityEvent> {
        self.log.read().query(since, limit)
    }

    fn recent(&self, limit: usize) -> Vec<SecurityEvent> {
        self.log.read().recent(limit)
    }

    fn resolve(&self, sequence: u64, operator: &str) -> Result<u64, AuditError> {
        let record = {
            let mut log = self.log.write();
            log.resolve(sequence, operator, self.clock.now())?
        };
        info!(sequence, record, "[vk-04] event resolved");
        Ok(record)
    }

    fn snapshot(&self) -> Vec<SecurityEvent> {
        self.log.read().events().to_vec()
    }
}

/// Read-only view deriving security status from an audit log.
///
/// Never writes; every call recomputes from a fresh snapshot.
#[derive(Clone)]
pub struct SecurityStatusAggregator {
    log: Arc<dyn AuditLogApi>,
}

impl SecurityStatusAggregator {
    /// Create an aggregator over `log`.
    pub fn new(log: Arc<dyn AuditLogApi>) -> Self {
        Self { log }
    }

    /// Current kiosk security status.
    pub fn status(&self) -> SecurityStatus {
        aggregate(&self.log.snapshot())
    }

    /// Current status of each component.
    pub fn component_status(&self) -> BTreeMap<EventSource, SecurityStatus> {
        component_status(&self.log.snapshot())
    }

    /// Unresolved warning and alert counts.
    pub fn unresolved(&self) -> UnresolvedCounts {
        unresolved_counts(&self.log.snapshot())
    }
}
