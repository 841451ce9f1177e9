//! # Event Log
//!
//! Storage half of the audit log. Holds no lock of its own: the service wraps
//! it in a `RwLock`, so every `&mut self` method runs under the exclusive
//! append lock.

use super::errors::AuditError;
use shared_types::{EventSource, NewSecurityEvent, SecurityEvent, Timestamp};

/// Sequenced, append-only list of security events.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<SecurityEvent>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence number the next append will receive.
    pub fn next_sequence(&self) -> u64 {
        self.events.len() as u64 + 1
    }

    /// Append an event and return its sequence number.
    pub fn append(&mut self, event: NewSecurityEvent, at: Timestamp) -> u64 {
        self.push(event, at, None)
    }

    /// Mark event `sequence` resolved and append the resolution record.
    ///
    /// Returns the sequence number of the resolution record.
    pub fn resolve(
        &mut self,
        sequence: u64,
        operator: &str,
        at: Timestamp,
    ) -> Result<u64, AuditError> {
        let index = self.index_of(sequence).ok_or(AuditError::NotFound(sequence))?;
        let target = &mut self.events[index];
        if target.resolved {
            return Err(AuditError::AlreadyResolved(sequence));
        }
        target.resolved = true;
        let message = format!(
            "Resolved #{} ({}: {}) by operator {}",
            sequence, target.severity, target.message, operator
        );

        Ok(self.push(
            NewSecurityEvent::info(EventSource::Operator, message),
            at,
            Some(sequence),
        ))
    }

    /// Events with a sequence strictly greater than `since`, oldest first,
    /// at most `limit` of them.
    pub fn query(&self, since: Option<u64>, limit: Option<usize>) -> Vec<SecurityEvent> {
        let start = since.map_or(0, |s| s.min(self.events.len() as u64) as usize);
        let tail = &self.events[start..];
        let take = limit.unwrap_or(tail.len()).min(tail.len());
        tail[..take].to_vec()
    }

    /// The `limit` most recent events, newest first.
    pub fn recent(&self, limit: usize) -> Vec<SecurityEvent> {
        self.events.iter().rev().take(limit).cloned().collect()
    }

    /// Look up one event.
    pub fn get(&self, sequence: u64) -> Option<&SecurityEvent> {
        self.index_of(sequence).map(|i| &self.events[i])
    }

    /// All events.
    pub fn events(&self) -> &[SecurityEvent] {
        &self.events
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if nothing was logged yet.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn index_of(&self, sequence: u64) -> Option<usize> {
        // Sequences are gapless from 1, so the index is sequence - 1.
        let index = sequence.checked_sub(1)? as usize;
        (index < self.events.len()).then_some(index)
    }

    fn push(&mut self, event: NewSecurityEvent, at: Timestamp, resolves: Option<u64>) -> u64 {
        let sequence = self.next_sequence();
        self.events.push(SecurityEvent {
            sequence,
            timestamp: at,
            source: event.source,
            severity: event.severity,
            message: event.message,
            resolved: false,
            resolves,
        });
        sequence
    }
}
