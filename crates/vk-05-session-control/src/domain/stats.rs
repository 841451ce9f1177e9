//! Session counters and the operator statistics view.

use serde::{Deserialize, Serialize};
use shared_types::{SecurityStatus, StationId};
use std::sync::atomic::{AtomicU64, Ordering};

/// Lifetime session counters.
#[derive(Debug, Default)]
pub struct SessionCounters {
    started: AtomicU64,
    completed: AtomicU64,
    aborted: AtomicU64,
}

impl SessionCounters {
    pub fn record_started(&self) {
        self.started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_aborted(&self) {
        self.aborted.fetch_add(1, Ordering::Relaxed);
    }

    /// `(started, completed, aborted)`.
    pub fn load(&self) -> (u64, u64, u64) {
        (
            self.started.load(Ordering::Relaxed),
            self.completed.load(Ordering::Relaxed),
            self.aborted.load(Ordering::Relaxed),
        )
    }
}

/// Operator dashboard statistics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KioskStats {
    pub station_id: StationId,
    /// Candidates on the ballot.
    pub candidates: usize,
    pub sessions_started: u64,
    pub sessions_completed: u64,
    pub sessions_aborted: u64,
    /// Sealed votes in the ballot box.
    pub votes_recorded: u64,
    pub registered_voters: Option<u64>,
    /// `votes_recorded / registered_voters` in percent.
    pub turnout_percent: Option<f64>,
    pub unresolved_alerts: usize,
    pub unresolved_warnings: usize,
    pub security_status: SecurityStatus,
}

/// Turnout in percent, `None` when the roll size is unknown or zero.
pub fn turnout_percent(votes: u64, registered: Option<u64>) -> Option<f64> {
    registered
        .filter(|r| *r > 0)
        .map(|r| votes as f64 * 100.0 / r as f64)
}
