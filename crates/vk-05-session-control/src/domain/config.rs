//! Session controller configuration.

use shared_types::StationId;
use std::time::Duration;

/// Limits and timeouts of the session controller.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Station id printed on receipts and exports.
    pub station_id: StationId,
    /// Lifetime of a session from `begin`.
    pub session_ttl: Duration,
    /// Malformed credentials allowed before the session aborts.
    pub credential_retry_limit: u32,
    /// Failed biometric checks allowed before the session aborts.
    pub biometric_retry_limit: u32,
    /// Upper bound on sealing one vote.
    pub seal_timeout: Duration,
    /// Print attempts before falling back to a manual receipt.
    pub printer_retry_limit: u32,
    /// Upper bound on one print attempt.
    pub printer_timeout: Duration,
    /// Pause between print attempts.
    pub printer_retry_backoff: Duration,
    /// Period of the expiry watchdog.
    pub expiry_sweep_interval: Duration,
    /// Electoral roll size for turnout, if known.
    pub registered_voters: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            station_id: StationId::default(),
            session_ttl: Duration::from_secs(300),
            credential_retry_limit: 3,
            biometric_retry_limit: 3,
            seal_timeout: Duration::from_secs(5),
            printer_retry_limit: 3,
            printer_timeout: Duration::from_secs(5),
            printer_retry_backoff: Duration::from_millis(250),
            expiry_sweep_interval: Duration::from_secs(1),
            registered_voters: None,
        }
    }
}
