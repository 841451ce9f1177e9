//! # Admin Reporting
//!
//! Operator console API: read-only statistics and audit views, event
//! resolution, and the dual-authorized encrypted export. Reads never touch
//! the session slot.

use crate::domain::{
    seal_bundle, turnout_percent, AdminError, DualAuthorization, EncryptedBundle, ExportError,
    ExportPayload, KioskStats, OperatorCredential,
};
use crate::ports::inbound::AdminReportingApi;
use crate::service::SessionController;
use shared_crypto::Ed25519PublicKey;
use shared_types::{EventSource, NewSecurityEvent, SecurityEvent, SecurityStatus};
use std::collections::BTreeMap;
use tracing::{info, warn};

impl SessionController {
    /// Public key that verifies export bundles and sealed votes.
    pub fn station_public_key(&self) -> Ed25519PublicKey {
        self.export_keys.public_key()
    }
}

impl AdminReportingApi for SessionController {
    fn stats(&self) -> KioskStats {
        let (started, completed, aborted) = self.counters.load();
        let votes_recorded = self.ports.ballot_box.count() as u64;
        let events = self.ports.audit.snapshot();
        let unresolved = vk_04_audit_log::unresolved_counts(&events);

        KioskStats {
            station_id: self.config.station_id.clone(),
            candidates: self.ports.ballot.len(),
            sessions_started: started,
            sessions_completed: completed,
            sessions_aborted: aborted,
            votes_recorded,
            registered_voters: self.config.registered_voters,
            turnout_percent: turnout_percent(votes_recorded, self.config.registered_voters),
            unresolved_alerts: unresolved.alerts,
            unresolved_warnings: unresolved.warnings,
            security_status: vk_04_audit_log::aggregate(&events),
        }
    }

    fn recent_events(&self, limit: usize) -> Vec<SecurityEvent> {
        self.ports.audit.recent(limit)
    }

    fn security_status(&self) -> SecurityStatus {
        self.aggregator.status()
    }

    fn component_status(&self) -> BTreeMap<EventSource, SecurityStatus> {
        self.aggregator.component_status()
    }

    fn resolve_event(
        &self,
        sequence: u64,
        operator: &OperatorCredential,
    ) -> Result<u64, AdminError> {
        if !self.operators.verify(operator) {
            self.ports.audit.append(NewSecurityEvent::warning(
                EventSource::Operator,
                format!(
                    "Operator {} failed authentication resolving #{sequence}",
                    operator.operator_id()
                ),
            ));
            return Err(AdminError::Unauthorized(operator.operator_id().to_string()));
        }
        Ok(self.ports.audit.resolve(sequence, operator.operator_id())?)
    }

    fn export_encrypted_bundle(
        &self,
        auth: &DualAuthorization,
    ) -> Result<EncryptedBundle, ExportError> {
        if let Err(e) = self.operators.authorize(auth) {
            self.ports.audit.append(NewSecurityEvent::warning(
                EventSource::Operator,
                format!("Export refused: {e}"),
            ));
            warn!(error = %e, "[vk-05] export dual authorization failed");
            return Err(e);
        }

        // Snapshot before the release event so the bundle ends at a known sequence.
        let payload = ExportPayload {
            station_id: self.config.station_id.clone(),
            exported_at: self.ports.clock.now(),
            sealed_votes: self.ports.ballot_box.snapshot(),
            audit_events: self.ports.audit.snapshot(),
        };
        let bundle = seal_bundle(&payload, &self.export_keys, &mut self.rng.lock())?;

        self.ports.audit.append(NewSecurityEvent::info(
            EventSource::Operator,
            format!(
                "Encrypted export released ({} votes, {} events) authorized by {} and {}",
                payload.sealed_votes.len(),
                payload.audit_events.len(),
                auth.first.operator_id(),
                auth.second.operator_id()
            ),
        ));
        info!(
            votes = payload.sealed_votes.len(),
            events = payload.audit_events.len(),
            "[vk-05] encrypted export released"
        );
        Ok(bundle)
    }
}
