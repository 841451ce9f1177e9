//! # Operator Flows
//!
//! Polling-officer actions against a kiosk that has been used:
//! acknowledging events and releasing the dual-authorized export.

#[cfg(test)]
mod tests {
    use super::super::*;
    use shared_types::{CandidateId, EventSource, SecurityStatus, Severity};
    use vk_04_audit_log::{AuditLogApi, HardwareSignal};
    use vk_05_session_control::{
        open_bundle, AdminError, AdminReportingApi, DualAuthorization, ExportError, ExportKeys,
        OperatorCredential, SessionControlApi,
    };

    fn alpha() -> OperatorCredential {
        OperatorCredential::new("op-alpha", "4821")
    }

    fn bravo() -> OperatorCredential {
        OperatorCredential::new("op-bravo", "7310")
    }

    async fn vote(kiosk: &KioskContainer, voter: u32) {
        let controller = &kiosk.controller;
        controller.begin().unwrap();
        controller.submit_credential(&credential(voter)).unwrap();
        controller.submit_biometric(good_sample()).await.unwrap();
        controller.select_candidate(&CandidateId::new("C004")).unwrap();
        controller.submit_vote().await.unwrap();
    }

    #[tokio::test]
    async fn test_resolving_alert_restores_secure_status() {
        let (kiosk, _clock) = wired_kiosk(&kiosk_config());
        let tamper = kiosk.audit.append(HardwareSignal::TamperOpened.to_event());
        assert_eq!(kiosk.controller.security_status(), SecurityStatus::Alert);

        let record = kiosk.controller.resolve_event(tamper, &alpha()).unwrap();

        let resolution = &kiosk.audit.recent(1)[0];
        assert_eq!(resolution.sequence, record);
        assert_eq!(resolution.resolves, Some(tamper));
        assert_eq!(resolution.source, EventSource::Operator);
        assert_eq!(kiosk.controller.security_status(), SecurityStatus::Secure);
        assert_eq!(kiosk.controller.stats().unresolved_alerts, 0);
    }

    #[tokio::test]
    async fn test_wrong_pin_cannot_resolve() {
        let (kiosk, _clock) = wired_kiosk(&kiosk_config());
        let tamper = kiosk.audit.append(HardwareSignal::TamperOpened.to_event());

        let err = kiosk
            .controller
            .resolve_event(tamper, &OperatorCredential::new("op-alpha", "0000"))
            .unwrap_err();

        assert!(matches!(err, AdminError::Unauthorized(_)));
        assert_eq!(kiosk.controller.security_status(), SecurityStatus::Alert);
        assert_eq!(kiosk.audit.recent(1)[0].severity, Severity::Warning);
    }

    #[tokio::test]
    async fn test_export_round_trip_after_voting() {
        let (kiosk, _clock) = wired_kiosk(&kiosk_config());
        vote(&kiosk, 1).await;
        vote(&kiosk, 2).await;

        let bundle = kiosk
            .controller
            .export_encrypted_bundle(&DualAuthorization {
                first: alpha(),
                second: bravo(),
            })
            .unwrap();

        let keys = ExportKeys::for_station(&sealing_config());
        let payload = open_bundle(&bundle, &keys.public_key(), keys.encryption_key()).unwrap();
        assert_eq!(payload.sealed_votes, kiosk.ballot_box.snapshot());
        assert_eq!(payload.audit_events.len(), 2);
        assert_eq!(payload.station_id, kiosk.controller.config().station_id);

        // The release itself is on the record, after the snapshot.
        let release = &kiosk.audit.recent(1)[0];
        assert_eq!(release.severity, Severity::Info);
        assert_eq!(release.sequence, 3);
    }

    #[tokio::test]
    async fn test_tampered_bundle_is_rejected() {
        let (kiosk, _clock) = wired_kiosk(&kiosk_config());
        vote(&kiosk, 1).await;

        let mut bundle = kiosk
            .controller
            .export_encrypted_bundle(&DualAuthorization {
                first: alpha(),
                second: bravo(),
            })
            .unwrap();
        bundle.ciphertext[0] ^= 0x01;

        let keys = ExportKeys::for_station(&sealing_config());
        assert_eq!(
            open_bundle(&bundle, &keys.public_key(), keys.encryption_key()).unwrap_err(),
            ExportError::InvalidSignature
        );
    }

    #[tokio::test]
    async fn test_single_operator_cannot_export() {
        let (kiosk, _clock) = wired_kiosk(&kiosk_config());

        let err = kiosk
            .controller
            .export_encrypted_bundle(&DualAuthorization {
                first: alpha(),
                second: alpha(),
            })
            .unwrap_err();

        assert_eq!(err, ExportError::SameOperator);
        let refusal = &kiosk.audit.recent(1)[0];
        assert_eq!(refusal.severity, Severity::Warning);
        assert_eq!(refusal.source, EventSource::Operator);
    }
}
