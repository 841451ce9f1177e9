//! # Voter Session Flows
//!
//! End-to-end voter journeys on a wired kiosk:
//!
//! 1. **Identity (1) → Ballot (2) → Sealing (3)**: a verified voter's choice is sealed
//! 2. **Sealing (3) → Ballot box**: the sealed vote verifies and unseals to the choice
//! 3. **Session control (5) → Audit (4)**: each outcome leaves the expected trail

#[cfg(test)]
mod tests {
    use super::super::*;
    use shared_crypto::KioskRng;
    use shared_types::{CandidateId, EventSource, SecurityStatus, Severity};
    use vk_03_vote_sealing::{StandardVoteSealer, VoteSealer};
    use vk_04_audit_log::AuditLogApi;
    use vk_05_session_control::{
        AbortReason, AdminReportingApi, SessionControlApi, SessionError, SessionStateKind,
    };

    async fn cast(kiosk: &KioskContainer, voter: u32, choice: &str) -> String {
        let controller = &kiosk.controller;
        controller.begin().unwrap();
        controller.submit_credential(&credential(voter)).unwrap();
        controller.submit_biometric(good_sample()).await.unwrap();
        controller.select_candidate(&CandidateId::new(choice)).unwrap();
        let receipt = controller.submit_vote().await.unwrap();
        receipt.transaction_id.to_string()
    }

    // =========================================================================
    // HAPPY PATH
    // =========================================================================

    #[tokio::test]
    async fn test_vote_is_sealed_and_recoverable() {
        let (kiosk, clock) = wired_kiosk(&kiosk_config());
        let tx_id = cast(&kiosk, 1, "C002").await;

        assert!(tx_id.starts_with("VE000001-"));
        assert_eq!(kiosk.controller.snapshot().state, SessionStateKind::Completed);

        let sealed = kiosk.ballot_box.snapshot();
        assert_eq!(sealed.len(), 1);

        // An auditor holding the station secret can verify and open it.
        let auditor = StandardVoteSealer::new(&sealing_config(), KioskRng::seeded(0), clock);
        assert!(auditor.verify(&sealed[0]));
        let record = auditor.unseal(&sealed[0]).unwrap();
        assert_eq!(record.candidate_id, CandidateId::new("C002"));

        let events = kiosk.audit.snapshot();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].severity, Severity::Info);
        assert_eq!(kiosk.controller.security_status(), SecurityStatus::Secure);
    }

    #[tokio::test]
    async fn test_sealed_vote_carries_no_identity() {
        let (kiosk, _clock) = wired_kiosk(&kiosk_config());
        let voter = credential(42);
        cast(&kiosk, 42, "C003").await;

        let sealed_json = serde_json::to_string(&kiosk.ballot_box.snapshot()).unwrap();
        let events_json = serde_json::to_string(&kiosk.audit.snapshot()).unwrap();
        assert!(!sealed_json.contains(&voter));
        assert!(!events_json.contains(&voter));
        assert!(!events_json.contains("C003"));
    }

    #[tokio::test]
    async fn test_consecutive_voters_get_distinct_transactions() {
        let (kiosk, _clock) = wired_kiosk(&kiosk_config());

        let mut ids = Vec::new();
        for voter in 1..=4 {
            ids.push(cast(&kiosk, voter, "C001").await);
        }

        assert_eq!(ids[0][..8], *"VE000001");
        assert_eq!(ids[3][..8], *"VE000004");
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);

        let stats = kiosk.controller.stats();
        assert_eq!(stats.sessions_completed, 4);
        assert_eq!(stats.votes_recorded, 4);
        assert_eq!(stats.turnout_percent, Some(40.0));
        assert_eq!(kiosk.printer.paper_remaining(), 496);
    }

    // =========================================================================
    // FAILURE PATHS
    // =========================================================================

    #[tokio::test]
    async fn test_biometric_exhaustion_raises_alert() {
        let (kiosk, _clock) = wired_kiosk(&kiosk_config());
        let controller = &kiosk.controller;
        controller.begin().unwrap();
        controller.submit_credential(&credential(7)).unwrap();

        assert!(controller.submit_biometric(poor_sample()).await.is_err());
        assert!(controller.submit_biometric(poor_sample()).await.is_err());
        let last = controller.submit_biometric(poor_sample()).await;

        assert_eq!(
            last.unwrap_err(),
            SessionError::Aborted(AbortReason::BiometricAttemptsExhausted)
        );
        assert_eq!(controller.snapshot().state, SessionStateKind::Aborted);
        assert_eq!(kiosk.ballot_box.count(), 0);

        let alerts: Vec<_> = kiosk
            .audit
            .snapshot()
            .into_iter()
            .filter(|e| e.severity == Severity::Alert)
            .collect();
        assert_eq!(alerts.len(), 1);
        assert_eq!(kiosk.controller.security_status(), SecurityStatus::Alert);
    }

    #[tokio::test]
    async fn test_out_of_order_action_changes_nothing() {
        let (kiosk, _clock) = wired_kiosk(&kiosk_config());
        let controller = &kiosk.controller;
        controller.begin().unwrap();

        let err = controller
            .select_candidate(&CandidateId::new("C002"))
            .unwrap_err();
        assert!(matches!(err, SessionError::StateError { .. }));
        assert_eq!(
            controller.snapshot().state,
            SessionStateKind::CredentialPending
        );
        assert!(kiosk.audit.is_empty());
    }

    #[tokio::test]
    async fn test_expired_session_frees_the_slot() {
        let (kiosk, clock) = wired_kiosk(&kiosk_config());
        let controller = &kiosk.controller;
        controller.begin().unwrap();
        controller.submit_credential(&credential(3)).unwrap();
        assert_eq!(controller.begin().unwrap_err(), SessionError::SessionBusy);

        clock.advance(301_000);
        assert!(controller.expire_stale());
        assert_eq!(controller.snapshot().abort_reason, Some(AbortReason::Expired));

        let warning = &kiosk.audit.recent(1)[0];
        assert_eq!(warning.severity, Severity::Warning);
        assert_eq!(warning.source, EventSource::Session);

        // Next voter proceeds normally.
        cast(&kiosk, 4, "C004").await;
        let stats = controller.stats();
        assert_eq!(stats.sessions_aborted, 1);
        assert_eq!(stats.sessions_completed, 1);
    }

    #[tokio::test]
    async fn test_empty_printer_falls_back_to_manual_receipt() {
        let mut config = kiosk_config();
        config.paper_capacity = 0;
        let (kiosk, _clock) = wired_kiosk(&config);
        let controller = &kiosk.controller;

        controller.begin().unwrap();
        controller.submit_credential(&credential(5)).unwrap();
        controller.submit_biometric(good_sample()).await.unwrap();
        controller.select_candidate(&CandidateId::new("C001")).unwrap();
        let receipt = controller.submit_vote().await.unwrap();

        assert!(!receipt.printed);
        assert!(receipt.manual_fallback);
        // The vote still counts.
        assert_eq!(kiosk.ballot_box.count(), 1);
        assert_eq!(
            kiosk.controller.component_status()[&EventSource::Printer],
            SecurityStatus::Warning
        );
    }
}
