//! # Session Controller
//!
//! Drives one voter session through identity verification, ballot selection
//! and sealing. Async steps follow a lock / await / re-lock pattern:
//!
//! 1. Under the slot lock: check the state, mark the session in flight and
//!    subscribe to its cancellation flag.
//! 2. Without the lock: await the port, racing it against cancellation.
//! 3. Under the slot lock again: confirm the same session is still there and
//!    not aborted, then publish the transition. Otherwise the result is
//!    dropped.

use crate::domain::{
    AbortReason, Action, CancelReason, ExportKeys, OperatorRegistry, SessionConfig,
    SessionCounters, SessionError, SessionPhase, SessionSnapshot, SessionStateKind, VoteReceipt,
    VoterSession,
};
use crate::ports::inbound::SessionControlApi;
use crate::ports::outbound::{Narrator, PrinterError, ReceiptPrinter};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_crypto::KioskRng;
use shared_types::{CandidateId, EventSource, NewSecurityEvent, SessionId, TimeSource};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};
use vk_01_identity_verification::{BiometricSample, IdentityVerificationApi};
use vk_02_ballot_registry::{BallotRegistry, SessionSalt};
use vk_03_vote_sealing::{BallotBox, VoteSealer};
use vk_04_audit_log::{AuditLogApi, SecurityStatusAggregator};

/// Collaborators of the controller.
pub struct SessionPorts {
    pub identity: Arc<dyn IdentityVerificationApi>,
    pub ballot: Arc<BallotRegistry>,
    pub sealer: Arc<dyn VoteSealer>,
    pub ballot_box: Arc<BallotBox>,
    pub audit: Arc<dyn AuditLogApi>,
    pub narrator: Arc<dyn Narrator>,
    pub printer: Arc<dyn ReceiptPrinter>,
    pub clock: Arc<dyn TimeSource>,
}

/// The kiosk session controller.
pub struct SessionController {
    pub(crate) config: SessionConfig,
    pub(crate) ports: SessionPorts,
    slot: Mutex<Option<VoterSession>>,
    pub(crate) rng: Mutex<KioskRng>,
    pub(crate) counters: SessionCounters,
    pub(crate) aggregator: SecurityStatusAggregator,
    pub(crate) operators: OperatorRegistry,
    pub(crate) export_keys: ExportKeys,
}

impl SessionController {
    /// Create a controller with an empty session slot.
    pub fn new(
        config: SessionConfig,
        ports: SessionPorts,
        rng: KioskRng,
        operators: OperatorRegistry,
        export_keys: ExportKeys,
    ) -> Self {
        let aggregator = SecurityStatusAggregator::new(Arc::clone(&ports.audit));
        Self {
            config,
            ports,
            slot: Mutex::new(None),
            rng: Mutex::new(rng),
            counters: SessionCounters::default(),
            aggregator,
            operators,
            export_keys,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Abort the active session for shutdown. Returns true if one was active.
    pub fn shutdown(&self) -> bool {
        let mut slot = self.slot.lock();
        match slot.as_mut() {
            Some(session) if !session.state().is_terminal() => {
                self.abort_locked(session, AbortReason::Shutdown, None);
                true
            }
            _ => false,
        }
    }

    fn snapshot_of(&self, session: &VoterSession) -> SessionSnapshot {
        SessionSnapshot::of(
            session,
            self.config.credential_retry_limit,
            self.config.biometric_retry_limit,
        )
    }

    /// Abort `session` and record why. No-op on terminal sessions.
    fn abort_locked(&self, session: &mut VoterSession, reason: AbortReason, detail: Option<&str>) {
        if !session.abort(reason) {
            return;
        }
        self.counters.record_aborted();

        let source = match reason {
            AbortReason::SealingFailed => EventSource::Sealer,
            AbortReason::CredentialAttemptsExhausted | AbortReason::BiometricAttemptsExhausted => {
                EventSource::Identity
            }
            AbortReason::OperatorCancelled => EventSource::Operator,
            AbortReason::VoterCancelled | AbortReason::Expired | AbortReason::Shutdown => {
                EventSource::Session
            }
        };
        let message = match detail {
            Some(detail) => format!("Session aborted: {reason} ({detail})"),
            None => format!("Session aborted: {reason}"),
        };
        let sequence = self
            .ports
            .audit
            .append(NewSecurityEvent::new(source, reason.severity(), message));

        warn!(session_id = %session.id(), %reason, sequence, "[vk-05] session aborted");
        self.ports
            .narrator
            .announce("This session has ended. Please ask a polling officer for assistance.");
    }

    /// Run `f` on the active session under the slot lock.
    ///
    /// Expired sessions are aborted first. A session with an operation in
    /// flight rejects everything except `abort`.
    fn with_session<R>(
        &self,
        action: Action,
        f: impl FnOnce(&mut VoterSession) -> Result<R, SessionError>,
    ) -> Result<R, SessionError> {
        let mut slot = self.slot.lock();
        let Some(session) = slot.as_mut() else {
            return Err(SessionError::StateError {
                action,
                state: SessionStateKind::Idle,
            });
        };
        if session.is_expired(self.ports.clock.now()) {
            self.abort_locked(session, AbortReason::Expired, None);
            return Err(SessionError::Aborted(AbortReason::Expired));
        }
        if session.in_flight() && !session.state().is_terminal() {
            return Err(SessionError::OperationInFlight);
        }
        f(session)
    }

    /// Re-acquire session `id` after an await and publish the result with `f`.
    fn settle<R>(
        &self,
        id: SessionId,
        f: impl FnOnce(&mut VoterSession) -> Result<R, SessionError>,
    ) -> Result<R, SessionError> {
        let mut slot = self.slot.lock();
        let Some(session) = slot.as_mut().filter(|s| s.id() == id) else {
            return Err(SessionError::SessionEnded);
        };
        session.set_in_flight(false);
        if session.is_expired(self.ports.clock.now()) {
            self.abort_locked(session, AbortReason::Expired, None);
        }
        if let SessionPhase::Aborted { reason } = session.phase() {
            debug!(session_id = %id, %reason, "[vk-05] discarding result of cancelled operation");
            return Err(SessionError::Aborted(*reason));
        }
        f(session)
    }

    fn fail_sealing(&self, session: &mut VoterSession, detail: &str) -> SessionError {
        error!(session_id = %session.id(), detail, "[vk-05] sealing failed");
        self.abort_locked(session, AbortReason::SealingFailed, Some(detail));
        SessionError::CryptoError(detail.to_string())
    }

    /// Print with bounded retries. Falls back to a manual receipt.
    async fn print_receipt(&self, mut receipt: VoteReceipt) -> VoteReceipt {
        let limit = self.config.printer_retry_limit.max(1);
        let mut last_error = None;

        for attempt in 1..=limit {
            let result = tokio::time::timeout(
                self.config.printer_timeout,
                self.ports.printer.print(&receipt),
            )
            .await
            .unwrap_or(Err(PrinterError::Timeout));

            match result {
                Ok(()) => {
                    receipt.printed = true;
                    break;
                }
                Err(e) => {
                    warn!(attempt, limit, error = %e, "[vk-05] receipt print failed");
                    last_error = Some(e);
                    if attempt < limit && !self.config.printer_retry_backoff.is_zero() {
                        tokio::time::sleep(self.config.printer_retry_backoff).await;
                    }
                }
            }
        }

        if !receipt.printed {
            receipt.manual_fallback = true;
            let detail = last_error.map(|e| e.to_string()).unwrap_or_default();
            self.ports.audit.append(NewSecurityEvent::warning(
                EventSource::Printer,
                format!(
                    "Receipt printing failed after {limit} attempts ({detail}); manual fallback for transaction {}",
                    receipt.transaction_id
                ),
            ));
            self.ports
                .narrator
                .announce("Please collect your receipt from the polling officer.");
        }
        receipt
    }

    fn store_receipt(&self, id: SessionId, receipt: &VoteReceipt) {
        let mut slot = self.slot.lock();
        if let Some(session) = slot.as_mut().filter(|s| s.id() == id) {
            if let SessionPhase::Completed { receipt: stored } = session.phase_mut() {
                *stored = receipt.clone();
            }
        }
    }
}

fn state_error(action: Action, session: &VoterSession) -> SessionError {
    debug!(session_id = %session.id(), %action, state = %session.state(), "[vk-05] action rejected");
    SessionError::StateError {
        action,
        state: session.state(),
    }
}

/// Resolves once the session's cancellation flag is set or the session is
/// dropped.
async fn cancelled(mut flag: watch::Receiver<bool>) {
    loop {
        if *flag.borrow_and_update() {
            return;
        }
        if flag.changed().await.is_err() {
            return;
        }
    }
}

#[async_trait]
impl SessionControlApi for SessionController {
    fn begin(&self) -> Result<SessionSnapshot, SessionError> {
        let now = self.ports.clock.now();
        let mut slot = self.slot.lock();

        if let Some(active) = slot.as_mut() {
            if active.is_expired(now) {
                self.abort_locked(active, AbortReason::Expired, None);
            }
            if !active.state().is_terminal() {
                debug!(session_id = %active.id(), "[vk-05] begin rejected, session active");
                return Err(SessionError::SessionBusy);
            }
        }

        let salt = SessionSalt::random(&mut *self.rng.lock());
        let ttl_ms = u64::try_from(self.config.session_ttl.as_millis()).unwrap_or(u64::MAX);
        let mut session = VoterSession::new(SessionId::generate(), salt, now, ttl_ms);
        session.advance(Action::Begin, SessionPhase::CredentialPending { attempts: 0 })?;
        self.counters.record_started();

        info!(session_id = %session.id(), state = ?session.state(), "[vk-05] session started");
        self.ports
            .narrator
            .announce("Welcome. Please enter your voter ID number.");

        let snapshot = self.snapshot_of(&session);
        *slot = Some(session);
        Ok(snapshot)
    }

    fn submit_credential(&self, raw: &str) -> Result<SessionSnapshot, SessionError> {
        let action = Action::SubmitCredential;
        self.with_session(action, |session| {
            let SessionPhase::CredentialPending { attempts } = *session.phase() else {
                return Err(state_error(action, session));
            };

            match self.ports.identity.verify_credential(raw) {
                Ok(claimed) => {
                    session.advance(action, SessionPhase::BiometricPending { claimed, attempts: 0 })?;
                    info!(session_id = %session.id(), state = ?session.state(), "[vk-05] credential accepted");
                    self.ports.narrator.announce(
                        "Please place your finger on the scanner or look into the iris camera.",
                    );
                    Ok(self.snapshot_of(session))
                }
                Err(e) => {
                    let attempts = attempts + 1;
                    let limit = self.config.credential_retry_limit;
                    if attempts >= limit {
                        self.abort_locked(
                            session,
                            AbortReason::CredentialAttemptsExhausted,
                            Some(e.label()),
                        );
                        return Err(SessionError::Aborted(
                            AbortReason::CredentialAttemptsExhausted,
                        ));
                    }

                    session.advance(action, SessionPhase::CredentialPending { attempts })?;
                    self.ports.audit.append(NewSecurityEvent::info(
                        EventSource::Identity,
                        format!("Credential rejected ({}), attempt {attempts} of {limit}", e.label()),
                    ));
                    self.ports
                        .narrator
                        .announce("That voter ID is not valid. Please try again.");
                    Err(SessionError::InputError(e.to_string()))
                }
            }
        })
    }

    async fn submit_biometric(
        &self,
        sample: BiometricSample,
    ) -> Result<SessionSnapshot, SessionError> {
        let action = Action::SubmitBiometric;
        let (id, claimed, cancel) = self.with_session(action, |session| {
            let SessionPhase::BiometricPending { claimed, .. } = session.phase() else {
                return Err(state_error(action, session));
            };
            let claimed = claimed.clone();
            session.set_in_flight(true);
            Ok((session.id(), claimed, session.cancellation()))
        })?;
        debug!(session_id = %id, method = %sample.method, "[vk-05] biometric capture started");

        let outcome = tokio::select! {
            result = self.ports.identity.verify_biometric(&claimed, &sample) => Some(result),
            _ = cancelled(cancel) => None,
        };

        self.settle(id, |session| {
            let result = outcome.ok_or(SessionError::SessionEnded)?;
            match result {
                Ok(confirmed) => {
                    session.advance(
                        action,
                        SessionPhase::Verified {
                            identity: confirmed.clone(),
                        },
                    )?;
                    info!(session_id = %id, state = ?session.state(), "[vk-05] identity verified");
                    session.advance(
                        action,
                        SessionPhase::BallotOpen {
                            identity: confirmed,
                            selection: None,
                        },
                    )?;
                    info!(session_id = %id, state = ?session.state(), "[vk-05] ballot open");
                    self.ports
                        .narrator
                        .announce("Identity verified. Please select your candidate.");
                    Ok(self.snapshot_of(session))
                }
                Err(e) => {
                    let SessionPhase::BiometricPending { attempts, .. } = session.phase_mut() else {
                        return Err(state_error(action, session));
                    };
                    *attempts += 1;
                    let attempts = *attempts;
                    let limit = self.config.biometric_retry_limit;

                    if attempts >= limit {
                        self.abort_locked(
                            session,
                            AbortReason::BiometricAttemptsExhausted,
                            Some(e.label()),
                        );
                        return Err(SessionError::Aborted(AbortReason::BiometricAttemptsExhausted));
                    }

                    self.ports.audit.append(NewSecurityEvent::info(
                        EventSource::Identity,
                        format!(
                            "Biometric verification failed ({}), attempt {attempts} of {limit}",
                            e.label()
                        ),
                    ));
                    self.ports
                        .narrator
                        .announce("Verification failed. Please try again.");
                    Err(SessionError::IdentityError(e))
                }
            }
        })
    }

    fn select_candidate(&self, candidate: &CandidateId) -> Result<SessionSnapshot, SessionError> {
        let action = Action::SelectCandidate;
        let now = self.ports.clock.now();
        self.with_session(action, |session| {
            let salt = session.session_salt();
            let SessionPhase::BallotOpen { selection, .. } = session.phase_mut() else {
                return Err(state_error(action, session));
            };

            match self.ports.ballot.select(salt, candidate, now) {
                Ok(record) => *selection = Some(record),
                Err(e) => {
                    self.ports.audit.append(NewSecurityEvent::info(
                        EventSource::Session,
                        "Selection of an unknown candidate rejected",
                    ));
                    return Err(SessionError::InputError(e.to_string()));
                }
            }

            debug!(session_id = %session.id(), "[vk-05] candidate selected");
            Ok(self.snapshot_of(session))
        })
    }

    async fn submit_vote(&self) -> Result<VoteReceipt, SessionError> {
        let action = Action::SubmitVote;
        let (id, record, cancel) = self.with_session(action, |session| {
            let SessionPhase::BallotOpen {
                selection: Some(record),
                ..
            } = session.phase()
            else {
                return Err(state_error(action, session));
            };
            let record = record.clone();
            // Entering Sealing drops the identity.
            session.advance(
                action,
                SessionPhase::Sealing {
                    record: record.clone(),
                },
            )?;
            session.set_in_flight(true);
            info!(session_id = %session.id(), state = ?session.state(), "[vk-05] sealing vote");
            Ok((session.id(), record, session.cancellation()))
        })?;
        self.ports
            .narrator
            .announce("Recording your vote. Please wait.");

        let outcome = tokio::select! {
            result = tokio::time::timeout(self.config.seal_timeout, self.ports.sealer.seal(&record)) => Some(result),
            _ = cancelled(cancel) => None,
        };

        let receipt = self.settle(id, |session| {
            let sealed = match outcome {
                None => return Err(SessionError::SessionEnded),
                Some(Ok(Ok(sealed))) => sealed,
                Some(Ok(Err(e))) => return Err(self.fail_sealing(session, &e.to_string())),
                Some(Err(_)) => {
                    let detail = format!("sealing timed out after {:?}", self.config.seal_timeout);
                    return Err(self.fail_sealing(session, &detail));
                }
            };

            if session.state() != SessionStateKind::Sealing || session.is_consumed() {
                return Err(state_error(action, session));
            }
            if !self.ports.sealer.verify(&sealed) {
                return Err(self.fail_sealing(session, "sealed vote failed verification"));
            }
            if let Err(e) = self.ports.ballot_box.record(sealed.clone()) {
                return Err(self.fail_sealing(session, &e.to_string()));
            }

            let receipt = VoteReceipt::for_sealed(&sealed, &self.config.station_id);
            session.advance(
                action,
                SessionPhase::Completed {
                    receipt: receipt.clone(),
                },
            )?;
            self.counters.record_completed();
            self.ports.audit.append(NewSecurityEvent::info(
                EventSource::Sealer,
                format!("Vote sealed, transaction {}", receipt.transaction_id),
            ));
            info!(
                session_id = %id,
                transaction_id = %receipt.transaction_id,
                state = ?session.state(),
                "[vk-05] vote recorded"
            );
            Ok(receipt)
        })?;

        let receipt = self.print_receipt(receipt).await;
        self.store_receipt(id, &receipt);
        self.ports
            .narrator
            .announce("Thank you. Your vote has been recorded.");
        Ok(receipt)
    }

    fn abort(&self, reason: CancelReason) -> Result<SessionSnapshot, SessionError> {
        let mut slot = self.slot.lock();
        let Some(session) = slot.as_mut() else {
            return Err(SessionError::StateError {
                action: Action::Abort,
                state: SessionStateKind::Idle,
            });
        };
        if session.state().is_terminal() {
            return Err(state_error(Action::Abort, session));
        }
        self.abort_locked(session, reason.into(), None);
        Ok(self.snapshot_of(session))
    }

    fn snapshot(&self) -> SessionSnapshot {
        self.slot
            .lock()
            .as_ref()
            .map_or_else(SessionSnapshot::idle, |s| self.snapshot_of(s))
    }

    fn expire_stale(&self) -> bool {
        let now = self.ports.clock.now();
        let mut slot = self.slot.lock();
        match slot.as_mut() {
            Some(session) if session.is_expired(now) => {
                self.abort_locked(session, AbortReason::Expired, None);
                true
            }
            _ => false,
        }
    }
}

/// Sweep for expired sessions every `expiry_sweep_interval` until shutdown.
///
/// Returns the number of sessions expired.
pub async fn run_expiry_watchdog(
    controller: Arc<SessionController>,
    mut shutdown: watch::Receiver<bool>,
) -> u64 {
    let period = controller
        .config
        .expiry_sweep_interval
        .max(Duration::from_millis(10));
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut expired = 0u64;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if controller.expire_stale() {
                    expired += 1;
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    info!("[vk-05] Shutdown signal received");
                    break;
                }
            }
        }
    }
    expired
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_crypto::CryptoError;
    use shared_types::{ManualClock, SecurityStatus, Severity};
    use std::sync::atomic::{AtomicU32, Ordering};
    use vk_01_identity_verification::{
        BiometricMatcher, BiometricMethod, CredentialHash, IdentityConfig, IdentityVerifier,
        MatchOutcome, QualityThresholdMatcher,
    };
    use vk_02_ballot_registry::VoteRecord;
    use vk_03_vote_sealing::{SealError, SealedVote, SealingConfig, StandardVoteSealer};
    use vk_04_audit_log::AuditLog;

    const CREDENTIAL: &str = "123456789012";

    #[derive(Default)]
    struct RecordingNarrator {
        lines: Mutex<Vec<String>>,
    }

    impl Narrator for RecordingNarrator {
        fn announce(&self, message: &str) {
            self.lines.lock().push(message.to_string());
        }
    }

    /// Fails the first `failures` prints.
    #[derive(Default)]
    struct FlakyPrinter {
        failures: AtomicU32,
        printed: Mutex<Vec<VoteReceipt>>,
    }

    impl FlakyPrinter {
        fn failing(failures: u32) -> Self {
            Self {
                failures: AtomicU32::new(failures),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl ReceiptPrinter for FlakyPrinter {
        async fn print(&self, receipt: &VoteReceipt) -> Result<(), PrinterError> {
            if self.failures.load(Ordering::SeqCst) > 0 {
                self.failures.fetch_sub(1, Ordering::SeqCst);
                return Err(PrinterError::PaperOut);
            }
            self.printed.lock().push(receipt.clone());
            Ok(())
        }
    }

    struct FailingSealer;

    #[async_trait]
    impl VoteSealer for FailingSealer {
        async fn seal(&self, _record: &VoteRecord) -> Result<SealedVote, SealError> {
            Err(SealError::Crypto(CryptoError::EncryptionFailed(
                "key store unavailable".into(),
            )))
        }

        fn verify(&self, _sealed: &SealedVote) -> bool {
            false
        }
    }

    struct StalledSealer;

    #[async_trait]
    impl VoteSealer for StalledSealer {
        async fn seal(&self, _record: &VoteRecord) -> Result<SealedVote, SealError> {
            std::future::pending().await
        }

        fn verify(&self, _sealed: &SealedVote) -> bool {
            false
        }
    }

    struct StalledMatcher;

    #[async_trait]
    impl BiometricMatcher for StalledMatcher {
        async fn matches(&self, _hash: &CredentialHash, _sample: &BiometricSample) -> MatchOutcome {
            std::future::pending().await
        }
    }

    enum SealerKind {
        Standard,
        Failing,
        Stalled,
    }

    struct Harness {
        controller: Arc<SessionController>,
        audit: Arc<AuditLog>,
        clock: Arc<ManualClock>,
        ballot_box: Arc<BallotBox>,
        printer: Arc<FlakyPrinter>,
        narrator: Arc<RecordingNarrator>,
        standard: Arc<StandardVoteSealer>,
    }

    impl Harness {
        fn severities(&self) -> Vec<Severity> {
            self.audit.snapshot().iter().map(|e| e.severity).collect()
        }

        fn state(&self) -> SessionStateKind {
            self.controller.snapshot().state
        }

        async fn open_ballot(&self) {
            self.controller.begin().unwrap();
            self.controller.submit_credential(CREDENTIAL).unwrap();
            self.controller.submit_biometric(good_sample()).await.unwrap();
        }
    }

    fn sealing_config() -> SealingConfig {
        SealingConfig {
            sealing_secret: [0x42; 32],
        }
    }

    fn test_config() -> SessionConfig {
        SessionConfig {
            printer_retry_backoff: Duration::ZERO,
            ..Default::default()
        }
    }

    fn good_sample() -> BiometricSample {
        BiometricSample::new(BiometricMethod::Fingerprint, vec![200; 32])
    }

    fn bad_sample() -> BiometricSample {
        BiometricSample::new(BiometricMethod::Iris, vec![10; 32])
    }

    fn build<M: BiometricMatcher + 'static>(
        matcher: M,
        sealer: SealerKind,
        printer: FlakyPrinter,
        config: SessionConfig,
    ) -> Harness {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let audit = Arc::new(AuditLog::new(clock.clone()));
        let ballot_box = Arc::new(BallotBox::new());
        let printer = Arc::new(printer);
        let narrator = Arc::new(RecordingNarrator::default());
        let standard = Arc::new(StandardVoteSealer::new(
            &sealing_config(),
            KioskRng::seeded(3),
            clock.clone(),
        ));
        let sealer: Arc<dyn VoteSealer> = match sealer {
            SealerKind::Standard => standard.clone() as Arc<dyn VoteSealer>,
            SealerKind::Failing => Arc::new(FailingSealer),
            SealerKind::Stalled => Arc::new(StalledSealer),
        };
        let identity = Arc::new(IdentityVerifier::new(
            IdentityConfig {
                capture_timeout: Duration::from_secs(60),
                ..Default::default()
            },
            matcher,
            clock.clone(),
        ));

        let mut operators = OperatorRegistry::for_station(&sealing_config());
        operators.register("op-alpha", "4821");
        operators.register("op-bravo", "7310");

        let controller = Arc::new(SessionController::new(
            config,
            SessionPorts {
                identity,
                ballot: Arc::new(BallotRegistry::demo_sitting()),
                sealer,
                ballot_box: ballot_box.clone(),
                audit: audit.clone(),
                narrator: narrator.clone(),
                printer: printer.clone(),
                clock: clock.clone(),
            },
            KioskRng::seeded(7),
            operators,
            ExportKeys::for_station(&sealing_config()),
        ));

        Harness {
            controller,
            audit,
            clock,
            ballot_box,
            printer,
            narrator,
            standard,
        }
    }

    fn harness() -> Harness {
        build(
            QualityThresholdMatcher::default(),
            SealerKind::Standard,
            FlakyPrinter::default(),
            test_config(),
        )
    }

    async fn wait_for_in_flight(controller: &SessionController) {
        while !controller.snapshot().operation_in_flight {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_happy_path_completes_with_one_info_event() {
        let h = harness();
        h.open_ballot().await;
        assert_eq!(h.state(), SessionStateKind::BallotOpen);

        h.controller.select_candidate(&"C002".into()).unwrap();
        let receipt = h.controller.submit_vote().await.unwrap();

        assert!(!receipt.transaction_id.as_str().is_empty());
        assert!(receipt.printed);
        assert!(!receipt.manual_fallback);

        let snap = h.controller.snapshot();
        assert_eq!(snap.state, SessionStateKind::Completed);
        assert!(snap.consumed);
        assert_eq!(snap.receipt, Some(receipt.clone()));

        assert_eq!(h.severities(), vec![Severity::Info]);
        assert_eq!(h.ballot_box.count(), 1);
        assert_eq!(h.printer.printed.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_sealed_vote_carries_only_the_record() {
        let h = harness();
        h.open_ballot().await;
        h.controller.select_candidate(&"C002".into()).unwrap();
        let receipt = h.controller.submit_vote().await.unwrap();

        let sealed = h.ballot_box.snapshot().remove(0);
        let record = h.standard.unseal(&sealed).unwrap();
        assert_eq!(record.candidate_id.as_str(), "C002");

        let json = serde_json::to_value(&record).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["candidate_id", "session_salt", "timestamp"]);

        let receipt_json = serde_json::to_string(&receipt).unwrap();
        assert!(!receipt_json.contains(CREDENTIAL));
    }

    #[tokio::test]
    async fn test_biometric_failures_abort_after_bound() {
        let h = harness();
        h.controller.begin().unwrap();
        h.controller.submit_credential(CREDENTIAL).unwrap();

        for _ in 0..2 {
            let err = h.controller.submit_biometric(bad_sample()).await.unwrap_err();
            assert!(matches!(err, SessionError::IdentityError(_)));
            assert_eq!(h.state(), SessionStateKind::BiometricPending);
        }
        let err = h.controller.submit_biometric(bad_sample()).await.unwrap_err();
        assert_eq!(
            err,
            SessionError::Aborted(AbortReason::BiometricAttemptsExhausted)
        );

        assert_eq!(h.state(), SessionStateKind::Aborted);
        assert_eq!(
            h.severities(),
            vec![Severity::Info, Severity::Info, Severity::Alert]
        );
        assert_eq!(h.ballot_box.count(), 0);
    }

    #[tokio::test]
    async fn test_attempts_remaining_counts_down() {
        let h = harness();
        h.controller.begin().unwrap();
        h.controller.submit_credential(CREDENTIAL).unwrap();
        assert_eq!(h.controller.snapshot().attempts_remaining, Some(3));
        let _ = h.controller.submit_biometric(bad_sample()).await;
        assert_eq!(h.controller.snapshot().attempts_remaining, Some(2));
    }

    #[tokio::test]
    async fn test_select_while_credential_pending_is_state_error() {
        let h = harness();
        h.controller.begin().unwrap();
        let before = h.controller.snapshot();

        let err = h.controller.select_candidate(&"C002".into()).unwrap_err();
        assert_eq!(
            err,
            SessionError::StateError {
                action: Action::SelectCandidate,
                state: SessionStateKind::CredentialPending
            }
        );
        assert_eq!(h.controller.snapshot(), before);
        assert!(h.audit.is_empty());
    }

    #[tokio::test]
    async fn test_sealing_failure_aborts_with_alert() {
        let h = build(
            QualityThresholdMatcher::default(),
            SealerKind::Failing,
            FlakyPrinter::default(),
            test_config(),
        );
        h.open_ballot().await;
        h.controller.select_candidate(&"C001".into()).unwrap();

        let err = h.controller.submit_vote().await.unwrap_err();
        assert!(matches!(err, SessionError::CryptoError(_)));

        let snap = h.controller.snapshot();
        assert_eq!(snap.state, SessionStateKind::Aborted);
        assert_eq!(snap.abort_reason, Some(AbortReason::SealingFailed));
        assert!(!snap.consumed);
        assert_eq!(h.severities(), vec![Severity::Alert]);
        assert_eq!(h.ballot_box.count(), 0);
        assert!(h.printer.printed.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sealing_timeout_aborts_with_alert() {
        let h = build(
            QualityThresholdMatcher::default(),
            SealerKind::Stalled,
            FlakyPrinter::default(),
            test_config(),
        );
        h.open_ballot().await;
        h.controller.select_candidate(&"C003".into()).unwrap();

        let err = h.controller.submit_vote().await.unwrap_err();
        assert!(matches!(err, SessionError::CryptoError(ref d) if d.contains("timed out")));
        assert_eq!(h.state(), SessionStateKind::Aborted);
        assert_eq!(h.severities(), vec![Severity::Alert]);
        assert_eq!(h.ballot_box.count(), 0);
    }

    #[tokio::test]
    async fn test_begin_while_active_is_busy() {
        let h = harness();
        h.controller.begin().unwrap();
        assert_eq!(h.controller.begin(), Err(SessionError::SessionBusy));
        assert!(h.audit.is_empty());

        h.controller.abort(CancelReason::VoterCancelled).unwrap();
        assert!(h.controller.begin().is_ok());
    }

    #[tokio::test]
    async fn test_malformed_credential_is_input_error() {
        let h = harness();
        h.controller.begin().unwrap();

        let err = h.controller.submit_credential("1234").unwrap_err();
        assert!(matches!(err, SessionError::InputError(_)));
        assert_eq!(h.state(), SessionStateKind::CredentialPending);
        assert_eq!(h.severities(), vec![Severity::Info]);

        assert!(h.controller.submit_credential("1234 5678 9012").is_ok());
        assert_eq!(h.state(), SessionStateKind::BiometricPending);
    }

    #[tokio::test]
    async fn test_credential_attempts_exhausted() {
        let h = harness();
        h.controller.begin().unwrap();
        let _ = h.controller.submit_credential("abc");
        let _ = h.controller.submit_credential("12");
        let err = h.controller.submit_credential("").unwrap_err();

        assert_eq!(
            err,
            SessionError::Aborted(AbortReason::CredentialAttemptsExhausted)
        );
        assert_eq!(
            h.severities(),
            vec![Severity::Info, Severity::Info, Severity::Alert]
        );
    }

    #[tokio::test]
    async fn test_reselection_keeps_last_choice_without_events() {
        let h = harness();
        h.open_ballot().await;
        h.controller.select_candidate(&"C001".into()).unwrap();
        h.controller.select_candidate(&"C004".into()).unwrap();
        let snap = h.controller.select_candidate(&"C003".into()).unwrap();
        assert_eq!(snap.selected_candidate, Some("C003".into()));
        assert!(h.audit.is_empty());

        h.controller.submit_vote().await.unwrap();
        let record = h.standard.unseal(&h.ballot_box.snapshot()[0]).unwrap();
        assert_eq!(record.candidate_id.as_str(), "C003");
    }

    #[tokio::test]
    async fn test_unknown_candidate_is_input_error() {
        let h = harness();
        h.open_ballot().await;
        let err = h.controller.select_candidate(&"C999".into()).unwrap_err();
        assert!(matches!(err, SessionError::InputError(_)));
        assert_eq!(h.state(), SessionStateKind::BallotOpen);
        assert_eq!(h.severities(), vec![Severity::Info]);
    }

    #[tokio::test]
    async fn test_submit_without_selection_is_state_error() {
        let h = harness();
        h.open_ballot().await;
        let err = h.controller.submit_vote().await.unwrap_err();
        assert_eq!(
            err,
            SessionError::StateError {
                action: Action::SubmitVote,
                state: SessionStateKind::BallotOpen
            }
        );
        assert_eq!(h.state(), SessionStateKind::BallotOpen);
    }

    #[tokio::test]
    async fn test_second_vote_is_rejected() {
        let h = harness();
        h.open_ballot().await;
        h.controller.select_candidate(&"C002".into()).unwrap();
        h.controller.submit_vote().await.unwrap();

        let err = h.controller.submit_vote().await.unwrap_err();
        assert_eq!(
            err,
            SessionError::StateError {
                action: Action::SubmitVote,
                state: SessionStateKind::Completed
            }
        );
        assert_eq!(h.ballot_box.count(), 1);
    }

    #[tokio::test]
    async fn test_abort_records_warning_and_releases_slot() {
        let h = harness();
        h.open_ballot().await;
        let snap = h.controller.abort(CancelReason::VoterCancelled).unwrap();
        assert_eq!(snap.state, SessionStateKind::Aborted);
        assert_eq!(snap.allowed_actions, vec![Action::Begin]);
        assert_eq!(h.severities(), vec![Severity::Warning]);

        assert!(matches!(
            h.controller.abort(CancelReason::VoterCancelled),
            Err(SessionError::StateError { .. })
        ));
        assert!(h.controller.begin().is_ok());
    }

    #[tokio::test]
    async fn test_abort_without_session_is_state_error() {
        let h = harness();
        assert_eq!(
            h.controller.abort(CancelReason::OperatorCancelled),
            Err(SessionError::StateError {
                action: Action::Abort,
                state: SessionStateKind::Idle
            })
        );
    }

    #[tokio::test]
    async fn test_expire_stale() {
        let h = harness();
        h.controller.begin().unwrap();
        assert!(!h.controller.expire_stale());

        h.clock.advance(300_000);
        assert!(h.controller.expire_stale());
        let snap = h.controller.snapshot();
        assert_eq!(snap.state, SessionStateKind::Aborted);
        assert_eq!(snap.abort_reason, Some(AbortReason::Expired));
        assert_eq!(h.severities(), vec![Severity::Warning]);
        assert!(!h.controller.expire_stale());
    }

    #[tokio::test]
    async fn test_expired_session_aborts_on_next_action() {
        let h = harness();
        h.controller.begin().unwrap();
        h.clock.advance(301_000);
        assert_eq!(
            h.controller.submit_credential(CREDENTIAL),
            Err(SessionError::Aborted(AbortReason::Expired))
        );
        assert_eq!(h.state(), SessionStateKind::Aborted);
    }

    #[tokio::test]
    async fn test_abort_cancels_biometric_capture() {
        let h = build(
            StalledMatcher,
            SealerKind::Standard,
            FlakyPrinter::default(),
            test_config(),
        );
        h.controller.begin().unwrap();
        h.controller.submit_credential(CREDENTIAL).unwrap();

        let controller = h.controller.clone();
        let capture = tokio::spawn(async move { controller.submit_biometric(good_sample()).await });
        wait_for_in_flight(&h.controller).await;

        assert_eq!(
            h.controller.submit_biometric(good_sample()).await,
            Err(SessionError::OperationInFlight)
        );

        h.controller.abort(CancelReason::VoterCancelled).unwrap();
        let result = capture.await.unwrap();
        assert_eq!(
            result,
            Err(SessionError::Aborted(AbortReason::VoterCancelled))
        );
        assert_eq!(h.state(), SessionStateKind::Aborted);
        assert_eq!(h.severities(), vec![Severity::Warning]);
    }

    #[tokio::test]
    async fn test_abort_during_sealing_discards_vote() {
        let h = build(
            QualityThresholdMatcher::default(),
            SealerKind::Stalled,
            FlakyPrinter::default(),
            SessionConfig {
                seal_timeout: Duration::from_secs(3600),
                ..test_config()
            },
        );
        h.open_ballot().await;
        h.controller.select_candidate(&"C002".into()).unwrap();

        let controller = h.controller.clone();
        let vote = tokio::spawn(async move { controller.submit_vote().await });
        wait_for_in_flight(&h.controller).await;
        assert_eq!(h.state(), SessionStateKind::Sealing);

        h.controller.abort(CancelReason::OperatorCancelled).unwrap();
        assert_eq!(
            vote.await.unwrap(),
            Err(SessionError::Aborted(AbortReason::OperatorCancelled))
        );
        assert_eq!(h.ballot_box.count(), 0);
        assert!(!h.controller.snapshot().consumed);
    }

    #[tokio::test]
    async fn test_cancel_reasons_always_record_one_warning() {
        for (cancel, source) in [
            (CancelReason::VoterCancelled, EventSource::Session),
            (CancelReason::OperatorCancelled, EventSource::Operator),
        ] {
            let h = harness();
            h.open_ballot().await;
            h.controller.select_candidate(&"C001".into()).unwrap();

            let snap = h.controller.abort(cancel).unwrap();
            assert_eq!(snap.abort_reason, Some(AbortReason::from(cancel)));
            assert_eq!(h.severities(), vec![Severity::Warning]);

            let events = h.audit.snapshot();
            assert_eq!(events[0].source, source);
            assert!(events[0].message.contains(&cancel.to_string()));
            assert_eq!(h.controller.aggregator.status(), SecurityStatus::Warning);
        }
    }

    #[tokio::test]
    async fn test_expiry_cancels_biometric_capture() {
        let h = build(
            StalledMatcher,
            SealerKind::Standard,
            FlakyPrinter::default(),
            test_config(),
        );
        h.controller.begin().unwrap();
        h.controller.submit_credential(CREDENTIAL).unwrap();

        let controller = h.controller.clone();
        let capture = tokio::spawn(async move { controller.submit_biometric(good_sample()).await });
        wait_for_in_flight(&h.controller).await;

        h.clock.advance(300_001);
        assert!(h.controller.expire_stale());
        assert_eq!(
            capture.await.unwrap(),
            Err(SessionError::Aborted(AbortReason::Expired))
        );

        let snap = h.controller.snapshot();
        assert_eq!(snap.state, SessionStateKind::Aborted);
        assert!(!snap.consumed);
        assert_eq!(h.severities(), vec![Severity::Warning]);
        assert_eq!(h.ballot_box.count(), 0);
    }

    #[tokio::test]
    async fn test_expiry_during_sealing_discards_vote() {
        let h = build(
            QualityThresholdMatcher::default(),
            SealerKind::Stalled,
            FlakyPrinter::default(),
            SessionConfig {
                seal_timeout: Duration::from_secs(3600),
                ..test_config()
            },
        );
        h.open_ballot().await;
        h.controller.select_candidate(&"C003".into()).unwrap();

        let controller = h.controller.clone();
        let vote = tokio::spawn(async move { controller.submit_vote().await });
        wait_for_in_flight(&h.controller).await;
        assert_eq!(h.state(), SessionStateKind::Sealing);

        h.clock.advance(300_001);
        assert!(h.controller.expire_stale());
        assert_eq!(
            vote.await.unwrap(),
            Err(SessionError::Aborted(AbortReason::Expired))
        );

        assert_eq!(h.ballot_box.count(), 0);
        assert!(!h.controller.snapshot().consumed);
        assert_eq!(h.severities(), vec![Severity::Warning]);
        assert!(h.printer.printed.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_watchdog_interrupts_stalled_seal() {
        let h = build(
            QualityThresholdMatcher::default(),
            SealerKind::Stalled,
            FlakyPrinter::default(),
            SessionConfig {
                seal_timeout: Duration::from_secs(3600),
                ..test_config()
            },
        );
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let watchdog = tokio::spawn(run_expiry_watchdog(h.controller.clone(), shutdown_rx));

        h.open_ballot().await;
        h.controller.select_candidate(&"C002".into()).unwrap();
        let controller = h.controller.clone();
        let vote = tokio::spawn(async move { controller.submit_vote().await });
        wait_for_in_flight(&h.controller).await;

        h.clock.advance(300_001);
        assert_eq!(
            vote.await.unwrap(),
            Err(SessionError::Aborted(AbortReason::Expired))
        );
        assert_eq!(h.ballot_box.count(), 0);
        assert!(!h.controller.snapshot().consumed);
        assert_eq!(h.severities(), vec![Severity::Warning]);

        shutdown_tx.send(true).unwrap();
        assert_eq!(watchdog.await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_printer_failure_falls_back_to_manual_receipt() {
        let h = build(
            QualityThresholdMatcher::default(),
            SealerKind::Standard,
            FlakyPrinter::failing(10),
            test_config(),
        );
        h.open_ballot().await;
        h.controller.select_candidate(&"C002".into()).unwrap();
        let receipt = h.controller.submit_vote().await.unwrap();

        assert!(!receipt.printed);
        assert!(receipt.manual_fallback);
        assert_eq!(h.state(), SessionStateKind::Completed);
        assert_eq!(h.controller.snapshot().receipt, Some(receipt));
        assert_eq!(h.severities(), vec![Severity::Info, Severity::Warning]);
        assert_eq!(h.ballot_box.count(), 1);
    }

    #[tokio::test]
    async fn test_printer_recovers_within_retry_bound() {
        let h = build(
            QualityThresholdMatcher::default(),
            SealerKind::Standard,
            FlakyPrinter::failing(2),
            test_config(),
        );
        h.open_ballot().await;
        h.controller.select_candidate(&"C002".into()).unwrap();
        let receipt = h.controller.submit_vote().await.unwrap();

        assert!(receipt.printed);
        assert!(!receipt.manual_fallback);
        assert_eq!(h.severities(), vec![Severity::Info]);
    }

    #[tokio::test]
    async fn test_narration_follows_the_flow() {
        let h = harness();
        h.open_ballot().await;
        let lines = h.narrator.lines.lock().clone();
        assert!(lines[0].starts_with("Welcome"));
        assert!(lines.last().is_some_and(|l| l.contains("select your candidate")));
    }

    #[tokio::test]
    async fn test_shutdown_aborts_active_session() {
        let h = harness();
        assert!(!h.controller.shutdown());
        h.controller.begin().unwrap();
        assert!(h.controller.shutdown());
        assert_eq!(
            h.controller.snapshot().abort_reason,
            Some(AbortReason::Shutdown)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_watchdog() {
        let h = harness();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let watchdog = tokio::spawn(run_expiry_watchdog(h.controller.clone(), shutdown_rx));

        h.controller.begin().unwrap();
        h.clock.advance(300_001);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(h.state(), SessionStateKind::Aborted);

        shutdown_tx.send(true).unwrap();
        assert_eq!(watchdog.await.unwrap(), 1);
    }
}
