//! # Subsystem Container
//!
//! Builds every subsystem from a [`KioskConfig`] and owns the shared
//! handles. Construction order follows the dependency graph:
//!
//! 1. Clock, audit log, ballot box
//! 2. Identity verifier, ballot registry, vote sealer
//! 3. Device adapters
//! 4. Session controller

pub mod config;

use crate::adapters::{LogReceiptPrinter, TracingNarrator};
use anyhow::{Context, Result};
use config::KioskConfig;
use shared_crypto::KioskRng;
use shared_types::{SystemTimeSource, TimeSource};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::info;
use vk_01_identity_verification::{IdentityVerifier, QualityThresholdMatcher};
use vk_02_ballot_registry::BallotRegistry;
use vk_03_vote_sealing::{BallotBox, StandardVoteSealer};
use vk_04_audit_log::{run_hardware_ingest, AuditLog, HardwareSignal};
use vk_05_session_control::{
    run_expiry_watchdog, ExportKeys, OperatorRegistry, SessionController, SessionPorts,
};

/// Fully wired kiosk.
pub struct KioskContainer {
    /// Session controller (voter flow and operator reporting).
    pub controller: Arc<SessionController>,
    /// Append-only audit log.
    pub audit: Arc<AuditLog>,
    /// Sealed votes.
    pub ballot_box: Arc<BallotBox>,
    /// Receipt printer.
    pub printer: Arc<LogReceiptPrinter>,
    hardware_tx: mpsc::Sender<HardwareSignal>,
    hardware_rx: Option<mpsc::Receiver<HardwareSignal>>,
}

impl KioskContainer {
    /// Build on the system clock.
    pub fn build(config: &KioskConfig) -> Result<Self> {
        Self::build_with_clock(config, Arc::new(SystemTimeSource))
    }

    /// Build on an injected clock.
    pub fn build_with_clock(config: &KioskConfig, clock: Arc<dyn TimeSource>) -> Result<Self> {
        let ballot = match &config.ballot_file {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading ballot file {}", path.display()))?;
                BallotRegistry::from_json(&json)
                    .with_context(|| format!("parsing ballot file {}", path.display()))?
            }
            None => BallotRegistry::demo_sitting(),
        };
        info!(candidates = ballot.len(), "[kiosk] Ballot loaded");

        // Sealer and controller draw from independent streams.
        let rng = |stream: u64| match config.rng_seed {
            Some(seed) => KioskRng::seeded(seed.wrapping_add(stream)),
            None => KioskRng::from_entropy(),
        };

        let audit = Arc::new(AuditLog::new(Arc::clone(&clock)));
        let ballot_box = Arc::new(BallotBox::new());
        let identity = Arc::new(IdentityVerifier::new(
            config.identity.clone(),
            QualityThresholdMatcher::default(),
            Arc::clone(&clock),
        ));
        let sealer = Arc::new(StandardVoteSealer::new(
            &config.sealing,
            rng(0),
            Arc::clone(&clock),
        ));

        let (hardware_tx, hardware_rx) = mpsc::channel(config.hardware_channel_capacity.max(1));
        let printer = Arc::new(LogReceiptPrinter::new(
            config.paper_capacity,
            hardware_tx.clone(),
        ));

        let mut operators = OperatorRegistry::for_station(&config.sealing);
        for (id, pin) in &config.operators {
            operators.register(id.as_str(), pin);
        }

        let controller = Arc::new(SessionController::new(
            config.session.clone(),
            SessionPorts {
                identity,
                ballot: Arc::new(ballot),
                sealer,
                ballot_box: Arc::clone(&ballot_box),
                audit: audit.clone(),
                narrator: Arc::new(TracingNarrator),
                printer: printer.clone(),
                clock,
            },
            rng(1),
            operators,
            ExportKeys::for_station(&config.sealing),
        ));

        info!(
            station = %config.session.station_id,
            operators = config.operators.len(),
            "[kiosk] Subsystems wired"
        );

        Ok(Self {
            controller,
            audit,
            ballot_box,
            printer,
            hardware_tx,
            hardware_rx: Some(hardware_rx),
        })
    }

    /// Sender for hardware sensors.
    pub fn hardware_sender(&self) -> mpsc::Sender<HardwareSignal> {
        self.hardware_tx.clone()
    }

    /// Spawn the expiry watchdog and hardware ingest loop.
    ///
    /// Returns an empty list if already started.
    pub fn start(&mut self, shutdown: watch::Receiver<bool>) -> Vec<JoinHandle<u64>> {
        let Some(hardware_rx) = self.hardware_rx.take() else {
            return Vec::new();
        };

        let watchdog = tokio::spawn(run_expiry_watchdog(
            Arc::clone(&self.controller),
            shutdown.clone(),
        ));
        let ingest = tokio::spawn(run_hardware_ingest(
            self.audit.clone(),
            hardware_rx,
            shutdown,
        ));
        info!("[kiosk] Background tasks started");
        vec![watchdog, ingest]
    }
}
