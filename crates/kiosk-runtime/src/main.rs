//! # VoteSafe Kiosk
//!
//! Entry point for an offline voting station.
//!
//! ## Usage
//!
//! ```bash
//! VK_SEALING_SECRET=<64 hex> VK_OPERATORS=op-alpha:4821,op-bravo:7310 kiosk-runtime
//! VK_DEV_MODE=1 kiosk-runtime
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use kiosk_runtime::{load_config, KioskConfig, KioskContainer};
use vk_04_audit_log::HardwareSignal;
use vk_05_session_control::AdminReportingApi;

/// Grace period for background tasks after the shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// The kiosk process.
pub struct KioskRuntime {
    container: KioskContainer,
    tasks: Vec<JoinHandle<u64>>,
    shutdown_tx: watch::Sender<bool>,
}

impl KioskRuntime {
    /// Wire the subsystems.
    pub fn new(config: &KioskConfig) -> Result<Self> {
        info!("Creating VoteSafe kiosk runtime");
        let container = KioskContainer::build(config)?;
        let (shutdown_tx, _) = watch::channel(false);
        Ok(Self {
            container,
            tasks: Vec::new(),
            shutdown_tx,
        })
    }

    /// Start background tasks and record the startup health check.
    pub async fn start(&mut self) -> Result<()> {
        info!("===========================================");
        info!("  VoteSafe Kiosk v{}", env!("CARGO_PKG_VERSION"));
        info!("  Station: {}", self.container.controller.config().station_id);
        info!("===========================================");

        self.tasks = self.container.start(self.shutdown_tx.subscribe());
        self.container
            .hardware_sender()
            .send(HardwareSignal::HealthCheckPassed)
            .await
            .context("hardware channel closed during startup")?;

        info!(
            "Security status: {}",
            self.container.controller.security_status()
        );
        Ok(())
    }

    /// Shutdown sequence:
    ///
    /// 1. Abort any live session
    /// 2. Signal the background tasks
    /// 3. Wait for them (bounded)
    pub async fn shutdown(self) {
        info!("Initiating graceful shutdown...");

        if self.container.controller.shutdown() {
            warn!("Active voter session aborted by shutdown");
        }

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        for task in self.tasks {
            match tokio::time::timeout(SHUTDOWN_GRACE, task).await {
                Ok(Ok(count)) => info!(count, "Background task stopped"),
                Ok(Err(e)) => error!("Background task failed: {}", e),
                Err(_) => warn!("Background task did not stop in time"),
            }
        }

        let stats = self.container.controller.stats();
        info!(
            votes = stats.votes_recorded,
            events = self.container.audit.len(),
            "Shutdown complete"
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config()?;
    if let Err(e) = config.validate_for_production() {
        if config.dev_mode {
            warn!("{}", e);
        } else {
            return Err(e).context("refusing to start; set VK_DEV_MODE=1 for a demo station");
        }
    }

    let mut runtime = KioskRuntime::new(&config)?;
    runtime.start().await?;

    info!("Kiosk is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    runtime.shutdown().await;
    Ok(())
}
