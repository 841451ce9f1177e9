//! Cross-subsystem tests. Every test builds a complete kiosk through
//! [`KioskContainer`] on a manual clock.

pub mod audit_concurrency;
pub mod operator_flows;
pub mod session_flows;

use kiosk_runtime::{KioskConfig, KioskContainer};
use shared_types::ManualClock;
use std::sync::Arc;
use std::time::Duration;
use vk_01_identity_verification::{BiometricMethod, BiometricSample};
use vk_03_vote_sealing::SealingConfig;

/// Clock start for fixtures: 2023-11-14 22:13:20 UTC.
pub const EPOCH_MS: u64 = 1_700_000_000_000;

/// Station secret shared by fixtures and verifiers.
pub fn sealing_config() -> SealingConfig {
    SealingConfig {
        sealing_secret: [0x5A; 32],
    }
}

/// Dev configuration with two operators and a seeded RNG.
pub fn kiosk_config() -> KioskConfig {
    let mut config = KioskConfig {
        sealing: sealing_config(),
        operators: vec![
            ("op-alpha".to_string(), "4821".to_string()),
            ("op-bravo".to_string(), "7310".to_string()),
        ],
        rng_seed: Some(2024),
        dev_mode: true,
        ..Default::default()
    };
    config.session.registered_voters = Some(10);
    config.session.printer_retry_backoff = Duration::from_millis(1);
    config
}

/// Wired kiosk plus its clock.
pub fn wired_kiosk(config: &KioskConfig) -> (KioskContainer, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(EPOCH_MS));
    let kiosk = match KioskContainer::build_with_clock(config, clock.clone()) {
        Ok(kiosk) => kiosk,
        Err(e) => panic!("fixture kiosk failed to build: {e:#}"),
    };
    (kiosk, clock)
}

/// 12-digit credential for voter `n`.
pub fn credential(n: u32) -> String {
    format!("{:012}", 100_000_000_000u64 + u64::from(n))
}

/// Sample the default matcher accepts.
pub fn good_sample() -> BiometricSample {
    BiometricSample::new(BiometricMethod::Fingerprint, vec![200; 32])
}

/// Sample the default matcher rejects.
pub fn poor_sample() -> BiometricSample {
    BiometricSample::new(BiometricMethod::Iris, vec![20; 32])
}
