//! # Kiosk Configuration
//!
//! Defaults are safe for a demo station. Production stations must provide a
//! sealing secret and an operator list through the environment.
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `VK_STATION_ID` | Station label on receipts and exports |
//! | `VK_SEALING_SECRET` | 64 hex chars; all keys are derived from it |
//! | `VK_SESSION_TTL_SECS` | Session lifetime |
//! | `VK_BALLOT_FILE` | JSON candidate list |
//! | `VK_REGISTERED_VOTERS` | Roll size for turnout |
//! | `VK_OPERATORS` | `id:pin,id:pin` |
//! | `VK_RNG_SEED` | Fixed randomness seed (dev only) |
//! | `VK_DEV_MODE` | Allow the insecure settings above |

use shared_types::StationId;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};
use vk_01_identity_verification::IdentityConfig;
use vk_03_vote_sealing::SealingConfig;
use vk_05_session_control::SessionConfig;

/// Derivation context for the credential digest key.
pub const IDENTITY_KEY_CONTEXT: &str = "votesafe 2024 credential digest";

/// Complete kiosk configuration.
#[derive(Debug, Clone)]
pub struct KioskConfig {
    /// Session controller limits (includes the station id).
    pub session: SessionConfig,
    /// Identity verification settings.
    pub identity: IdentityConfig,
    /// Station sealing secret.
    pub sealing: SealingConfig,
    /// Candidate list; the demo sitting when unset.
    pub ballot_file: Option<PathBuf>,
    /// Registered operators as `(id, pin)`.
    pub operators: Vec<(String, String)>,
    /// Hardware signal channel capacity.
    pub hardware_channel_capacity: usize,
    /// Receipt paper loaded at startup.
    pub paper_capacity: u32,
    /// Fixed randomness seed for reproducible dev runs.
    pub rng_seed: Option<u64>,
    /// Allow insecure defaults.
    pub dev_mode: bool,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            identity: IdentityConfig::default(),
            sealing: SealingConfig::default(),
            ballot_file: None,
            operators: Vec::new(),
            hardware_channel_capacity: 64,
            paper_capacity: 500,
            rng_seed: None,
            dev_mode: false,
        }
    }
}

impl KioskConfig {
    /// Validate configuration for production readiness.
    ///
    /// # Errors
    ///
    /// - `InsecureSealingSecret` if the sealing secret is all zeros
    /// - `FixedSeed` if randomness is seeded
    /// - `MissingOperators` if fewer than two operators are registered
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        if self.sealing.sealing_secret == [0u8; 32] {
            return Err(ConfigError::InsecureSealingSecret);
        }
        if self.rng_seed.is_some() {
            return Err(ConfigError::FixedSeed);
        }
        if self.operators.len() < 2 {
            return Err(ConfigError::MissingOperators(self.operators.len()));
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Sealing secret left at the zero default.
    #[error(
        "SECURITY VIOLATION: sealing secret is the default zero value. \
         Set VK_SEALING_SECRET (64 hex chars)."
    )]
    InsecureSealingSecret,

    /// Seeded randomness makes nonces and transaction ids predictable.
    #[error("SECURITY VIOLATION: VK_RNG_SEED is set outside dev mode")]
    FixedSeed,

    /// Dual authorization needs at least two operators.
    #[error("At least two operators required for dual authorization, {0} configured")]
    MissingOperators(usize),

    /// A variable could not be parsed.
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue {
        /// Variable name.
        name: &'static str,
        /// What was wrong.
        reason: String,
    },
}

/// Load configuration from the process environment.
pub fn load_config() -> Result<KioskConfig, ConfigError> {
    load_config_from(|name| std::env::var(name).ok())
}

/// Load configuration through `lookup`.
pub fn load_config_from(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<KioskConfig, ConfigError> {
    let mut config = KioskConfig::default();

    if let Some(station) = lookup("VK_STATION_ID") {
        config.session.station_id = StationId::new(station);
    }

    if let Some(secret_hex) = lookup("VK_SEALING_SECRET") {
        let bytes = hex::decode(secret_hex.trim()).map_err(|e| ConfigError::InvalidValue {
            name: "VK_SEALING_SECRET",
            reason: e.to_string(),
        })?;
        let secret: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| ConfigError::InvalidValue {
            name: "VK_SEALING_SECRET",
            reason: format!("expected 32 bytes, got {}", b.len()),
        })?;
        config.sealing.sealing_secret = secret;
        info!("Loaded sealing secret from environment");
    }
    config.identity.identity_key = config.sealing.derive_key(IDENTITY_KEY_CONTEXT);

    if let Some(ttl) = lookup("VK_SESSION_TTL_SECS") {
        let secs: u64 = ttl.parse().map_err(|_| ConfigError::InvalidValue {
            name: "VK_SESSION_TTL_SECS",
            reason: format!("not a number: {ttl}"),
        })?;
        if secs == 0 {
            return Err(ConfigError::InvalidValue {
                name: "VK_SESSION_TTL_SECS",
                reason: "must be positive".into(),
            });
        }
        config.session.session_ttl = Duration::from_secs(secs);
    }

    config.ballot_file = lookup("VK_BALLOT_FILE").map(PathBuf::from);

    if let Some(voters) = lookup("VK_REGISTERED_VOTERS") {
        config.session.registered_voters =
            Some(voters.parse().map_err(|_| ConfigError::InvalidValue {
                name: "VK_REGISTERED_VOTERS",
                reason: format!("not a number: {voters}"),
            })?);
    }

    if let Some(operators) = lookup("VK_OPERATORS") {
        config.operators = parse_operators(&operators)?;
    }

    config.dev_mode = lookup("VK_DEV_MODE").is_some_and(|v| v == "1" || v == "true");
    if config.dev_mode {
        warn!("Dev mode enabled: insecure defaults allowed");
    }

    if let Some(seed) = lookup("VK_RNG_SEED") {
        config.rng_seed = Some(seed.parse().map_err(|_| ConfigError::InvalidValue {
            name: "VK_RNG_SEED",
            reason: format!("not a number: {seed}"),
        })?);
    }

    Ok(config)
}

fn parse_operators(raw: &str) -> Result<Vec<(String, String)>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once(':') {
            Some((id, pin)) if !id.is_empty() && !pin.is_empty() => {
                Ok((id.to_string(), pin.to_string()))
            }
            _ => Err(ConfigError::InvalidValue {
                name: "VK_OPERATORS",
                reason: "expected id:pin entries".into(),
            }),
        })
        .collect()
}
