//! Narrator that writes announcements to the log.
//!
//! Stands in for the speech synthesiser on stations without audio.

use tracing::info;
use vk_05_session_control::Narrator;

/// Logs each announcement at `info`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNarrator;

impl Narrator for TracingNarrator {
    fn announce(&self, message: &str) {
        info!(target: "narrator", "[kiosk] 🔊 {}", message);
    }
}
