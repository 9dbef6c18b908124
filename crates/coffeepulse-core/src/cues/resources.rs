use std::sync::Arc;

use tracing::{debug, warn};

use super::devices::{AudioCue, WakeLock};
use crate::error::DeviceError;

/// Outcome of a best-effort acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Acquired {
    pub audio_ready: bool,
    pub wake_lock_held: bool,
}

/// Brings up audio and the wake-lock around a brew.
///
/// Every step is fail-soft: errors are logged and brewing carries on.
/// Retries and visibility-driven re-acquisition belong to the collaborators.
#[derive(Clone)]
pub struct ResourceCoordinator {
    audio: Arc<dyn AudioCue>,
    wake_lock: Arc<dyn WakeLock>,
}

impl ResourceCoordinator {
    pub fn new(audio: Arc<dyn AudioCue>, wake_lock: Arc<dyn WakeLock>) -> Self {
        Self { audio, wake_lock }
    }

    /// Audio readiness first, then the wake-lock. Neither failure blocks
    /// the other.
    pub async fn acquire(&self) -> Acquired {
        let audio_ready = match self.audio.initialize().await {
            Ok(()) => true,
            Err(err) => {
                log_failure("audio initialization", &err);
                false
            }
        };
        let wake_lock_held = match self.wake_lock.request().await {
            Ok(()) => true,
            Err(err) => {
                log_failure("wake lock request", &err);
                false
            }
        };
        debug!(audio_ready, wake_lock_held, "brew resources acquired");
        Acquired {
            audio_ready,
            wake_lock_held,
        }
    }

    /// Release the wake-lock, whether or not one is held.
    pub async fn release(&self) {
        if let Err(err) = self.wake_lock.release().await {
            warn!("wake lock release failed: {err}");
        }
    }
}

/// A missing capability is expected on many hosts and only worth `debug`.
fn log_failure(step: &str, err: &DeviceError) {
    if err.is_unsupported() {
        debug!("{step} skipped: {err}");
    } else {
        warn!("{step} failed: {err}");
    }
}
