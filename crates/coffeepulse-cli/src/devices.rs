//! Terminal stand-ins for the brew collaborators.

use std::io::{IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use coffeepulse_core::{AudioCue, DeviceError, WakeLock};
use tracing::{debug, info};

const DEVICE: &str = "terminal bell";

/// Rings the terminal bell on stderr: once per ping, twice for the arpeggio.
#[derive(Debug, Default)]
pub struct TerminalBell {
    muted: AtomicBool,
    ready: AtomicBool,
}

impl TerminalBell {
    fn ring(&self, times: usize) -> Result<(), DeviceError> {
        if self.muted.load(Ordering::SeqCst) || !self.ready.load(Ordering::SeqCst) {
            return Ok(());
        }
        let mut err = std::io::stderr().lock();
        err.write_all("\x07".repeat(times).as_bytes())
            .and_then(|_| err.flush())
            .map_err(|e| DeviceError::failed(DEVICE, e.to_string()))
    }
}

#[async_trait]
impl AudioCue for TerminalBell {
    async fn initialize(&self) -> Result<(), DeviceError> {
        if !std::io::stderr().is_terminal() {
            return Err(DeviceError::Unsupported { device: DEVICE });
        }
        if !self.ready.swap(true, Ordering::SeqCst) {
            debug!("terminal bell ready");
        }
        Ok(())
    }

    fn play_arpeggio(&self) -> Result<(), DeviceError> {
        self.ring(2)
    }

    fn play_low_ping(&self) -> Result<(), DeviceError> {
        self.ring(1)
    }

    fn play_high_ping(&self) -> Result<(), DeviceError> {
        self.ring(1)
    }

    fn set_mute(&self, muted: bool) {
        self.muted.store(muted, Ordering::SeqCst);
    }
}

/// A terminal cannot keep the display awake; this only tracks and logs the
/// lock so the brew lifecycle is visible at `info`.
#[derive(Debug, Default)]
pub struct LoggedWakeLock {
    held: AtomicBool,
}

#[async_trait]
impl WakeLock for LoggedWakeLock {
    async fn request(&self) -> Result<(), DeviceError> {
        if !self.held.swap(true, Ordering::SeqCst) {
            info!("display wake lock acquired");
        }
        Ok(())
    }

    async fn release(&self) -> Result<(), DeviceError> {
        if self.held.swap(false, Ordering::SeqCst) {
            info!("display wake lock released");
        }
        Ok(())
    }
}
