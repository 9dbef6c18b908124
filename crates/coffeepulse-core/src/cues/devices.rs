use async_trait::async_trait;

use crate::error::DeviceError;

/// Sound output for transition cues.
///
/// Playback calls are fire-and-forget; they must return promptly.
#[async_trait]
pub trait AudioCue: Send + Sync {
    /// Prepare the output. Idempotent, safe to call on every start.
    async fn initialize(&self) -> Result<(), DeviceError>;

    /// Ascending four-note arpeggio, played when the bloom ends.
    fn play_arpeggio(&self) -> Result<(), DeviceError>;

    /// Single low tone, played when a pour ends.
    fn play_low_ping(&self) -> Result<(), DeviceError>;

    /// Single high tone, played when a wait ends.
    fn play_high_ping(&self) -> Result<(), DeviceError>;

    fn set_mute(&self, muted: bool);
}

/// Vibration output. Hosts without a vibration motor return
/// [`DeviceError::Unsupported`].
pub trait Haptics: Send + Sync {
    /// Alternating on/off durations in milliseconds, starting with "on".
    fn vibrate(&self, pattern_ms: &[u32]) -> Result<(), DeviceError>;
}

/// Keeps the display awake during a brew.
#[async_trait]
pub trait WakeLock: Send + Sync {
    /// Acquire the lock. Idempotent.
    async fn request(&self) -> Result<(), DeviceError>;

    /// Release the lock. Idempotent, safe when nothing is held.
    async fn release(&self) -> Result<(), DeviceError>;
}

/// Audio collaborator that plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

#[async_trait]
impl AudioCue for SilentAudio {
    async fn initialize(&self) -> Result<(), DeviceError> {
        Ok(())
    }

    fn play_arpeggio(&self) -> Result<(), DeviceError> {
        Ok(())
    }

    fn play_low_ping(&self) -> Result<(), DeviceError> {
        Ok(())
    }

    fn play_high_ping(&self) -> Result<(), DeviceError> {
        Ok(())
    }

    fn set_mute(&self, _muted: bool) {}
}

/// Haptics for hosts with no vibration support.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn vibrate(&self, _pattern_ms: &[u32]) -> Result<(), DeviceError> {
        Err(DeviceError::Unsupported { device: "haptics" })
    }
}

/// Wake-lock for hosts where the display never sleeps.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoWakeLock;

#[async_trait]
impl WakeLock for NoWakeLock {
    async fn request(&self) -> Result<(), DeviceError> {
        Ok(())
    }

    async fn release(&self) -> Result<(), DeviceError> {
        Ok(())
    }
}
