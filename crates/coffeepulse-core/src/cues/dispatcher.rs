//! Maps brew events to sound and vibration.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::devices::{AudioCue, Haptics};
use crate::error::DeviceError;
use crate::events::TransitionKind;
use crate::timer::BrewConfig;

pub const START_PATTERN: &[u32] = &[50];
pub const BLOOM_COMPLETE_PATTERN: &[u32] = &[300, 100, 300, 100, 300];
pub const POUR_COMPLETE_PATTERN: &[u32] = &[70];
pub const WAIT_COMPLETE_PATTERN: &[u32] = &[150, 50, 150];

/// Moments that get a cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// Fresh start or resume.
    Start,
    BloomComplete,
    PourComplete,
    WaitComplete,
}

/// Sounds the audio collaborator knows how to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Arpeggio,
    LowPing,
    HighPing,
}

impl Cue {
    pub fn tone(self) -> Option<Tone> {
        match self {
            Cue::Start => None,
            Cue::BloomComplete => Some(Tone::Arpeggio),
            Cue::PourComplete => Some(Tone::LowPing),
            Cue::WaitComplete => Some(Tone::HighPing),
        }
    }

    pub fn haptic_pattern(self) -> &'static [u32] {
        match self {
            Cue::Start => START_PATTERN,
            Cue::BloomComplete => BLOOM_COMPLETE_PATTERN,
            Cue::PourComplete => POUR_COMPLETE_PATTERN,
            Cue::WaitComplete => WAIT_COMPLETE_PATTERN,
        }
    }
}

impl From<TransitionKind> for Cue {
    fn from(kind: TransitionKind) -> Self {
        match kind {
            TransitionKind::BloomComplete => Cue::BloomComplete,
            TransitionKind::PourComplete => Cue::PourComplete,
            TransitionKind::WaitComplete => Cue::WaitComplete,
        }
    }
}

/// What happened to one half of a cue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// Nothing to play, or gated by mute.
    Skipped,
    /// The collaborator reported an error; it was logged and dropped.
    Failed(DeviceError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueReport {
    pub cue: Cue,
    pub audio: Delivery,
    pub haptics: Delivery,
}

/// Fires the audio and haptic collaborators for a cue, exactly once each.
///
/// Collaborator failures never propagate: the worst outcome is a missing cue.
#[derive(Clone)]
pub struct CueDispatcher {
    audio: Arc<dyn AudioCue>,
    haptics: Arc<dyn Haptics>,
}

impl CueDispatcher {
    pub fn new(audio: Arc<dyn AudioCue>, haptics: Arc<dyn Haptics>) -> Self {
        Self { audio, haptics }
    }

    pub fn audio(&self) -> &Arc<dyn AudioCue> {
        &self.audio
    }

    pub fn dispatch(&self, cue: Cue, config: &BrewConfig) -> CueReport {
        let audio = match cue.tone() {
            Some(_) if config.is_muted => Delivery::Skipped,
            Some(tone) => self.play(tone),
            None => Delivery::Skipped,
        };

        let haptics = if config.haptics_enabled() {
            match self.haptics.vibrate(cue.haptic_pattern()) {
                Ok(()) => Delivery::Delivered,
                Err(err) if err.is_unsupported() => {
                    debug!(?cue, "haptics unavailable: {err}");
                    Delivery::Failed(err)
                }
                Err(err) => {
                    warn!(?cue, "haptic cue failed: {err}");
                    Delivery::Failed(err)
                }
            }
        } else {
            Delivery::Skipped
        };

        CueReport {
            cue,
            audio,
            haptics,
        }
    }

    fn play(&self, tone: Tone) -> Delivery {
        let result = match tone {
            Tone::Arpeggio => self.audio.play_arpeggio(),
            Tone::LowPing => self.audio.play_low_ping(),
            Tone::HighPing => self.audio.play_high_ping(),
        };
        match result {
            Ok(()) => Delivery::Delivered,
            Err(err) => {
                warn!(?tone, "audio cue failed: {err}");
                Delivery::Failed(err)
            }
        }
    }
}
