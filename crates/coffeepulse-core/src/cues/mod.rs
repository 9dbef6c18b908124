mod devices;
mod dispatcher;
mod resources;

pub use devices::{AudioCue, Haptics, NoHaptics, NoWakeLock, SilentAudio, WakeLock};
pub use dispatcher::{
    Cue, CueDispatcher, CueReport, Delivery, Tone, BLOOM_COMPLETE_PATTERN, POUR_COMPLETE_PATTERN,
    START_PATTERN, WAIT_COMPLETE_PATTERN,
};
pub use resources::{Acquired, ResourceCoordinator};
