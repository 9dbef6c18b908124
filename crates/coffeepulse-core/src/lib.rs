//! # Coffee Pulse Core Library
//!
//! This library provides the core logic for the Coffee Pulse pour-over
//! brewing assistant. It walks a brew through its phases on a one-second
//! tick and cues the user at every phase change. Rendering, sound synthesis
//! and vibration live in the host; the core only decides *when* and *which*
//! cue fires.
//!
//! ## Architecture
//!
//! - **Brew Engine**: a tick-driven state machine (`Idle → Bloom → Pour ⇄ Wait`)
//!   that requires the caller to invoke `tick()` once per second
//! - **Cues**: maps each phase transition to an audio tone and a haptic
//!   pattern, and brings up audio and the display wake-lock around a brew
//! - **Session**: wires engine, cues and a tick scheduler together and
//!   publishes an event stream
//! - **Storage**: TOML-based settings, validated before reaching the engine
//!
//! ## Key Components
//!
//! - [`BrewEngine`]: Core phase state machine
//! - [`BrewSession`]: Engine plus collaborators and tick source
//! - [`CueDispatcher`]: Transition → sound/vibration mapping
//! - [`Config`]: Settings file management

pub mod calculator;
pub mod cues;
pub mod error;
pub mod events;
pub mod session;
pub mod storage;
pub mod timer;

pub use calculator::{format_clock, WaterPlan};
pub use cues::{AudioCue, Cue, CueDispatcher, Haptics, ResourceCoordinator, Tone, WakeLock};
pub use error::{ConfigError, CoreError, DeviceError, ValidationError};
pub use events::{Event, TransitionKind};
pub use session::{BrewSession, Devices};
pub use storage::Config;
pub use timer::{
    BrewConfig, BrewEngine, IntervalScheduler, ManualScheduler, Phase, StartKind, TickScheduler,
    TimerState,
};
