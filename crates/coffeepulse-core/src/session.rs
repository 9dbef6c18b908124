//! A running brew: engine, cue dispatch, resources and tick source wired
//! together behind one lock.
//!
//! All mutation goes through the session's methods, so ticks and user
//! commands are serialized. A command takes the scheduler lock before the
//! core lock and holds it until the scheduler has been started or stopped,
//! so the engine's `is_active` and the tick source always agree. Ticks take
//! only the core lock. Each start/stop/reset bumps a generation
//! counter; a tick carries the generation it was scheduled under and is
//! dropped if the session has moved on since.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::cues::{
    AudioCue, Cue, CueDispatcher, Haptics, NoHaptics, NoWakeLock, ResourceCoordinator,
    SilentAudio, WakeLock,
};
use crate::events::Event;
use crate::timer::{BrewConfig, BrewEngine, StartKind, TickScheduler, TimerState};

const EVENT_CAPACITY: usize = 64;

/// Collaborators injected into a session.
#[derive(Clone)]
pub struct Devices {
    pub audio: Arc<dyn AudioCue>,
    pub haptics: Arc<dyn Haptics>,
    pub wake_lock: Arc<dyn WakeLock>,
}

impl Default for Devices {
    fn default() -> Self {
        Self {
            audio: Arc::new(SilentAudio),
            haptics: Arc::new(NoHaptics),
            wake_lock: Arc::new(NoWakeLock),
        }
    }
}

struct SessionCore {
    engine: BrewEngine,
    dispatcher: CueDispatcher,
    generation: u64,
    events: broadcast::Sender<Event>,
}

impl SessionCore {
    fn emit(&self, event: Event) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn bump(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    fn apply_config(&mut self, config: Arc<BrewConfig>) {
        self.dispatcher.audio().set_mute(config.is_muted);
        self.engine.reconfigure(Arc::clone(&config));
        info!(
            bloom = config.bloom_duration,
            pulse = config.pulse_interval,
            muted = config.is_muted,
            "brew reconfigured"
        );
        self.emit(Event::Reconfigured {
            bloom_duration: config.bloom_duration,
            pulse_interval: config.pulse_interval,
            is_muted: config.is_muted,
            state: self.engine.state(),
            at: Utc::now(),
        });
    }

    fn on_tick(&mut self, generation: u64) {
        if generation != self.generation || !self.engine.is_active() {
            debug!(generation, current = self.generation, "discarding stale tick");
            return;
        }

        if let Some(kind) = self.engine.tick() {
            let config = self.engine.config_snapshot();
            let state = self.engine.state();
            info!(
                ?kind,
                phase = %state.phase,
                total = state.total_time,
                "phase transition"
            );
            self.dispatcher.dispatch(kind.into(), &config);
            self.emit(Event::PhaseTransition {
                kind,
                from: kind.leaving(),
                to: kind.entering(),
                state,
                at: Utc::now(),
            });
        } else {
            debug!(
                remaining = self.engine.phase_time_remaining(),
                total = self.engine.total_time(),
                "tick"
            );
        }
        let snapshot = self.engine.snapshot();
        self.emit(snapshot);
    }
}

/// One brew, reusable indefinitely via `reset`.
pub struct BrewSession {
    core: Arc<Mutex<SessionCore>>,
    scheduler: Mutex<Box<dyn TickScheduler>>,
    coordinator: ResourceCoordinator,
    events: broadcast::Sender<Event>,
}

impl BrewSession {
    pub fn new<S>(config: BrewConfig, devices: Devices, scheduler: S) -> Self
    where
        S: TickScheduler + 'static,
    {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        devices.audio.set_mute(config.is_muted);
        let core = SessionCore {
            engine: BrewEngine::new(Arc::new(config)),
            dispatcher: CueDispatcher::new(Arc::clone(&devices.audio), devices.haptics),
            generation: 0,
            events: events.clone(),
        };
        Self {
            core: Arc::new(Mutex::new(core)),
            scheduler: Mutex::new(Box::new(scheduler)),
            coordinator: ResourceCoordinator::new(devices.audio, devices.wake_lock),
            events,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.core().engine.state()
    }

    pub fn config(&self) -> Arc<BrewConfig> {
        self.core().engine.config_snapshot()
    }

    /// Current state as a `StateSnapshot` event.
    pub fn snapshot(&self) -> Event {
        self.core().engine.snapshot()
    }

    pub fn display_time(&self) -> u32 {
        self.core().engine.display_time()
    }

    pub fn progress(&self) -> f64 {
        self.core().engine.progress()
    }

    pub fn is_ticking(&self) -> bool {
        self.scheduler().is_running()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a fresh brew from Idle, or resume a paused one.
    ///
    /// Audio and wake-lock are attempted first; their failures are logged
    /// and do not prevent the brew from starting.
    pub async fn start(&self) -> StartKind {
        self.coordinator.acquire().await;

        let mut scheduler = self.scheduler();
        let (kind, generation) = {
            let mut core = self.core();
            let kind = core.engine.start();
            if kind == StartKind::AlreadyActive {
                debug!("start ignored, brew already active");
                return kind;
            }
            let generation = core.bump();
            let config = core.engine.config_snapshot();
            core.dispatcher.dispatch(Cue::Start, &config);
            let state = core.engine.state();
            info!(
                start = ?kind,
                phase = %state.phase,
                remaining = state.phase_time_remaining,
                "brew started"
            );
            core.emit(Event::BrewStarted {
                start: kind,
                state,
                at: Utc::now(),
            });
            (kind, generation)
        };

        let core = Arc::clone(&self.core);
        scheduler.start(Box::new(move || {
            lock(&core).on_tick(generation);
        }));
        kind
    }

    /// Pause. Phase and times are kept; `start` resumes.
    pub async fn stop(&self) {
        {
            let mut scheduler = self.scheduler();
            let mut core = self.core();
            core.engine.stop();
            core.bump();
            let state = core.engine.state();
            info!(phase = %state.phase, remaining = state.phase_time_remaining, "brew stopped");
            core.emit(Event::BrewStopped {
                state,
                at: Utc::now(),
            });
            drop(core);
            scheduler.stop();
        }
        self.coordinator.release().await;
    }

    /// Back to Idle with the bloom countdown. Safe from any state.
    pub async fn reset(&self) {
        {
            let mut scheduler = self.scheduler();
            let mut core = self.core();
            core.engine.reset();
            core.bump();
            info!("brew reset");
            core.emit(Event::BrewReset {
                state: core.engine.state(),
                at: Utc::now(),
            });
            drop(core);
            scheduler.stop();
        }
        self.coordinator.release().await;
    }

    /// Replace the settings snapshot. The caller is responsible for having
    /// validated it.
    pub fn reconfigure(&self, config: BrewConfig) {
        self.core().apply_config(Arc::new(config));
    }

    /// Flip audio mute. Returns the new mute state.
    pub fn toggle_mute(&self) -> bool {
        let mut core = self.core();
        let next = core.engine.config().with_muted(!core.engine.config().is_muted);
        let muted = next.is_muted;
        core.apply_config(Arc::new(next));
        muted
    }

    fn core(&self) -> MutexGuard<'_, SessionCore> {
        lock(&self.core)
    }

    fn scheduler(&self) -> MutexGuard<'_, Box<dyn TickScheduler>> {
        self.scheduler.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn lock(core: &Mutex<SessionCore>) -> MutexGuard<'_, SessionCore> {
    core.lock().unwrap_or_else(PoisonError::into_inner)
}
