//! Integration tests for a brew session driven by a manual tick source.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use coffeepulse_core::timer::{ManualTicks, TickCallback};
use coffeepulse_core::{
    AudioCue, BrewConfig, BrewSession, DeviceError, Devices, Event, Haptics, ManualScheduler,
    Phase, StartKind, TickScheduler, TimerState, TransitionKind, WakeLock,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Init,
    Arpeggio,
    LowPing,
    HighPing,
    Mute(bool),
    Vibrate(Vec<u32>),
    Request,
    Release,
}

#[derive(Default)]
struct Rig {
    calls: Mutex<Vec<Call>>,
    fail_init: AtomicBool,
    fail_lock: AtomicBool,
    held: AtomicBool,
}

impl Rig {
    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn take(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }

    fn devices(self: &Arc<Self>) -> Devices {
        Devices {
            audio: self.clone(),
            haptics: self.clone(),
            wake_lock: self.clone(),
        }
    }
}

#[async_trait]
impl AudioCue for Rig {
    async fn initialize(&self) -> Result<(), DeviceError> {
        self.push(Call::Init);
        if self.fail_init.load(Ordering::SeqCst) {
            return Err(DeviceError::Unsupported { device: "audio" });
        }
        Ok(())
    }
    fn play_arpeggio(&self) -> Result<(), DeviceError> {
        self.push(Call::Arpeggio);
        Ok(())
    }
    fn play_low_ping(&self) -> Result<(), DeviceError> {
        self.push(Call::LowPing);
        Ok(())
    }
    fn play_high_ping(&self) -> Result<(), DeviceError> {
        self.push(Call::HighPing);
        Ok(())
    }
    fn set_mute(&self, muted: bool) {
        self.push(Call::Mute(muted));
    }
}

impl Haptics for Rig {
    fn vibrate(&self, pattern_ms: &[u32]) -> Result<(), DeviceError> {
        self.push(Call::Vibrate(pattern_ms.to_vec()));
        Ok(())
    }
}

#[async_trait]
impl WakeLock for Rig {
    async fn request(&self) -> Result<(), DeviceError> {
        self.push(Call::Request);
        if self.fail_lock.load(Ordering::SeqCst) {
            return Err(DeviceError::failed("wake lock", "not allowed"));
        }
        self.held.store(true, Ordering::SeqCst);
        Ok(())
    }
    async fn release(&self) -> Result<(), DeviceError> {
        self.push(Call::Release);
        self.held.store(false, Ordering::SeqCst);
        Ok(())
    }
}

fn config(bloom: u32, pulse: u32) -> BrewConfig {
    BrewConfig {
        bloom_duration: bloom,
        pulse_interval: pulse,
        ..BrewConfig::default()
    }
}

fn rig_session(cfg: BrewConfig) -> (Arc<Rig>, BrewSession, ManualTicks) {
    let rig = Arc::new(Rig::default());
    let scheduler = ManualScheduler::new();
    let ticks = scheduler.ticks();
    let session = BrewSession::new(cfg, rig.devices(), scheduler);
    rig.take();
    (rig, session, ticks)
}

fn state(phase: Phase, remaining: u32, total: u32, active: bool) -> TimerState {
    TimerState {
        phase,
        phase_time_remaining: remaining,
        total_time: total,
        is_active: active,
    }
}

fn transitions(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<TransitionKind> {
    let mut kinds = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let Event::PhaseTransition { kind, .. } = event {
            kinds.push(kind);
        }
    }
    kinds
}

#[tokio::test]
async fn test_full_brew_scenario() {
    let (rig, session, ticks) = rig_session(config(30, 5));
    let mut rx = session.subscribe();

    assert_eq!(session.start().await, StartKind::Fresh);
    assert_eq!(session.state(), state(Phase::Bloom, 30, 0, true));
    assert_eq!(
        rig.take(),
        vec![Call::Init, Call::Request, Call::Vibrate(vec![50])]
    );

    ticks.fire_n(30);
    assert_eq!(session.state(), state(Phase::Pour, 5, 30, true));
    assert_eq!(transitions(&mut rx), vec![TransitionKind::BloomComplete]);
    assert_eq!(
        rig.take(),
        vec![Call::Arpeggio, Call::Vibrate(vec![300, 100, 300, 100, 300])]
    );

    ticks.fire_n(5);
    assert_eq!(session.state(), state(Phase::Wait, 5, 35, true));
    assert_eq!(transitions(&mut rx), vec![TransitionKind::PourComplete]);
    assert_eq!(rig.take(), vec![Call::LowPing, Call::Vibrate(vec![70])]);

    ticks.fire_n(5);
    assert_eq!(session.state(), state(Phase::Pour, 5, 40, true));
    assert_eq!(transitions(&mut rx), vec![TransitionKind::WaitComplete]);
    assert_eq!(rig.take(), vec![Call::HighPing, Call::Vibrate(vec![150, 50, 150])]);
}

#[tokio::test]
async fn test_pause_and_resume_keep_phase() {
    let (rig, session, ticks) = rig_session(config(30, 5));
    session.start().await;
    ticks.fire_n(32);
    rig.take();

    session.stop().await;
    assert_eq!(session.state(), state(Phase::Pour, 3, 32, false));
    assert_eq!(rig.take(), vec![Call::Release]);
    assert!(!rig.held.load(Ordering::SeqCst));

    assert_eq!(session.start().await, StartKind::Resumed);
    assert_eq!(session.state(), state(Phase::Pour, 3, 32, true));
    assert_eq!(
        rig.take(),
        vec![Call::Init, Call::Request, Call::Vibrate(vec![50])]
    );
}

#[tokio::test]
async fn test_reset_from_mid_brew() {
    let (rig, session, ticks) = rig_session(config(30, 5));
    session.start().await;
    ticks.fire_n(47);
    rig.take();

    session.reset().await;
    assert_eq!(session.state(), state(Phase::Idle, 30, 0, false));
    assert!(!session.is_ticking());
    assert_eq!(rig.take(), vec![Call::Release]);

    session.start().await;
    assert_eq!(session.state(), state(Phase::Bloom, 30, 0, true));
}

#[tokio::test]
async fn test_reset_from_idle_is_safe() {
    let (rig, session, _) = rig_session(config(30, 5));
    session.reset().await;
    session.reset().await;
    assert_eq!(session.state(), state(Phase::Idle, 30, 0, false));
    assert_eq!(rig.take(), vec![Call::Release, Call::Release]);
}

#[tokio::test]
async fn test_resource_failures_do_not_block_brew() {
    let (rig, session, ticks) = rig_session(config(2, 2));
    rig.fail_init.store(true, Ordering::SeqCst);
    rig.fail_lock.store(true, Ordering::SeqCst);

    assert_eq!(session.start().await, StartKind::Fresh);
    assert_eq!(
        rig.take(),
        vec![Call::Init, Call::Request, Call::Vibrate(vec![50])]
    );
    ticks.fire_n(2);
    assert_eq!(session.state().phase, Phase::Pour);
}

#[tokio::test]
async fn test_reconfigure_idle_and_mid_brew() {
    let (rig, session, ticks) = rig_session(config(30, 5));
    session.reconfigure(config(20, 4));
    assert_eq!(session.state(), state(Phase::Idle, 20, 0, false));
    assert_eq!(session.display_time(), 20);
    assert_eq!(rig.take(), vec![Call::Mute(false)]);

    session.start().await;
    ticks.fire_n(10);
    session.reconfigure(config(60, 9));
    assert_eq!(session.state(), state(Phase::Bloom, 10, 10, true));

    ticks.fire_n(10);
    assert_eq!(session.state(), state(Phase::Pour, 9, 20, true));
}

#[tokio::test]
async fn test_muted_brew_keeps_haptics_by_default() {
    let (rig, session, ticks) = rig_session(config(1, 1).with_muted(true));
    session.start().await;
    rig.take();

    ticks.fire_n(3);
    assert_eq!(
        rig.take(),
        vec![
            Call::Vibrate(vec![300, 100, 300, 100, 300]),
            Call::Vibrate(vec![70]),
            Call::Vibrate(vec![150, 50, 150]),
        ]
    );
}

#[tokio::test]
async fn test_muted_brew_suppresses_haptics_when_configured() {
    let cfg = BrewConfig {
        haptics_follow_mute: true,
        ..config(1, 1).with_muted(true)
    };
    let (rig, session, ticks) = rig_session(cfg);
    session.start().await;
    ticks.fire_n(3);
    assert_eq!(rig.take(), vec![Call::Init, Call::Request]);
    assert_eq!(session.state().total_time, 3);
}

#[tokio::test]
async fn test_toggle_mute_forwards_to_audio() {
    let (rig, session, ticks) = rig_session(config(1, 1));
    session.start().await;
    rig.take();

    assert!(session.toggle_mute());
    ticks.fire();
    assert_eq!(
        rig.take(),
        vec![Call::Mute(true), Call::Vibrate(vec![300, 100, 300, 100, 300])]
    );

    assert!(!session.toggle_mute());
    ticks.fire();
    assert_eq!(
        rig.take(),
        vec![Call::Mute(false), Call::LowPing, Call::Vibrate(vec![70])]
    );
}

#[tokio::test]
async fn test_second_start_is_ignored() {
    let (rig, session, ticks) = rig_session(config(30, 5));
    session.start().await;
    ticks.fire_n(4);
    rig.take();

    assert_eq!(session.start().await, StartKind::AlreadyActive);
    assert_eq!(rig.take(), vec![Call::Init, Call::Request]);
    assert_eq!(session.state(), state(Phase::Bloom, 26, 4, true));
}

/// Scheduler whose `stop` forgets nothing, standing in for a tick that was
/// already in flight when the session stopped it.
#[derive(Clone, Default)]
struct LateScheduler {
    callbacks: Arc<Mutex<Vec<TickCallback>>>,
    starts: Arc<AtomicU32>,
}

impl TickScheduler for LateScheduler {
    fn start(&mut self, callback: TickCallback) {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.callbacks.lock().unwrap().push(callback);
    }
    fn stop(&mut self) {}
    fn is_running(&self) -> bool {
        true
    }
}

impl LateScheduler {
    fn fire_all(&self) {
        for callback in self.callbacks.lock().unwrap().iter_mut() {
            callback();
        }
    }
}

#[tokio::test]
async fn test_late_tick_after_reset_is_discarded() {
    let scheduler = LateScheduler::default();
    let handle = scheduler.clone();
    let session = BrewSession::new(config(30, 5), Devices::default(), scheduler);

    session.start().await;
    handle.fire_all();
    assert_eq!(session.state().total_time, 1);

    session.reset().await;
    handle.fire_all();
    assert_eq!(session.state(), state(Phase::Idle, 30, 0, false));

    // A fresh start ticks once per tick, not once per callback ever scheduled.
    session.start().await;
    handle.fire_all();
    assert_eq!(session.state(), state(Phase::Bloom, 29, 1, true));
    assert_eq!(handle.starts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_late_tick_after_stop_is_discarded() {
    let scheduler = LateScheduler::default();
    let handle = scheduler.clone();
    let session = BrewSession::new(config(30, 5), Devices::default(), scheduler);

    session.start().await;
    session.stop().await;
    handle.fire_all();
    assert_eq!(session.state(), state(Phase::Bloom, 30, 0, false));
}

#[tokio::test]
async fn test_every_tick_publishes_snapshot() {
    let (_, session, ticks) = rig_session(config(30, 5));
    let mut rx = session.subscribe();
    session.start().await;
    ticks.fire_n(3);

    let mut snapshots = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let Event::StateSnapshot { state, .. } = event {
            snapshots.push(state.phase_time_remaining);
        }
    }
    assert_eq!(snapshots, vec![29, 28, 27]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_commands_keep_ticker_in_step() {
    let scheduler = ManualScheduler::new();
    let ticks = scheduler.ticks();
    let session = Arc::new(BrewSession::new(config(3, 2), Devices::default(), scheduler));

    let mut handles = Vec::new();
    for worker in 0..4u32 {
        let session = Arc::clone(&session);
        handles.push(tokio::spawn(async move {
            for round in 0..200u32 {
                match (worker + round) % 3 {
                    0 => {
                        session.start().await;
                    }
                    1 => session.stop().await,
                    _ => session.reset().await,
                }
            }
        }));
    }
    let ticker = tokio::task::spawn_blocking(move || {
        for _ in 0..2_000 {
            ticks.fire();
        }
    });
    for handle in handles {
        handle.await.unwrap();
    }
    ticker.await.unwrap();

    assert_eq!(session.state().is_active, session.is_ticking());

    session.start().await;
    assert!(session.state().is_active);
    assert!(session.is_ticking());
    session.stop().await;
    assert!(!session.state().is_active);
    assert!(!session.is_ticking());
}
