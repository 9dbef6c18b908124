//! Tick sources.
//!
//! The engine never keeps time itself. A [`TickScheduler`] delivers one
//! callback per period while running; cadence fidelity is its job.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Callback invoked once per tick.
pub type TickCallback = Box<dyn FnMut() + Send + 'static>;

/// A periodic tick source.
///
/// `stop` must be synchronous: once it returns, no further callbacks may
/// start. A callback already running may still finish, so consumers guard
/// against late ticks themselves.
pub trait TickScheduler: Send {
    /// Begin delivering ticks, replacing any previous callback.
    fn start(&mut self, callback: TickCallback);
    /// Stop delivering ticks. Idempotent.
    fn stop(&mut self);
    fn is_running(&self) -> bool;
}

/// Tokio-backed scheduler firing at a fixed period.
///
/// The first tick arrives one full period after `start`. Requires a tokio
/// runtime to be entered when `start` is called.
#[derive(Debug)]
pub struct IntervalScheduler {
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl IntervalScheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            handle: None,
        }
    }

    /// One tick per second.
    pub fn every_second() -> Self {
        Self::new(Duration::from_secs(1))
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Default for IntervalScheduler {
    fn default() -> Self {
        Self::every_second()
    }
}

impl TickScheduler for IntervalScheduler {
    fn start(&mut self, mut callback: TickCallback) {
        self.stop();
        let period = self.period;
        self.handle = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                callback();
            }
        }));
    }

    fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for IntervalScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Host-driven scheduler: ticks are delivered by calling [`ManualTicks::fire`].
///
/// Useful when the host already owns a frame loop, and in tests.
#[derive(Default)]
pub struct ManualScheduler {
    slot: Arc<Mutex<Option<TickCallback>>>,
}

/// Handle for firing ticks into a [`ManualScheduler`] after it has been
/// moved into a session.
#[derive(Clone, Default)]
pub struct ManualTicks {
    slot: Arc<Mutex<Option<TickCallback>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticks(&self) -> ManualTicks {
        ManualTicks {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl ManualTicks {
    /// Deliver one tick. Returns false if the scheduler is stopped.
    pub fn fire(&self) -> bool {
        let mut slot = match self.slot.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        match slot.as_mut() {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// Deliver `n` ticks, stopping early if the scheduler stops.
    pub fn fire_n(&self, n: u32) -> u32 {
        let mut fired = 0;
        for _ in 0..n {
            if !self.fire() {
                break;
            }
            fired += 1;
        }
        fired
    }

    pub fn is_running(&self) -> bool {
        self.slot.lock().map(|s| s.is_some()).unwrap_or(false)
    }
}

impl TickScheduler for ManualScheduler {
    fn start(&mut self, callback: TickCallback) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(callback);
        }
    }

    fn stop(&mut self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }

    fn is_running(&self) -> bool {
        self.slot.lock().map(|s| s.is_some()).unwrap_or(false)
    }
}
