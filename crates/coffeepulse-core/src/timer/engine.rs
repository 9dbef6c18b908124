//! Brew phase engine.
//!
//! The engine is a tick-driven state machine. It does not use internal
//! threads or clocks - a scheduler calls `tick()` once per second while the
//! brew is active.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Bloom -> Pour -> Wait -> Pour -> Wait -> ...
//!   ^                                               |
//!   +------------------- reset ---------------------+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = BrewEngine::new(Arc::new(BrewConfig::default()));
//! engine.start();
//! // Once per second:
//! if let Some(kind) = engine.tick() { dispatcher.dispatch(kind.into(), engine.config()); }
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::config::BrewConfig;
use super::phase::Phase;
use crate::events::{Event, TransitionKind};

/// Observable timer state, read by renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub phase: Phase,
    /// Seconds left in the current phase.
    pub phase_time_remaining: u32,
    /// Seconds brewed since the last reset.
    pub total_time: u32,
    pub is_active: bool,
}

/// What `start()` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartKind {
    /// Left Idle and entered Bloom.
    Fresh,
    /// Continued a paused phase.
    Resumed,
    /// Was already active; nothing changed.
    AlreadyActive,
}

/// Core brew engine.
#[derive(Debug, Clone)]
pub struct BrewEngine {
    config: Arc<BrewConfig>,
    phase: Phase,
    phase_time_remaining: u32,
    total_time: u32,
    is_active: bool,
}

impl BrewEngine {
    /// Create an engine in `Idle` showing the bloom countdown.
    pub fn new(config: Arc<BrewConfig>) -> Self {
        let phase_time_remaining = committed(config.bloom_duration);
        Self {
            config,
            phase: Phase::Idle,
            phase_time_remaining,
            total_time: 0,
            is_active: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        TimerState {
            phase: self.phase,
            phase_time_remaining: self.phase_time_remaining,
            total_time: self.total_time,
            is_active: self.is_active,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn phase_time_remaining(&self) -> u32 {
        self.phase_time_remaining
    }

    pub fn total_time(&self) -> u32 {
        self.total_time
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn config(&self) -> &BrewConfig {
        &self.config
    }

    pub fn config_snapshot(&self) -> Arc<BrewConfig> {
        Arc::clone(&self.config)
    }

    /// Seconds to show on the dial. Idle always shows the configured bloom.
    pub fn display_time(&self) -> u32 {
        match self.phase {
            Phase::Idle => self.config.bloom_duration,
            _ => self.phase_time_remaining,
        }
    }

    /// 0.0 .. 1.0 fraction of the current phase still to go.
    pub fn progress(&self) -> f64 {
        if self.phase == Phase::Idle {
            return 1.0;
        }
        let total = committed(self.config.phase_duration(self.phase));
        (self.phase_time_remaining as f64 / total as f64).clamp(0.0, 1.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let info = self.phase.info();
        Event::StateSnapshot {
            state: self.state(),
            label: info.label.to_string(),
            hint: info.hint.to_string(),
            display_time: self.display_time(),
            progress: self.progress(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> StartKind {
        if self.phase == Phase::Idle {
            self.phase = Phase::Bloom;
            self.phase_time_remaining = committed(self.config.bloom_duration);
            self.is_active = true;
            return StartKind::Fresh;
        }
        if self.is_active {
            return StartKind::AlreadyActive;
        }
        self.is_active = true;
        StartKind::Resumed
    }

    /// Pause. Phase, remaining and total time are kept for a later resume.
    pub fn stop(&mut self) {
        self.is_active = false;
    }

    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.phase_time_remaining = committed(self.config.bloom_duration);
        self.total_time = 0;
        self.is_active = false;
    }

    /// Swap in a new settings snapshot.
    ///
    /// Mid-brew the current phase keeps its committed remaining time; only
    /// the next transition picks up the new durations.
    pub fn reconfigure(&mut self, config: Arc<BrewConfig>) {
        self.config = config;
        if self.phase == Phase::Idle {
            self.phase_time_remaining = committed(self.config.bloom_duration);
        }
    }

    /// Advance one second. Returns the transition that fired, if any.
    ///
    /// Ticks delivered while inactive are discarded. At most one transition
    /// fires per tick.
    pub fn tick(&mut self) -> Option<TransitionKind> {
        if !self.is_active || self.phase == Phase::Idle {
            return None;
        }

        self.phase_time_remaining = self.phase_time_remaining.saturating_sub(1);
        self.total_time = self.total_time.saturating_add(1);

        if self.phase_time_remaining > 0 {
            return None;
        }

        let kind = match self.phase {
            Phase::Bloom => TransitionKind::BloomComplete,
            Phase::Pour => TransitionKind::PourComplete,
            Phase::Wait => TransitionKind::WaitComplete,
            Phase::Idle => return None,
        };
        self.phase = kind.entering();
        self.phase_time_remaining = committed(self.config.phase_duration(self.phase));
        Some(kind)
    }
}

/// A zero-length phase still lasts one tick, so a single tick can never
/// cascade through several transitions.
fn committed(duration: u32) -> u32 {
    duration.max(1)
}
