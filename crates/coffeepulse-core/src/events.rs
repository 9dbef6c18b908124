use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Phase, StartKind, TimerState};

/// Which phase boundary a tick crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    BloomComplete,
    PourComplete,
    WaitComplete,
}

impl TransitionKind {
    pub fn leaving(self) -> Phase {
        match self {
            TransitionKind::BloomComplete => Phase::Bloom,
            TransitionKind::PourComplete => Phase::Pour,
            TransitionKind::WaitComplete => Phase::Wait,
        }
    }

    pub fn entering(self) -> Phase {
        match self {
            TransitionKind::BloomComplete | TransitionKind::WaitComplete => Phase::Pour,
            TransitionKind::PourComplete => Phase::Wait,
        }
    }
}

/// Every state change in a brew session produces an Event.
/// Renderers subscribe to them; the CLI prints them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    BrewStarted {
        start: StartKind,
        state: TimerState,
        at: DateTime<Utc>,
    },
    BrewStopped {
        state: TimerState,
        at: DateTime<Utc>,
    },
    BrewReset {
        state: TimerState,
        at: DateTime<Utc>,
    },
    Reconfigured {
        bloom_duration: u32,
        pulse_interval: u32,
        is_muted: bool,
        state: TimerState,
        at: DateTime<Utc>,
    },
    PhaseTransition {
        kind: TransitionKind,
        from: Phase,
        to: Phase,
        state: TimerState,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        label: String,
        hint: String,
        display_time: u32,
        progress: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn state(&self) -> &TimerState {
        match self {
            Event::BrewStarted { state, .. }
            | Event::BrewStopped { state, .. }
            | Event::BrewReset { state, .. }
            | Event::Reconfigured { state, .. }
            | Event::PhaseTransition { state, .. }
            | Event::StateSnapshot { state, .. } => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_alternate_after_bloom() {
        assert_eq!(TransitionKind::BloomComplete.entering(), Phase::Pour);
        assert_eq!(TransitionKind::PourComplete.entering(), Phase::Wait);
        assert_eq!(TransitionKind::WaitComplete.entering(), Phase::Pour);
        assert_eq!(TransitionKind::WaitComplete.leaving(), Phase::Wait);
    }

    #[test]
    fn events_are_tagged_by_type() {
        let event = Event::BrewStopped {
            state: TimerState {
                phase: Phase::Pour,
                phase_time_remaining: 3,
                total_time: 32,
                is_active: false,
            },
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "BrewStopped");
        assert_eq!(json["state"]["phase"], "pour");
        assert_eq!(json["state"]["phase_time_remaining"], 3);
    }
}
