use serde::{Deserialize, Serialize};

/// Stage of the brew ritual. Exactly one is current at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Not started since the last reset.
    Idle,
    /// Initial degassing pour, entered once per brew.
    Bloom,
    Pour,
    Wait,
}

/// Static display metadata for a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseInfo {
    pub label: &'static str,
    pub hint: &'static str,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Idle, Phase::Bloom, Phase::Pour, Phase::Wait];

    pub fn info(self) -> PhaseInfo {
        match self {
            Phase::Idle => PhaseInfo {
                label: "READY",
                hint: "Begin your ritual",
            },
            Phase::Bloom => PhaseInfo {
                label: "BLOOM",
                hint: "Let the coffee degas",
            },
            Phase::Pour => PhaseInfo {
                label: "POUR",
                hint: "Add water slowly & evenly",
            },
            Phase::Wait => PhaseInfo {
                label: "WAIT",
                hint: "Let it drain through",
            },
        }
    }

    pub fn label(self) -> &'static str {
        self.info().label
    }

    pub fn hint(self) -> &'static str {
        self.info().hint
    }

    /// True for the alternating Pour/Wait pulse phases.
    pub fn is_pulse(self) -> bool {
        matches!(self, Phase::Pour | Phase::Wait)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
