use serde::{Deserialize, Serialize};

use super::phase::Phase;
use crate::error::ValidationError;

/// Validated brew settings handed to the engine.
///
/// The engine keeps this behind an `Arc` and never mutates it; a settings
/// change produces a new snapshot that replaces the old one wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrewConfig {
    /// Seconds spent in the bloom phase.
    pub bloom_duration: u32,
    /// Seconds per pour and per wait.
    pub pulse_interval: u32,
    pub is_muted: bool,
    /// Grams of coffee, display only.
    pub coffee_weight: f64,
    /// Grams of water per gram of coffee, display only.
    pub water_ratio: f64,
    /// Suppress haptics as well as audio while muted.
    #[serde(default)]
    pub haptics_follow_mute: bool,
}

impl Default for BrewConfig {
    fn default() -> Self {
        Self {
            bloom_duration: 30,
            pulse_interval: 5,
            is_muted: false,
            coffee_weight: 15.0,
            water_ratio: 15.5,
            haptics_follow_mute: false,
        }
    }
}

impl BrewConfig {
    /// Check the invariants the engine relies on.
    ///
    /// Durations must be at least one second; weight and ratio strictly
    /// positive (NaN is rejected too).
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.bloom_duration < 1 {
            return Err(ValidationError::DurationTooShort {
                field: "bloom_duration",
                value: self.bloom_duration,
            });
        }
        if self.pulse_interval < 1 {
            return Err(ValidationError::DurationTooShort {
                field: "pulse_interval",
                value: self.pulse_interval,
            });
        }
        if !(self.coffee_weight > 0.0) {
            return Err(ValidationError::NonPositiveQuantity {
                field: "coffee_weight",
                value: self.coffee_weight,
            });
        }
        if !(self.water_ratio > 0.0) {
            return Err(ValidationError::NonPositiveQuantity {
                field: "water_ratio",
                value: self.water_ratio,
            });
        }
        Ok(())
    }

    pub fn validated(self) -> Result<Self, ValidationError> {
        self.validate()?;
        Ok(self)
    }

    /// Copy of this snapshot with the mute flag replaced.
    pub fn with_muted(&self, is_muted: bool) -> Self {
        Self {
            is_muted,
            ..self.clone()
        }
    }

    /// Configured length of `phase` in seconds. Idle shows the bloom countdown.
    pub fn phase_duration(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Idle | Phase::Bloom => self.bloom_duration,
            Phase::Pour | Phase::Wait => self.pulse_interval,
        }
    }

    /// Whether haptic cues should fire under this snapshot.
    pub fn haptics_enabled(&self) -> bool {
        !(self.is_muted && self.haptics_follow_mute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(BrewConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_durations() {
        let cfg = BrewConfig {
            pulse_interval: 0,
            ..BrewConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.to_string(), "Durations must be at least 1 second.");
    }

    #[test]
    fn rejects_non_positive_quantities() {
        let cfg = BrewConfig {
            water_ratio: 0.0,
            ..BrewConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ValidationError::NonPositiveQuantity { field: "water_ratio", .. })
        ));

        let cfg = BrewConfig {
            coffee_weight: f64::NAN,
            ..BrewConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn haptics_gate_depends_on_flag() {
        let muted = BrewConfig::default().with_muted(true);
        assert!(muted.haptics_enabled());

        let gated = BrewConfig {
            haptics_follow_mute: true,
            ..muted
        };
        assert!(!gated.haptics_enabled());
        assert!(gated.with_muted(false).haptics_enabled());
    }
}
