//! Brew calculator: how much water to pour, and when.

use serde::{Deserialize, Serialize};

use crate::timer::BrewConfig;

/// Bloom water is this many times the coffee weight.
pub const BLOOM_WATER_FACTOR: f64 = 2.0;

/// Water targets in whole grams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterPlan {
    pub total_water: i64,
    /// Pour up to this amount during the bloom.
    pub bloom_water: i64,
    /// The remainder, spread over the pulses.
    pub main_pour_water: i64,
}

impl WaterPlan {
    pub fn new(coffee_weight: f64, water_ratio: f64) -> Self {
        let total_water = (coffee_weight * water_ratio).round() as i64;
        let bloom_water = (coffee_weight * BLOOM_WATER_FACTOR).round() as i64;
        Self {
            total_water,
            bloom_water,
            main_pour_water: total_water - bloom_water,
        }
    }

    pub fn for_config(config: &BrewConfig) -> Self {
        Self::new(config.coffee_weight, config.water_ratio)
    }
}

/// `m:ss`, as shown for the total brew time.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
