//! TOML-based brew settings.
//!
//! This is the settings layer: values are validated here before a
//! [`BrewConfig`] snapshot is handed to the engine.
//!
//! Configuration is stored at `~/.config/coffeepulse/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, CoreError, Result};
use crate::timer::BrewConfig;

/// Phase timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_bloom_duration")]
    pub bloom_duration: u32,
    #[serde(default = "default_pulse_interval")]
    pub pulse_interval: u32,
}

/// Dose and ratio for the brew calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeConfig {
    #[serde(default = "default_coffee_weight")]
    pub coffee_weight: f64,
    #[serde(default = "default_water_ratio")]
    pub water_ratio: f64,
}

/// Sound and vibration preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FeedbackConfig {
    #[serde(default)]
    pub muted: bool,
    /// Also silence vibration while muted.
    #[serde(default)]
    pub haptics_follow_mute: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/coffeepulse/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub recipe: RecipeConfig,
    #[serde(default)]
    pub feedback: FeedbackConfig,
}

fn default_bloom_duration() -> u32 {
    30
}
fn default_pulse_interval() -> u32 {
    5
}
fn default_coffee_weight() -> f64 {
    15.0
}
fn default_water_ratio() -> f64 {
    15.5
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            bloom_duration: default_bloom_duration(),
            pulse_interval: default_pulse_interval(),
        }
    }
}

impl Default for RecipeConfig {
    fn default() -> Self {
        Self {
            coffee_weight: default_coffee_weight(),
            water_ratio: default_water_ratio(),
        }
    }
}

impl From<&BrewConfig> for Config {
    fn from(brew: &BrewConfig) -> Self {
        Self {
            timer: TimerConfig {
                bloom_duration: brew.bloom_duration,
                pulse_interval: brew.pulse_interval,
            },
            recipe: RecipeConfig {
                coffee_weight: brew.coffee_weight,
                water_ratio: brew.water_ratio,
            },
            feedback: FeedbackConfig {
                muted: brew.is_muted,
                haptics_follow_mute: brew.haptics_follow_mute,
            },
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => value
                        .parse::<bool>()
                        .map(serde_json::Value::Bool)
                        .map_err(|e| invalid(e.to_string()))?,
                    serde_json::Value::Number(n) if n.is_u64() => value
                        .parse::<u32>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as whole seconds")))?,
                    serde_json::Value::Number(_) => value
                        .parse::<f64>()
                        .ok()
                        .and_then(serde_json::Number::from_f64)
                        .map(serde_json::Value::Number)
                        .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) => return Err(unknown()),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(err) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: err.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key without persisting it.
    ///
    /// The whole config is validated afterwards; on any error `self` is left
    /// unchanged.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.brew_config()?;
        *self = updated;
        Ok(())
    }

    /// Set a value by key and save to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// the result fails validation, or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// Validated engine snapshot.
    pub fn brew_config(&self) -> Result<BrewConfig> {
        BrewConfig {
            bloom_duration: self.timer.bloom_duration,
            pulse_interval: self.timer.pulse_interval,
            is_muted: self.feedback.muted,
            coffee_weight: self.recipe.coffee_weight,
            water_ratio: self.recipe.water_ratio,
            haptics_follow_mute: self.feedback.haptics_follow_mute,
        }
        .validated()
        .map_err(CoreError::from)
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
