//! Core error types for coffeepulse-core.
//!
//! None of these can stall the brew engine: timer operations are total.
//! Errors surface from the settings layer (loading, parsing, validation)
//! and from collaborator devices, which the dispatcher and resource
//! coordinator log and swallow.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for coffeepulse-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Collaborator device errors
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config directory could not be resolved or created
    #[error("Config directory unavailable: {0}")]
    DirUnavailable(String),

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Value could not be parsed for the key's type
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Settings rejected before they reach the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Bloom or pulse duration below one second
    #[error("Durations must be at least 1 second.")]
    DurationTooShort { field: &'static str, value: u32 },

    /// Coffee weight or water ratio not strictly positive
    #[error("Coffee weight and ratio must be positive.")]
    NonPositiveQuantity { field: &'static str, value: f64 },
}

/// Failures reported by audio, haptic and wake-lock collaborators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The host has no such capability
    #[error("{device} is not supported on this host")]
    Unsupported { device: &'static str },

    /// The device exists but the call failed
    #[error("{device} failed: {message}")]
    Failed { device: &'static str, message: String },
}

impl DeviceError {
    /// True when the host simply lacks the capability.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, DeviceError::Unsupported { .. })
    }

    pub fn failed(device: &'static str, message: impl Into<String>) -> Self {
        DeviceError::Failed {
            device,
            message: message.into(),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
