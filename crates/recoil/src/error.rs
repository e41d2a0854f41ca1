//! Error types for spring construction and settings loading.
//!
//! The integrator itself never fails: numeric edge cases such as zero tension
//! are defined branches of the rest and overshoot predicates. Errors only come
//! from contract violations at construction time and from reading settings.

use thiserror::Error;

/// Errors produced while building a [`Spring`](crate::Spring) or loading
/// [`SpringSettings`](crate::SpringSettings).
#[derive(Error, Debug)]
pub enum Error {
    /// A spring was built without a configuration.
    #[error("spring configuration is required")]
    MissingConfig,

    /// A rest threshold was negative or NaN.
    #[error("invalid {name}: {value} (must be a non-negative number)")]
    InvalidThreshold { name: &'static str, value: f64 },

    /// A physical parameter was negative or not finite.
    #[error("invalid {field}: {value} (must be finite and non-negative)")]
    InvalidConfig { field: &'static str, value: f64 },

    /// Settings file was not valid TOML.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Settings file was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Settings file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for fallible `recoil` operations.
pub type Result<T> = std::result::Result<T, Error>;
