//! Spring tuning: physical parameters, legacy-unit conversion, and settings
//! files.
//!
//! A [`SpringConfig`] is the pair of physical coefficients the integrator
//! reads on every sub-step. Design tools commonly express the same tuning in a
//! "legacy" tension/friction index (roughly `0..=50`); the conversion helpers
//! here map between the two with a pair of independent affine formulas.
//!
//! [`SpringSettings`] is the on-disk form: everything a host needs to build a
//! spring, loadable from TOML or JSON.
//!
//! # Example
//!
//! ```rust
//! use recoil::SpringConfig;
//!
//! let config = SpringConfig::from_legacy_units(40.0, 7.0);
//! assert!((config.tension - 230.2).abs() < 1e-9);
//! assert!((config.friction - 22.0).abs() < 1e-9);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::spring::{DEFAULT_REST_THRESHOLD, SpringBuilder};

const LEGACY_TENSION_OFFSET: f64 = 30.0;
const LEGACY_TENSION_SCALE: f64 = 3.62;
const LEGACY_TENSION_BASE: f64 = 194.0;

const LEGACY_FRICTION_OFFSET: f64 = 8.0;
const LEGACY_FRICTION_SCALE: f64 = 3.0;
const LEGACY_FRICTION_BASE: f64 = 25.0;

/// Legacy tension index used by [`SpringConfig::default`].
pub const DEFAULT_LEGACY_TENSION: f64 = 40.0;

/// Legacy friction index used by [`SpringConfig::default`].
pub const DEFAULT_LEGACY_FRICTION: f64 = 7.0;

/// Physical parameters of a damped spring.
///
/// `tension` is the restoring-force coefficient. Zero means no spring force at
/// all: the value simply coasts on its velocity and decays under friction.
/// `friction` is the damping coefficient.
///
/// This is a plain value type. A [`Spring`](crate::Spring) keeps its own copy,
/// and swapping it mid-flight takes effect on the very next sub-step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    /// Restoring-force coefficient.
    pub tension: f64,
    /// Damping coefficient.
    pub friction: f64,
}

impl SpringConfig {
    /// Creates a configuration from physical values.
    pub const fn new(tension: f64, friction: f64) -> Self {
        Self { tension, friction }
    }

    /// Creates a configuration from legacy tension/friction indices.
    ///
    /// ```rust
    /// use recoil::SpringConfig;
    ///
    /// let still = SpringConfig::from_legacy_units(0.0, 0.0);
    /// assert_eq!(still, SpringConfig::new(0.0, 0.0));
    /// ```
    pub fn from_legacy_units(legacy_tension: f64, legacy_friction: f64) -> Self {
        Self {
            tension: tension_from_legacy(legacy_tension),
            friction: friction_from_legacy(legacy_friction),
        }
    }

    /// Returns this configuration expressed as `(legacy_tension, legacy_friction)`.
    pub fn to_legacy_units(&self) -> (f64, f64) {
        (
            legacy_tension_from_tension(self.tension),
            legacy_friction_from_friction(self.friction),
        )
    }
}

impl Default for SpringConfig {
    /// Legacy tension 40, legacy friction 7.
    fn default() -> Self {
        Self::from_legacy_units(DEFAULT_LEGACY_TENSION, DEFAULT_LEGACY_FRICTION)
    }
}

/// Converts a legacy tension index to a physical tension.
///
/// Zero maps to zero exactly.
pub fn tension_from_legacy(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        (value - LEGACY_TENSION_OFFSET) * LEGACY_TENSION_SCALE + LEGACY_TENSION_BASE
    }
}

/// Inverse of [`tension_from_legacy`].
pub fn legacy_tension_from_tension(tension: f64) -> f64 {
    if tension == 0.0 {
        0.0
    } else {
        (tension - LEGACY_TENSION_BASE) / LEGACY_TENSION_SCALE + LEGACY_TENSION_OFFSET
    }
}

/// Converts a legacy friction index to a physical friction.
///
/// Zero maps to zero exactly.
pub fn friction_from_legacy(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        (value - LEGACY_FRICTION_OFFSET) * LEGACY_FRICTION_SCALE + LEGACY_FRICTION_BASE
    }
}

/// Inverse of [`friction_from_legacy`].
pub fn legacy_friction_from_friction(friction: f64) -> f64 {
    if friction == 0.0 {
        0.0
    } else {
        (friction - LEGACY_FRICTION_BASE) / LEGACY_FRICTION_SCALE + LEGACY_FRICTION_OFFSET
    }
}

/// File-level description of a spring.
///
/// Every field is optional. Physical values win over legacy ones for the same
/// coefficient; a coefficient given in neither form falls back to
/// [`SpringConfig::default`].
///
/// ```toml
/// tension = 50.0
/// friction = 10.0
/// rest_speed_threshold = 0.001
/// rest_displacement_threshold = 0.001
/// overshoot_clamping = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpringSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_tension: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_friction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest_speed_threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest_displacement_threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overshoot_clamping: Option<bool>,
}

impl SpringSettings {
    /// Parses and validates settings from a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let settings: Self = toml::from_str(input)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parses and validates settings from a JSON document.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(input)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from disk. `.json` files are parsed as JSON, anything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        debug!(settings.path = %path.display(), settings.json = is_json, "Loading spring settings");
        if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_toml_str(&contents)
        }
    }

    /// Checks that the resolved coefficients and thresholds are usable.
    pub fn validate(&self) -> Result<()> {
        let config = self.spring_config();
        check_coefficient("tension", config.tension)?;
        check_coefficient("friction", config.friction)?;
        if let Some(value) = self.rest_speed_threshold {
            check_threshold("rest_speed_threshold", value)?;
        }
        if let Some(value) = self.rest_displacement_threshold {
            check_threshold("rest_displacement_threshold", value)?;
        }
        Ok(())
    }

    /// Resolves the physical configuration described by these settings.
    pub fn spring_config(&self) -> SpringConfig {
        let fallback = SpringConfig::default();
        SpringConfig {
            tension: self
                .tension
                .or_else(|| self.legacy_tension.map(tension_from_legacy))
                .unwrap_or(fallback.tension),
            friction: self
                .friction
                .or_else(|| self.legacy_friction.map(friction_from_legacy))
                .unwrap_or(fallback.friction),
        }
    }

    /// Returns a builder pre-populated from these settings.
    pub fn builder(&self) -> SpringBuilder {
        SpringBuilder::new()
            .config(self.spring_config())
            .rest_speed_threshold(self.rest_speed_threshold.unwrap_or(DEFAULT_REST_THRESHOLD))
            .rest_displacement_threshold(
                self.rest_displacement_threshold
                    .unwrap_or(DEFAULT_REST_THRESHOLD),
            )
            .overshoot_clamping(self.overshoot_clamping.unwrap_or(false))
    }
}

fn check_coefficient(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig { field, value })
    }
}

pub(crate) fn check_threshold(name: &'static str, value: f64) -> Result<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        // Also rejects NaN.
        Err(Error::InvalidThreshold { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-10;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn test_legacy_forward_formulas() {
        assert!(approx_eq(tension_from_legacy(30.0), 194.0));
        assert!(approx_eq(tension_from_legacy(40.0), 230.2));
        assert!(approx_eq(friction_from_legacy(8.0), 25.0));
        assert!(approx_eq(friction_from_legacy(5.0), 16.0));
    }

    #[test]
    fn test_legacy_zero_is_fixed_point() {
        assert_eq!(tension_from_legacy(0.0), 0.0);
        assert_eq!(friction_from_legacy(0.0), 0.0);
        assert_eq!(legacy_tension_from_tension(0.0), 0.0);
        assert_eq!(legacy_friction_from_friction(0.0), 0.0);
    }

    #[test]
    fn test_legacy_round_trip() {
        for x in [1.0, 5.0, 7.0, 12.5, 40.0, 50.0] {
            assert!(approx_eq(
                legacy_tension_from_tension(tension_from_legacy(x)),
                x
            ));
            assert!(approx_eq(
                legacy_friction_from_friction(friction_from_legacy(x)),
                x
            ));
        }
    }

    #[test]
    fn test_to_legacy_units() {
        let (t, f) = SpringConfig::from_legacy_units(40.0, 5.0).to_legacy_units();
        assert!(approx_eq(t, 40.0));
        assert!(approx_eq(f, 5.0));
    }

    #[test]
    fn test_default_is_legacy_40_7() {
        let config = SpringConfig::default();
        assert_eq!(config, SpringConfig::from_legacy_units(40.0, 7.0));
    }

    #[test]
    fn test_settings_physical_wins_over_legacy() {
        let settings = SpringSettings {
            tension: Some(50.0),
            legacy_tension: Some(40.0),
            legacy_friction: Some(8.0),
            ..Default::default()
        };
        let config = settings.spring_config();
        assert!(approx_eq(config.tension, 50.0));
        assert!(approx_eq(config.friction, 25.0));
    }

    #[test]
    fn test_settings_lone_legacy_key_keeps_default_friction() {
        let settings = SpringSettings::from_toml_str("legacy_tension = 40.0\n").unwrap();
        let config = settings.spring_config();
        assert!(approx_eq(config.tension, 230.2));
        assert!(approx_eq(config.friction, SpringConfig::default().friction));
        assert!(approx_eq(config.friction, 22.0));
    }

    #[test]
    fn test_settings_empty_falls_back_to_default() {
        assert_eq!(
            SpringSettings::default().spring_config(),
            SpringConfig::default()
        );
    }

    #[test]
    fn test_settings_from_toml() {
        let settings = SpringSettings::from_toml_str(
            "tension = 50.0\nfriction = 10.0\novershoot_clamping = true\n",
        )
        .unwrap();
        assert_eq!(settings.spring_config(), SpringConfig::new(50.0, 10.0));
        assert_eq!(settings.overshoot_clamping, Some(true));
    }

    #[test]
    fn test_settings_from_json() {
        let settings =
            SpringSettings::from_json_str(r#"{"legacy_tension": 40, "legacy_friction": 5}"#)
                .unwrap();
        let config = settings.spring_config();
        assert!(approx_eq(config.tension, 230.2));
        assert!(approx_eq(config.friction, 16.0));
    }

    #[test]
    fn test_settings_reject_unknown_key() {
        let err = SpringSettings::from_toml_str("stiffness = 3.0\n").unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }

    #[test]
    fn test_settings_reject_negative_tension() {
        let err = SpringSettings::from_toml_str("tension = -1.0\n").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfig {
                field: "tension",
                ..
            }
        ));
    }

    #[test]
    fn test_settings_reject_negative_threshold() {
        let err = SpringSettings::from_toml_str("rest_speed_threshold = -0.5\n").unwrap_err();
        assert!(matches!(err, Error::InvalidThreshold { .. }));
    }

    #[test]
    fn test_check_threshold_rejects_nan() {
        assert!(check_threshold("x", f64::NAN).is_err());
        assert!(check_threshold("x", 0.0).is_ok());
    }

    #[test]
    fn test_settings_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("spring.toml");
        std::fs::write(&toml_path, "tension = 12.0\nfriction = 3.0\n").unwrap();
        let json_path = dir.path().join("spring.json");
        std::fs::write(&json_path, r#"{"tension": 12.0, "friction": 3.0}"#).unwrap();

        let from_toml = SpringSettings::load(&toml_path).unwrap();
        let from_json = SpringSettings::load(&json_path).unwrap();
        assert_eq!(from_toml, from_json);
    }

    #[test]
    fn test_settings_load_missing_file() {
        let err = SpringSettings::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
