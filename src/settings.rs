//! Stage settings
//!
//! Population, spawn cadence and solver tuning. Loaded from a JSON file by
//! the native binary; every field falls back to its `consts` default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::BeanError;

/// Engine-wide solver tuning, applied once at startup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineTuning {
    pub position_iterations: u32,
    pub velocity_iterations: u32,
    pub constraint_iterations: u32,
    /// Gravity strength (1.0 = standard)
    pub gravity: f32,
}

impl Default for EngineTuning {
    fn default() -> Self {
        Self {
            position_iterations: POSITION_ITERATIONS,
            velocity_iterations: VELOCITY_ITERATIONS,
            constraint_iterations: CONSTRAINT_ITERATIONS,
            gravity: GRAVITY,
        }
    }
}

/// Stage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Population ===
    /// Beans spawned by `Stage::start`
    pub target_count: usize,
    /// Beans per scheduler tick
    pub burst_size: usize,
    /// Milliseconds between scheduler ticks
    pub spawn_interval_ms: f32,

    // === Sizing ===
    /// Bean width per unit of viewport width
    pub base_mult: f32,
    /// Random trials before placement gives up on avoiding overlap
    pub placement_attempts: usize,

    // === Walls ===
    pub wall_thickness: f32,
    /// Floor sits this fraction of the viewport height below the bottom edge
    pub extra_lower_percent: f32,
    /// Quiet period before a resize rebuilds the walls
    pub resize_debounce_ms: f32,

    // === Engine ===
    pub engine: EngineTuning,

    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_count: TARGET_BEAN_COUNT,
            burst_size: SPAWN_BURST,
            spawn_interval_ms: SPAWN_INTERVAL_MS,

            base_mult: BASE_MULT,
            placement_attempts: PLACEMENT_ATTEMPTS,

            wall_thickness: WALL_THICKNESS,
            extra_lower_percent: EXTRA_LOWER_PERCENT,
            resize_debounce_ms: RESIZE_DEBOUNCE_MS,

            engine: EngineTuning::default(),

            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, BeanError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BeanError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, BeanError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let settings = Settings::default();
        assert_eq!(settings.target_count, 160);
        assert_eq!(settings.burst_size, 4);
        assert_eq!(settings.spawn_interval_ms, 80.0);
        assert_eq!(settings.placement_attempts, 12);
        assert_eq!(settings.engine.position_iterations, 28);
        assert_eq!(settings.engine.velocity_iterations, 25);
        assert!(settings.seed.is_none());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings =
            Settings::from_json(r#"{ "target_count": 10, "engine": { "gravity": 2.0 } }"#)
                .unwrap();
        assert_eq!(settings.target_count, 10);
        assert_eq!(settings.burst_size, SPAWN_BURST);
        assert_eq!(settings.engine.gravity, 2.0);
        assert_eq!(settings.engine.position_iterations, POSITION_ITERATIONS);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = Settings::from_json("{ target_count: ").unwrap_err();
        assert!(matches!(err, BeanError::Settings(_)));
    }

    #[test]
    fn test_json_roundtrip_keeps_seed() {
        let settings = Settings {
            seed: Some(42),
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        let back = Settings::from_json(&json).unwrap();
        assert_eq!(back.seed, Some(42));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Settings::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, BeanError::Io(_)));
    }
}
