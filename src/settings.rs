//! Engine configuration
//!
//! Arena geometry, timing and power-up tuning. Loaded from JSON; any field
//! left out falls back to the compile-time defaults in [`crate::consts`].

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::powerup::PowerUpTuning;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,
    pub player_width: f32,
    pub player_height: f32,

    // === Timing ===
    /// Fixed simulation step
    pub tick_ms: f64,
    /// Cap on steps run by one `update` call
    pub max_substeps: u32,

    // === Session ===
    pub starting_lives: u8,

    // === Power-ups ===
    pub speed_boost_ms: f64,
    pub speed_boost_multiplier: f32,
    pub bug_shield_ms: f64,

    // === Movement ===
    pub chase_stop_distance: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            player_width: PLAYER_SIZE,
            player_height: PLAYER_SIZE,

            tick_ms: TICK_MS,
            max_substeps: MAX_SUBSTEPS,

            starting_lives: STARTING_LIVES,

            speed_boost_ms: SPEED_BOOST_MS,
            speed_boost_multiplier: SPEED_BOOST_MULTIPLIER,
            bug_shield_ms: BUG_SHIELD_MS,

            chase_stop_distance: CHASE_STOP_DISTANCE,
        }
    }
}

impl EngineConfig {
    pub fn arena(&self) -> Vec2 {
        Vec2::new(self.arena_width, self.arena_height)
    }

    pub fn player_size(&self) -> Vec2 {
        Vec2::new(self.player_width, self.player_height)
    }

    pub fn powerup_tuning(&self) -> PowerUpTuning {
        PowerUpTuning {
            speed_boost_ms: self.speed_boost_ms,
            speed_boost_multiplier: self.speed_boost_multiplier,
            bug_shield_ms: self.bug_shield_ms,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.arena_width <= 0.0 || self.arena_height <= 0.0 {
            return Err(ConfigError::Invalid("arena dimensions must be positive".to_string()));
        }
        if self.player_width <= 0.0 || self.player_height <= 0.0 {
            return Err(ConfigError::Invalid("player size must be positive".to_string()));
        }
        if self.player_width > self.arena_width || self.player_height > self.arena_height {
            return Err(ConfigError::Invalid("player does not fit in the arena".to_string()));
        }
        if self.tick_ms <= 0.0 {
            return Err(ConfigError::Invalid("tick_ms must be positive".to_string()));
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::Invalid("starting_lives must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from a file, falling back to defaults on any error
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::from_path(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Using default config ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.starting_lives, 3);
        assert_eq!(config.powerup_tuning(), PowerUpTuning::default());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = EngineConfig::from_json(r#"{"arena_width": 1024.0, "starting_lives": 5}"#).unwrap();
        assert_eq!(config.arena(), Vec2::new(1024.0, ARENA_HEIGHT));
        assert_eq!(config.starting_lives, 5);
        assert_eq!(config.bug_shield_ms, BUG_SHIELD_MS);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert!(matches!(
            EngineConfig::from_json(r#"{"arena_width": 0.0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{"player_width": 900.0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{"tick_ms": "fast"}"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = EngineConfig::load("/nonexistent/portfolio-adventure.json");
        assert_eq!(config, EngineConfig::default());
    }
}
