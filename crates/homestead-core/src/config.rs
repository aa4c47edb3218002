//! Game configuration - tunables for needs, clock and world.
//!
//! Every section has defaults, so a config file only needs the values it
//! changes:
//!
//! ```json
//! { "clock": { "game_minutes_per_real_second": 1.0 } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub needs: NeedsConfig,
    pub clock: ClockConfig,
    pub world: WorldConfig,
}

/// Needs decay and movement penalty
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct NeedsConfig {
    /// Points lost per real second
    pub hunger_decay_per_sec: f32,
    pub energy_decay_per_sec: f32,
    /// A need strictly below this applies the penalty
    pub penalty_threshold: f32,
    /// Fraction of speed lost per need under threshold
    pub penalty: f32,
}

impl Default for NeedsConfig {
    fn default() -> Self {
        Self {
            hunger_decay_per_sec: 0.1,
            energy_decay_per_sec: 0.05,
            penalty_threshold: 30.0,
            penalty: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub game_minutes_per_real_second: f64,
    /// First hour of daytime
    pub day_start_hour: u32,
    /// First hour of nighttime
    pub night_start_hour: u32,
    pub start_day: u32,
    pub start_hour: u32,
    pub start_minute: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            game_minutes_per_real_second: 60.0,
            day_start_hour: 6,
            night_start_hour: 20,
            start_day: 1,
            start_hour: 8,
            start_minute: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Interaction distance for NPCs and transition zones
    pub proximity_radius: f32,
    /// Duration of each half of the transition fade
    pub fade_ms: f32,
    pub autosave_interval_ms: f32,
    /// Player speed in units per second before needs penalties
    pub player_speed: f32,
    pub start_location: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            proximity_radius: 60.0,
            fade_ms: 300.0,
            autosave_interval_ms: 30_000.0,
            player_speed: 160.0,
            start_location: "home".to_string(),
        }
    }
}

/// A game day per real second
pub const MAX_GAME_MINUTES_PER_REAL_SECOND: f64 = 1440.0;

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clock.day_start_hour > 23 || self.clock.night_start_hour > 23 {
            return Err(ConfigError::Invalid {
                field: "clock",
                reason: "day/night start hours must be 0-23".into(),
            });
        }
        let rate = self.clock.game_minutes_per_real_second;
        if !(0.0..=MAX_GAME_MINUTES_PER_REAL_SECOND).contains(&rate) {
            return Err(ConfigError::Invalid {
                field: "clock.game_minutes_per_real_second",
                reason: format!("must be between 0 and {MAX_GAME_MINUTES_PER_REAL_SECOND}"),
            });
        }
        if !(self.world.proximity_radius > 0.0) {
            return Err(ConfigError::Invalid {
                field: "world.proximity_radius",
                reason: "must be positive".into(),
            });
        }
        if !(self.world.fade_ms >= 0.0) || !(self.world.autosave_interval_ms > 0.0) {
            return Err(ConfigError::Invalid {
                field: "world",
                reason: "fade and autosave durations must be positive".into(),
            });
        }
        if !(0.0..=0.5).contains(&self.needs.penalty) {
            return Err(ConfigError::Invalid {
                field: "needs.penalty",
                reason: "must be between 0 and 0.5".into(),
            });
        }
        Ok(())
    }
}
