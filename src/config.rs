//! Tuning configuration for a defense encounter.
//!
//! Loaded from a RON file so designers can rebalance waves and ballistics
//! without recompiling. Every section has defaults matching the shipped
//! balance, so a partial file only needs the fields it overrides.

use std::path::Path;

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::logging::TracingConfig;

/// Errors raised while loading or saving a [`DefenseConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("RON serialization error: {0}")]
    Serialize(#[from] ron::Error),

    #[error("Invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Screen-space playfield. `y` grows downward; the floor is a horizontal plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
    pub floor_y: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            floor_y: 425.0,
        }
    }
}

impl Playfield {
    pub fn in_horizontal_bounds(&self, x: f32) -> bool {
        (0.0..=self.width).contains(&x)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    pub origin: Vec2,
    pub gravity: f32,
    /// Velocity per unit of power for potion payloads
    pub potion_speed_factor: f32,
    /// Velocity per unit of power for the stone fallback
    pub stone_speed_factor: f32,
    pub trail_length: usize,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            origin: Vec2::new(100.0, 405.0),
            gravity: 9.8,
            potion_speed_factor: 5.0,
            stone_speed_factor: 12.5,
            trail_length: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    pub wave_size: u32,
    pub max_wave_size: u32,
    pub wave_growth: f32,
    pub max_concurrent: u32,
    pub spawn_interval: f32,
    pub min_spawn_interval: f32,
    pub spawn_interval_decay: f32,
    pub difficulty_start: f32,
    pub difficulty_step: f32,
    /// Enemy speed = speed_base + speed_per_difficulty * difficulty (units/s)
    pub speed_base: f32,
    pub speed_per_difficulty: f32,
    /// Enemy health = health_base + health_per_difficulty * difficulty
    pub health_base: f32,
    pub health_per_difficulty: f32,
    /// Seconds before a wave is forced to end
    pub wave_duration: f32,
    pub wave_duration_step: f32,
    pub max_wave_duration: f32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            wave_size: 20,
            max_wave_size: 50,
            wave_growth: 1.2,
            max_concurrent: 10,
            spawn_interval: 3.0,
            min_spawn_interval: 0.5,
            spawn_interval_decay: 0.9,
            difficulty_start: 1.0,
            difficulty_step: 0.5,
            speed_base: 30.0,
            speed_per_difficulty: 12.0,
            health_base: 80.0,
            health_per_difficulty: 20.0,
            wave_duration: 60.0,
            wave_duration_step: 5.0,
            max_wave_duration: 120.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaboratoryConfig {
    pub max_health: f32,
}

impl Default for LaboratoryConfig {
    fn default() -> Self {
        Self { max_health: 100.0 }
    }
}

/// Full tuning for one defense encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefenseConfig {
    /// Seed for the encounter RNG (spawns, blind direction flips)
    pub seed: u64,
    pub playfield: Playfield,
    pub launcher: LauncherConfig,
    pub waves: WaveConfig,
    pub laboratory: LaboratoryConfig,
    /// Radius around a Zone-category impact in which every enemy is hit
    pub zone_query_radius: f32,
    pub logging: TracingConfig,
}

impl Default for DefenseConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            playfield: Playfield::default(),
            launcher: LauncherConfig::default(),
            waves: WaveConfig::default(),
            laboratory: LaboratoryConfig::default(),
            zone_query_radius: 100.0,
            logging: TracingConfig::default(),
        }
    }
}

fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be a positive number, got {value}"),
        })
    }
}

impl DefenseConfig {
    /// Check internal consistency. Gameplay code assumes a validated config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.playfield;
        require_positive("playfield.width", p.width)?;
        require_positive("playfield.height", p.height)?;
        require_positive("playfield.floor_y", p.floor_y)?;
        if p.floor_y > p.height {
            return Err(ConfigError::Invalid {
                field: "playfield.floor_y",
                reason: format!("floor {} lies below playfield height {}", p.floor_y, p.height),
            });
        }

        let l = &self.launcher;
        require_positive("launcher.gravity", l.gravity)?;
        require_positive("launcher.potion_speed_factor", l.potion_speed_factor)?;
        require_positive("launcher.stone_speed_factor", l.stone_speed_factor)?;
        if l.trail_length == 0 {
            return Err(ConfigError::Invalid {
                field: "launcher.trail_length",
                reason: "must keep at least one point".into(),
            });
        }
        if !p.in_horizontal_bounds(l.origin.x) || l.origin.y > p.floor_y {
            return Err(ConfigError::Invalid {
                field: "launcher.origin",
                reason: format!("{} is outside the playfield above the floor", l.origin),
            });
        }

        let w = &self.waves;
        if w.wave_size == 0 || w.max_concurrent == 0 {
            return Err(ConfigError::Invalid {
                field: "waves.wave_size",
                reason: "wave_size and max_concurrent must be at least 1".into(),
            });
        }
        if w.max_wave_size < w.wave_size {
            return Err(ConfigError::Invalid {
                field: "waves.max_wave_size",
                reason: format!("cap {} is below initial size {}", w.max_wave_size, w.wave_size),
            });
        }
        require_positive("waves.spawn_interval", w.spawn_interval)?;
        require_positive("waves.min_spawn_interval", w.min_spawn_interval)?;
        require_positive("waves.spawn_interval_decay", w.spawn_interval_decay)?;
        require_positive("waves.wave_duration", w.wave_duration)?;
        require_positive("waves.max_wave_duration", w.max_wave_duration)?;

        require_positive("laboratory.max_health", self.laboratory.max_health)?;
        require_positive("zone_query_radius", self.zone_query_radius)?;

        if let Some(target) = self.logging.invalid_target() {
            return Err(ConfigError::Invalid {
                field: "logging.module_filters",
                reason: format!("`{target}` is not a valid filter target"),
            });
        }
        Ok(())
    }

    /// Parse and validate a RON document.
    pub fn from_ron_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::default();
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_ron_str(&contents)?;
        info!(path = %path.as_ref().display(), "Defense config loaded");
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }

    /// Load from file, or fall back to defaults when missing or invalid.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load defense config, using defaults");
                Self::default()
            }
        }
    }
}
