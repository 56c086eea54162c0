//! Centralized gameplay constants for the defense core.
//!
//! Values tunable per deployment live in [`crate::config::DefenseConfig`];
//! the constants here are fixed rules of the simulation.

// =====================================================
// Launcher / Projectile
// =====================================================

/// Lowest launch angle in degrees (horizontal throw)
pub const MIN_ANGLE_DEG: f32 = 0.0;

/// Highest launch angle in degrees (vertical throw)
pub const MAX_ANGLE_DEG: f32 = 90.0;

/// Weakest throw
pub const MIN_POWER: f32 = 1.0;

/// Strongest throw
pub const MAX_POWER: f32 = 10.0;

/// Default aim when a launcher is created
pub const DEFAULT_ANGLE_DEG: f32 = 45.0;
pub const DEFAULT_POWER: f32 = 5.0;

/// Side length of a potion projectile's square hitbox
pub const POTION_HITBOX_SIZE: f32 = 20.0;

/// Side length of a stone projectile's square hitbox
pub const STONE_HITBOX_SIZE: f32 = 8.0;

/// Trajectory preview resolution (points, seconds per point)
pub const PREVIEW_STEPS: usize = 30;
pub const PREVIEW_DT: f32 = 0.1;

// =====================================================
// Stone fallback payload
// =====================================================

pub const STONE_NAME: &str = "Stone";
pub const STONE_DESCRIPTION: &str = "light damage";
pub const STONE_POWER: u32 = 3;
pub const STONE_DURATION: u32 = 1;

// =====================================================
// Direct hits
// =====================================================

/// Instant damage per point of potion power
pub const DIRECT_DAMAGE_PER_POWER: f32 = 20.0;

/// Burn damage per second per point of potion power
pub const BURN_DPS_PER_POWER: f32 = 5.0;

/// Burn seconds per point of potion duration
pub const BURN_SECS_PER_DURATION: f32 = 3.0;

/// Slow factor reduction per point of potion power
pub const SLOW_PER_POWER: f32 = 0.2;

/// Slow seconds per point of potion duration
pub const SLOW_SECS_PER_DURATION: f32 = 2.0;

/// Confusion / blindness seconds per point of potion duration
pub const CONFUSE_SECS_PER_DURATION: f32 = 1.5;

/// Length of the visual hit-flash window
pub const HIT_FLASH_SECS: f32 = 0.2;

// =====================================================
// Zones
// =====================================================

/// Remaining-time floor granted to a slow refreshed by a zone each tick
pub const ZONE_SLOW_REFRESH_SECS: f32 = 0.5;

/// Base explosion size; the blast radius is size * EXPLOSION_RADIUS_MULT
pub const EXPLOSION_BASE_SIZE: f32 = 50.0;
pub const EXPLOSION_RADIUS_MULT: f32 = 1.5;

// =====================================================
// Enemies
// =====================================================

/// Side length of an enemy's square hitbox
pub const ENEMY_HITBOX_SIZE: f32 = 30.0;

/// Chance per tick that a blinded enemy reverses direction
pub const BLIND_FLIP_CHANCE: f64 = 0.1;

/// Chance that a spawned enemy flies
pub const FLYING_CHANCE: f64 = 0.3;

/// Vertical bob of flying enemies around their spawn altitude
pub const FLYING_BOB_AMPLITUDE: f32 = 20.0;

/// Horizontal distance beyond the right edge where enemies appear
pub const SPAWN_OFFSET_X: f32 = 50.0;

/// Margin kept between flying spawns and the top / middle of the playfield
pub const FLYING_SPAWN_MARGIN: f32 = 50.0;

/// Enemies at or left of this x have reached the laboratory
pub const TARGET_BOUNDARY_X: f32 = 0.0;

// =====================================================
// Scoring / Laboratory
// =====================================================

/// Score per registered projectile hit
pub const HIT_SCORE: u64 = 10;

/// Score per completed wave, multiplied by the wave just survived
pub const WAVE_CLEAR_SCORE: u64 = 100;

/// Laboratory damage per enemy reaching it
pub const LAB_DAMAGE_PER_ENEMY: f32 = 10.0;

/// Laboratory repair between waves
pub const LAB_REPAIR_PER_WAVE: f32 = 20.0;

/// Max-health growth per laboratory upgrade
pub const LAB_UPGRADE_MULT: f32 = 1.25;
