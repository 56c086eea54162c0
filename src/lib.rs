//! Alchemist Defense - Simulation Core
//!
//! Deterministic defense-phase logic for the potion tower-defense game:
//! - Potions, enhancement stones and projectile payloads
//! - Ballistic projectiles with trail and trajectory preview
//! - Per-enemy status effects (slow, burn, freeze, blind)
//! - Zone effects dispatched from potion keywords
//! - Enemy waves and the defended laboratory
//! - `DefenseController`, the per-frame pipeline, plus its Bevy plugin

pub mod config;
pub mod constants;
pub mod defense;
pub mod enemy;
pub mod laboratory;
pub mod launcher;
pub mod logging;
pub mod potion;
pub mod projectile;
pub mod status;
pub mod zone;

pub use config::{ConfigError, DefenseConfig};
pub use defense::{DefenseController, DefenseEvent, DefensePlugin, DefenseSnapshot};
