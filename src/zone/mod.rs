//! Timed area effects left behind by impacts.
//!
//! A zone has a fixed center and radius and re-applies its profile to every
//! live enemy inside it each tick until its duration runs out.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::ZONE_SLOW_REFRESH_SECS;
use crate::enemy::Enemy;

pub mod dispatch;

pub use dispatch::create_effect_for_potion;

/// Visual / behavioural family of a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneArchetype {
    Explosion,
    FirePuddle,
    Smoke,
    Mud,
    WaterSplash,
    Tornado,
    Crystal,
}

/// What a zone does to each enemy inside it. Zero disables a field;
/// a `slow_factor` of 1.0 means no slow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneProfile {
    pub damage_per_second: f32,
    pub slow_factor: f32,
    pub stun_duration: f32,
    pub blind_duration: f32,
    pub repel_force: f32,
}

impl Default for ZoneProfile {
    fn default() -> Self {
        Self {
            damage_per_second: 0.0,
            slow_factor: 1.0,
            stun_duration: 0.0,
            blind_duration: 0.0,
            repel_force: 0.0,
        }
    }
}

impl ZoneProfile {
    pub fn damage(damage_per_second: f32) -> Self {
        Self {
            damage_per_second,
            ..Default::default()
        }
    }

    pub fn slow(slow_factor: f32) -> Self {
        Self {
            slow_factor,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneEffect {
    pub center: Vec2,
    pub radius: f32,
    pub duration: f32,
    pub elapsed: f32,
    pub archetype: ZoneArchetype,
    /// Render color (RGB)
    pub tint: [u8; 3],
    pub profile: ZoneProfile,
}

impl ZoneEffect {
    pub fn new(
        archetype: ZoneArchetype,
        center: Vec2,
        radius: f32,
        duration: f32,
        tint: [u8; 3],
        profile: ZoneProfile,
    ) -> Self {
        Self {
            center,
            radius,
            duration,
            elapsed: 0.0,
            archetype,
            tint,
            profile,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.center.distance(point) <= self.radius
    }

    /// Apply the profile to every live enemy in range. Returns how many were affected.
    pub fn apply(&self, dt: f32, enemies: &mut [Enemy]) -> usize {
        let profile = &self.profile;
        let mut affected = 0;

        for enemy in enemies
            .iter_mut()
            .filter(|e| e.is_alive() && self.contains(e.position))
        {
            affected += 1;

            if profile.damage_per_second > 0.0 {
                enemy.take_damage(profile.damage_per_second * dt);
            }
            if profile.slow_factor < 1.0 {
                enemy
                    .status
                    .apply_slow(profile.slow_factor, ZONE_SLOW_REFRESH_SECS);
            }
            if profile.stun_duration > 0.0 {
                enemy.status.apply_freeze(profile.stun_duration);
            }
            if profile.blind_duration > 0.0 {
                enemy.status.apply_blind(profile.blind_duration);
            }
            if profile.repel_force > 0.0 {
                let away = (enemy.position - self.center).try_normalize().unwrap_or(Vec2::X);
                enemy.position += away * profile.repel_force;
            }
        }
        affected
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Elapsed ratio in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).min(1.0)
    }
}
