//! Enemies: direct-hit reactions, status decay and movement.
//!
//! Enemies walk (or fly) from the right edge toward the laboratory at
//! `x = 0`. Their status block is decayed before they move, and movement
//! honours freeze, slow and blindness in that order.

use bevy::math::{Rect, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    BLIND_FLIP_CHANCE, BURN_DPS_PER_POWER, BURN_SECS_PER_DURATION, CONFUSE_SECS_PER_DURATION,
    DIRECT_DAMAGE_PER_POWER, ENEMY_HITBOX_SIZE, FLYING_BOB_AMPLITUDE, SLOW_PER_POWER,
    SLOW_SECS_PER_DURATION,
};
use crate::potion::Payload;
use crate::status::StatusEffectState;

pub mod wave;

pub use wave::EnemyWaveController;

/// Stable handle into the enemy arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(pub u64);

/// What a direct potion hit did to an enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DirectHit {
    /// Instant damage, optionally followed by a burn
    Damage { amount: f32, burning: bool },
    Slow { factor: f32, seconds: f32 },
    /// Direction reversed for a while, speed unchanged
    Confuse { seconds: f32 },
    /// "Blind" potions stop the target completely
    Blind { seconds: f32 },
    /// No recognised keyword; only the hit flash
    Flash,
    /// Target was already dead
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EnemyId,
    /// Hitbox center
    pub position: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub flying: bool,
    /// Units per second before modifiers
    pub base_speed: f32,
    /// -1.0 toward the laboratory, 1.0 away from it
    pub direction: f32,
    pub status: StatusEffectState,
    /// Flying enemies bob around this height
    altitude: f32,
}

impl Enemy {
    pub fn new(id: EnemyId, position: Vec2, base_speed: f32, health: f32, flying: bool) -> Self {
        Self {
            id,
            position,
            health,
            max_health: health,
            flying,
            base_speed,
            direction: -1.0,
            status: StatusEffectState::default(),
            altitude: position.y,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn hitbox(&self) -> Rect {
        Rect::from_center_size(self.position, Vec2::splat(ENEMY_HITBOX_SIZE))
    }

    pub fn health_ratio(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    pub fn effective_speed(&self) -> f32 {
        self.base_speed * self.status.speed_multiplier()
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.health -= amount.max(0.0);
    }

    pub fn flip_direction(&mut self) {
        self.direction = -self.direction;
    }

    /// Status decay, then movement. `clock` is the encounter time in seconds.
    pub fn update(&mut self, dt: f32, clock: f32, rng: &mut impl Rng) {
        let burn = self.status.tick(dt);
        if burn > 0.0 {
            self.take_damage(burn);
        }
        self.advance(dt, clock, rng);
    }

    fn advance(&mut self, dt: f32, clock: f32, rng: &mut impl Rng) {
        if self.status.is_frozen() {
            return;
        }

        if self.status.is_blinded() && rng.gen_bool(BLIND_FLIP_CHANCE) {
            self.flip_direction();
        }

        self.position.x += self.direction * self.effective_speed() * dt;

        if self.flying {
            self.position.y = self.altitude + clock.sin() * FLYING_BOB_AMPLITUDE;
        }
    }

    /// Apply a directly landed payload. The first matching keyword wins.
    pub fn apply_potion_hit(&mut self, payload: &Payload) -> DirectHit {
        if !self.is_alive() {
            return DirectHit::Ignored;
        }
        self.status.flash();

        let keywords = payload.keywords();
        let power = payload.power() as f32;
        let duration = payload.duration() as f32;

        if keywords.damage || keywords.burn {
            let amount = power * DIRECT_DAMAGE_PER_POWER;
            self.take_damage(amount);
            if keywords.burn {
                self.status
                    .apply_burn(power * BURN_DPS_PER_POWER, duration * BURN_SECS_PER_DURATION);
            }
            DirectHit::Damage {
                amount,
                burning: keywords.burn,
            }
        } else if keywords.slow {
            let factor = (1.0 - power * SLOW_PER_POWER).max(0.0);
            let seconds = duration * SLOW_SECS_PER_DURATION;
            self.status.apply_slow(factor, seconds);
            DirectHit::Slow { factor, seconds }
        } else if keywords.dodge || keywords.fog {
            let seconds = duration * CONFUSE_SECS_PER_DURATION;
            self.flip_direction();
            self.status.apply_slow(1.0, seconds);
            DirectHit::Confuse { seconds }
        } else if keywords.blind {
            let seconds = duration * CONFUSE_SECS_PER_DURATION;
            self.status.apply_freeze(seconds);
            DirectHit::Blind { seconds }
        } else {
            DirectHit::Flash
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::potion::{Potion, PotionCategory};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn enemy() -> Enemy {
        Enemy::new(EnemyId(1), Vec2::new(400.0, 410.0), 30.0, 100.0, false)
    }

    fn potion(description: &str, power: u32, duration: u32) -> Payload {
        Payload::Potion(
            Potion::new("Test", PotionCategory::Attack, description).with_stats(power, duration),
        )
    }

    #[test]
    fn test_burn_potion_hit() {
        let mut e = enemy();
        let hit = e.apply_potion_hit(&potion("damage and burn", 2, 1));
        assert_eq!(hit, DirectHit::Damage { amount: 40.0, burning: true });
        assert_eq!(e.health, 60.0);
        assert!(e.status.is_burning());
        assert_eq!(e.status.burn_dps, 10.0);
        assert!(e.status.is_flashing());
    }

    #[test]
    fn test_slow_potion_hit() {
        let mut e = enemy();
        e.apply_potion_hit(&potion("slow", 2, 2));
        assert!((e.status.slow_factor - 0.6).abs() < 1e-6);
        assert!((e.effective_speed() - 18.0).abs() < 1e-4);
    }

    #[test]
    fn test_slow_factor_clamped_at_zero() {
        let mut e = enemy();
        let hit = e.apply_potion_hit(&potion("slow", 7, 1));
        assert_eq!(hit, DirectHit::Slow { factor: 0.0, seconds: 2.0 });
    }

    #[test]
    fn test_fog_hit_flips_direction_keeps_speed() {
        let mut e = enemy();
        e.apply_potion_hit(&potion("fog of dodge", 1, 2));
        assert_eq!(e.direction, 1.0);
        assert!(e.status.is_slowed());
        assert_eq!(e.effective_speed(), 30.0);
    }

    #[test]
    fn test_blind_hit_freezes() {
        let mut e = enemy();
        let hit = e.apply_potion_hit(&potion("blind", 1, 2));
        assert_eq!(hit, DirectHit::Blind { seconds: 3.0 });
        assert!(e.status.is_frozen());
        assert!(!e.status.is_blinded());
    }

    #[test]
    fn test_dead_enemy_ignores_hits() {
        let mut e = enemy();
        e.health = 0.0;
        assert_eq!(e.apply_potion_hit(&Payload::Stone), DirectHit::Ignored);
        assert!(!e.status.is_flashing());
    }

    #[test]
    fn test_frozen_enemy_does_not_move() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let mut e = enemy();
        e.status.apply_freeze(1.0);
        let start = e.position;
        for i in 0..9 {
            e.update(0.1, i as f32 * 0.1, &mut rng);
        }
        assert_eq!(e.position, start);
        e.update(0.2, 1.0, &mut rng);
        assert!(e.position.x < start.x);
    }

    #[test]
    fn test_moves_toward_laboratory() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let mut e = enemy();
        e.update(1.0, 0.0, &mut rng);
        assert!((e.position.x - 370.0).abs() < 1e-4);
    }

    #[test]
    fn test_flying_enemy_bobs() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let mut e = Enemy::new(EnemyId(2), Vec2::new(400.0, 100.0), 30.0, 100.0, true);
        e.update(0.1, std::f32::consts::FRAC_PI_2, &mut rng);
        assert!((e.position.y - (100.0 + FLYING_BOB_AMPLITUDE)).abs() < 1e-4);
        assert!((e.hitbox().center().y - e.position.y).abs() < 1e-4);
    }
}
