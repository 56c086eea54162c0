//! Wave spawning and the enemy arena.
//!
//! The controller owns every live enemy. Enemies are addressed by
//! [`EnemyId`] and removed by filtering, never mid-iteration.

use bevy::math::Vec2;
use rand::Rng;
use tracing::{debug, info};

use super::{Enemy, EnemyId};
use crate::config::{Playfield, WaveConfig};
use crate::constants::{
    ENEMY_HITBOX_SIZE, FLYING_CHANCE, FLYING_SPAWN_MARGIN, SPAWN_OFFSET_X, TARGET_BOUNDARY_X,
};

#[derive(Debug, Clone)]
pub struct EnemyWaveController {
    enemies: Vec<Enemy>,
    next_id: u64,
    tuning: WaveConfig,
    playfield: Playfield,
    spawn_timer: f32,
    spawn_interval: f32,
    wave_size: u32,
    spawned: u32,
    difficulty: f32,
}

impl EnemyWaveController {
    pub fn new(tuning: &WaveConfig, playfield: Playfield) -> Self {
        Self {
            enemies: Vec::new(),
            next_id: 1,
            spawn_timer: 0.0,
            spawn_interval: tuning.spawn_interval,
            wave_size: tuning.wave_size,
            spawned: 0,
            difficulty: tuning.difficulty_start,
            tuning: tuning.clone(),
            playfield,
        }
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    pub fn live_count(&self) -> usize {
        self.enemies.len()
    }

    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    pub fn wave_size(&self) -> u32 {
        self.wave_size
    }

    pub fn difficulty(&self) -> f32 {
        self.difficulty
    }

    pub fn spawn_interval(&self) -> f32 {
        self.spawn_interval
    }

    fn allocate_id(&mut self) -> EnemyId {
        let id = EnemyId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn can_spawn(&self) -> bool {
        self.spawned < self.wave_size && self.live_count() < self.tuning.max_concurrent as usize
    }

    /// Spawn one wave enemy at the right edge, if the quota and cap allow.
    pub fn spawn_enemy(&mut self, rng: &mut impl Rng) -> Option<EnemyId> {
        if !self.can_spawn() {
            return None;
        }

        let flying = rng.gen_bool(FLYING_CHANCE);
        let x = self.playfield.width + SPAWN_OFFSET_X;
        let y = if flying {
            let top = FLYING_SPAWN_MARGIN;
            let bottom = (self.playfield.height / 2.0 - FLYING_SPAWN_MARGIN).max(top);
            rng.gen_range(top..=bottom)
        } else {
            self.playfield.floor_y - ENEMY_HITBOX_SIZE / 2.0
        };

        let speed = self.tuning.speed_base + self.tuning.speed_per_difficulty * self.difficulty;
        let health = self.tuning.health_base + self.tuning.health_per_difficulty * self.difficulty;

        let id = self.allocate_id();
        self.enemies
            .push(Enemy::new(id, Vec2::new(x, y), speed, health, flying));
        self.spawned += 1;

        debug!(enemy = id.0, flying, speed, health, "Enemy spawned");
        Some(id)
    }

    /// Place a scripted enemy outside the wave quota.
    pub fn place_enemy(&mut self, position: Vec2, base_speed: f32, health: f32, flying: bool) -> EnemyId {
        let id = self.allocate_id();
        self.enemies
            .push(Enemy::new(id, position, base_speed, health, flying));
        id
    }

    /// Advance the spawn timer; spawns at most one enemy per call.
    pub fn update_spawns(&mut self, dt: f32, rng: &mut impl Rng) -> Option<EnemyId> {
        if self.spawned >= self.wave_size {
            return None;
        }
        self.spawn_timer += dt;
        if self.spawn_timer < self.spawn_interval {
            return None;
        }
        let spawned = self.spawn_enemy(rng);
        if spawned.is_some() {
            self.spawn_timer = 0.0;
        }
        spawned
    }

    /// Status decay and movement for every enemy
    pub fn update_enemies(&mut self, dt: f32, clock: f32, rng: &mut impl Rng) {
        for enemy in &mut self.enemies {
            enemy.update(dt, clock, rng);
        }
    }

    /// Remove live enemies that crossed the defended boundary; returns how many.
    pub fn collect_reached_target(&mut self) -> u32 {
        let before = self.enemies.len();
        self.enemies
            .retain(|e| !(e.is_alive() && e.position.x <= TARGET_BOUNDARY_X));
        (before - self.enemies.len()) as u32
    }

    /// Remove enemies with no health left; returns their ids.
    pub fn remove_dead(&mut self) -> Vec<EnemyId> {
        let dead: Vec<EnemyId> = self
            .enemies
            .iter()
            .filter(|e| !e.is_alive())
            .map(|e| e.id)
            .collect();
        if !dead.is_empty() {
            self.enemies.retain(Enemy::is_alive);
        }
        dead
    }

    pub fn is_wave_complete(&self) -> bool {
        self.spawned >= self.wave_size && self.enemies.is_empty()
    }

    /// Escalate for the next wave: harder, faster spawns, more enemies.
    pub fn reset_for_new_wave(&mut self) {
        self.spawned = 0;
        self.spawn_timer = 0.0;
        self.difficulty += self.tuning.difficulty_step;
        self.spawn_interval =
            (self.spawn_interval * self.tuning.spawn_interval_decay).max(self.tuning.min_spawn_interval);
        let grown = (self.wave_size as f32 * self.tuning.wave_growth) as u32;
        self.wave_size = grown.min(self.tuning.max_wave_size);

        info!(
            difficulty = self.difficulty,
            wave_size = self.wave_size,
            spawn_interval = self.spawn_interval,
            "Wave controller escalated"
        );
    }
}
