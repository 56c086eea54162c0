//! Defense encounter controller.
//!
//! `DefenseController` owns every piece of mutable encounter state and
//! advances it through a fixed pipeline once per frame:
//!
//! 1. enemy status decay and movement
//! 2. projectile integration
//! 3. collision resolution (direct hits, zones queued)
//! 4. zone application and aging
//! 5. wave bookkeeping (spawns, laboratory damage, kills, wave advance)
//!
//! Outward notifications are queued as [`DefenseEvent`]s and drained by
//! the caller.

use bevy::math::Vec2;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::DefenseConfig;
use crate::constants::{
    HIT_SCORE, LAB_DAMAGE_PER_ENEMY, LAB_REPAIR_PER_WAVE, STONE_NAME, WAVE_CLEAR_SCORE,
};
use crate::enemy::{DirectHit, EnemyId, EnemyWaveController};
use crate::laboratory::Laboratory;
use crate::launcher::{Impact, Launcher};
use crate::potion::{Potion, PotionId};
use crate::zone::{ZoneArchetype, ZoneEffect};

pub mod plugin;
pub mod snapshot;

pub use plugin::{DefensePlugin, DefenseResource};
pub use snapshot::DefenseSnapshot;

/// Something the render or audio layer may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DefenseEvent {
    ProjectileLaunched { payload: String },
    EnemySpawned { enemy: EnemyId },
    EnemyHit { enemy: EnemyId, payload: String, hit: DirectHit },
    ZoneCreated { archetype: ZoneArchetype, center: Vec2 },
    EnemyKilled { enemy: EnemyId },
    LaboratoryDamaged { enemies: u32, amount: f32, health: f32 },
    /// `timed_out` is set when the wave timer forced the advance
    WaveAdvanced { wave: u32, bonus: u64, timed_out: bool },
    GameOver { wave: u32, score: u64 },
}

pub struct DefenseController {
    config: DefenseConfig,
    launcher: Launcher,
    waves: EnemyWaveController,
    zones: Vec<ZoneEffect>,
    laboratory: Laboratory,
    inventory: Vec<Potion>,
    next_potion_id: u64,
    /// Index into `inventory`; `None` throws stones
    selected: Option<usize>,
    rng: Xoshiro256PlusPlus,
    score: u64,
    wave: u32,
    wave_timer: f32,
    wave_duration: f32,
    clock: f32,
    game_over: bool,
    events: Vec<DefenseEvent>,
}

impl Default for DefenseController {
    fn default() -> Self {
        Self::new(DefenseConfig::default())
    }
}

impl DefenseController {
    pub fn new(config: DefenseConfig) -> Self {
        info!(seed = config.seed, "Defense encounter created");
        Self {
            launcher: Launcher::new(&config.launcher, config.zone_query_radius),
            waves: EnemyWaveController::new(&config.waves, config.playfield),
            zones: Vec::new(),
            laboratory: Laboratory::new(&config.laboratory),
            inventory: Vec::new(),
            next_potion_id: 1,
            selected: None,
            rng: Xoshiro256PlusPlus::seed_from_u64(config.seed),
            score: 0,
            wave: 1,
            wave_timer: 0.0,
            wave_duration: config.waves.wave_duration,
            clock: 0.0,
            game_over: false,
            events: Vec::new(),
            config,
        }
    }

    /// Start an encounter with a crafted inventory, first potion selected.
    pub fn with_inventory(config: DefenseConfig, potions: Vec<Potion>) -> Self {
        let mut controller = Self::new(config);
        for potion in potions {
            controller.add_potion(potion);
        }
        controller
    }

    pub fn config(&self) -> &DefenseConfig {
        &self.config
    }

    pub fn launcher(&self) -> &Launcher {
        &self.launcher
    }

    pub fn waves(&self) -> &EnemyWaveController {
        &self.waves
    }

    /// Scripted setups and tests reach the arena through here.
    pub fn waves_mut(&mut self) -> &mut EnemyWaveController {
        &mut self.waves
    }

    pub fn zones(&self) -> &[ZoneEffect] {
        &self.zones
    }

    pub fn laboratory(&self) -> &Laboratory {
        &self.laboratory
    }

    pub fn laboratory_mut(&mut self) -> &mut Laboratory {
        &mut self.laboratory
    }

    pub fn inventory(&self) -> &[Potion] {
        &self.inventory
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn wave_time_left(&self) -> f32 {
        (self.wave_duration - self.wave_timer).max(0.0)
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    // =====================================================
    // Inventory / aiming
    // =====================================================

    /// Add a potion under a fresh inventory id; the first one added
    /// becomes the selection.
    pub fn add_potion(&mut self, mut potion: Potion) -> PotionId {
        let id = self.allocate_potion_id();
        potion.id = id;
        self.inventory.push(potion);
        if self.selected.is_none() {
            self.selected = Some(self.inventory.len() - 1);
            self.sync_selection();
        }
        id
    }

    fn allocate_potion_id(&mut self) -> PotionId {
        let id = PotionId(self.next_potion_id);
        self.next_potion_id += 1;
        id
    }

    /// Select an inventory slot. Out-of-range indices are ignored.
    pub fn select_potion(&mut self, index: usize) -> bool {
        if index >= self.inventory.len() {
            return false;
        }
        self.selected = Some(index);
        self.sync_selection();
        true
    }

    /// Throw stones even while potions remain.
    pub fn select_stone(&mut self) {
        self.selected = None;
        self.sync_selection();
    }

    /// Step the selection through the inventory, wrapping at both ends.
    pub fn cycle_selection(&mut self, step: i32) {
        let len = self.inventory.len();
        if len == 0 {
            return;
        }
        let current = self.selected.unwrap_or(0) as i64;
        let next = (current + step as i64).rem_euclid(len as i64) as usize;
        self.selected = Some(next);
        self.sync_selection();
    }

    fn sync_selection(&mut self) {
        let potion = self.selected.and_then(|i| self.inventory.get(i)).cloned();
        self.launcher.select_payload(potion);
    }

    pub fn aim(&mut self, angle_degrees: f32, power: f32) {
        self.launcher.aim(angle_degrees, power);
    }

    /// Throw the current selection. The thrown potion leaves the inventory
    /// and the selection moves to the next one (or the stone when empty).
    pub fn fire(&mut self) -> Option<Potion> {
        if self.game_over {
            return None;
        }

        let consumed = self.launcher.fire();
        let payload = consumed
            .as_ref()
            .map_or_else(|| STONE_NAME.to_string(), |p| p.name.clone());
        self.events.push(DefenseEvent::ProjectileLaunched { payload });

        if let Some(potion) = &consumed {
            self.remove_from_inventory(potion.id);
        }
        self.sync_selection();
        consumed
    }

    fn remove_from_inventory(&mut self, id: PotionId) {
        if let Some(pos) = self.inventory.iter().position(|p| p.id == id) {
            self.inventory.remove(pos);
        }
        self.selected = if self.inventory.is_empty() {
            None
        } else {
            Some(self.selected.unwrap_or(0).min(self.inventory.len() - 1))
        };
    }

    pub fn preview(&self) -> Vec<Vec2> {
        self.launcher.preview(&self.config.playfield)
    }

    pub fn drain_events(&mut self) -> Vec<DefenseEvent> {
        std::mem::take(&mut self.events)
    }

    // =====================================================
    // Tick pipeline
    // =====================================================

    /// Advance the encounter by `dt` seconds. No-op after game over.
    pub fn update(&mut self, dt: f32) {
        if self.game_over || !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.clock += dt;

        self.waves.update_enemies(dt, self.clock, &mut self.rng);

        let impacts = self
            .launcher
            .update(dt, &self.config.playfield, self.waves.enemies());
        self.resolve_impacts(impacts);

        self.update_zones(dt);
        self.update_wave(dt);
    }

    fn resolve_impacts(&mut self, impacts: Vec<Impact>) {
        for impact in impacts {
            for id in &impact.hits {
                let Some(enemy) = self.waves.get_mut(*id) else {
                    continue;
                };
                let hit = enemy.apply_potion_hit(&impact.payload);
                if hit == DirectHit::Ignored {
                    continue;
                }
                self.score += HIT_SCORE;
                debug!(enemy = id.0, ?hit, "Enemy hit");
                self.events.push(DefenseEvent::EnemyHit {
                    enemy: *id,
                    payload: impact.payload.name().to_string(),
                    hit,
                });
            }

            for zone in impact.zones {
                self.events.push(DefenseEvent::ZoneCreated {
                    archetype: zone.archetype,
                    center: zone.center,
                });
                self.zones.push(zone);
            }
        }
    }

    fn update_zones(&mut self, dt: f32) {
        let enemies = self.waves.enemies_mut();
        for zone in &mut self.zones {
            zone.apply(dt, enemies);
            zone.advance(dt);
        }
        self.zones.retain(|z| !z.is_finished());
    }

    fn update_wave(&mut self, dt: f32) {
        if let Some(enemy) = self.waves.update_spawns(dt, &mut self.rng) {
            self.events.push(DefenseEvent::EnemySpawned { enemy });
        }

        let reached = self.waves.collect_reached_target();
        if reached > 0 {
            let amount = reached as f32 * LAB_DAMAGE_PER_ENEMY;
            let destroyed = self.laboratory.take_damage(amount);
            self.events.push(DefenseEvent::LaboratoryDamaged {
                enemies: reached,
                amount,
                health: self.laboratory.health,
            });
            if destroyed {
                self.end_game();
            }
        }

        for enemy in self.waves.remove_dead() {
            self.events.push(DefenseEvent::EnemyKilled { enemy });
        }

        if self.game_over {
            return;
        }

        self.wave_timer += dt;
        let complete = self.waves.is_wave_complete();
        if complete || self.wave_timer >= self.wave_duration {
            self.next_wave(!complete);
        }
    }

    fn next_wave(&mut self, timed_out: bool) {
        let tuning = &self.config.waves;
        self.wave += 1;
        self.wave_timer = 0.0;
        self.wave_duration = (self.wave_duration + tuning.wave_duration_step).min(tuning.max_wave_duration);
        self.waves.reset_for_new_wave();

        let bonus = WAVE_CLEAR_SCORE * u64::from(self.wave - 1);
        self.score += bonus;
        self.laboratory.repair(LAB_REPAIR_PER_WAVE);

        info!(wave = self.wave, bonus, timed_out, score = self.score, "Wave advanced");
        self.events.push(DefenseEvent::WaveAdvanced {
            wave: self.wave,
            bonus,
            timed_out,
        });
    }

    fn end_game(&mut self) {
        self.game_over = true;
        warn!(wave = self.wave, score = self.score, "Laboratory destroyed");
        self.events.push(DefenseEvent::GameOver {
            wave: self.wave,
            score: self.score,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::potion::PotionCategory;
    use crate::status::{StatusEffectState, StatusType};

    fn potion(name: &str, description: &str) -> Potion {
        Potion::new(name, PotionCategory::Attack, description)
    }

    /// Long spawn interval so the arena only holds what a test places.
    fn quiet_config() -> DefenseConfig {
        let mut config = DefenseConfig::default();
        config.waves.spawn_interval = 1000.0;
        config.waves.wave_duration = 1000.0;
        config.waves.max_wave_duration = 1000.0;
        config
    }

    #[test]
    fn test_first_potion_is_selected() {
        let c = DefenseController::with_inventory(
            DefenseConfig::default(),
            vec![potion("Fire", "damage"), potion("Mud", "slow")],
        );
        assert_eq!(c.selected_index(), Some(0));
        assert_eq!(c.launcher().selected().map(|p| p.name.as_str()), Some("Fire"));
    }

    #[test]
    fn test_cycle_wraps() {
        let mut c = DefenseController::with_inventory(
            DefenseConfig::default(),
            vec![potion("A", "damage"), potion("B", "damage"), potion("C", "damage")],
        );
        c.cycle_selection(-1);
        assert_eq!(c.selected_index(), Some(2));
        c.cycle_selection(1);
        assert_eq!(c.selected_index(), Some(0));
        assert!(!c.select_potion(7));
        assert_eq!(c.selected_index(), Some(0));
    }

    #[test]
    fn test_fire_consumes_from_inventory() {
        let mut c = DefenseController::with_inventory(
            DefenseConfig::default(),
            vec![potion("A", "damage"), potion("B", "slow")],
        );
        c.select_potion(1);
        let thrown = c.fire().unwrap();
        assert_eq!(thrown.name, "B");
        assert_eq!(c.inventory().len(), 1);
        assert_eq!(c.selected_index(), Some(0));
        assert_eq!(c.launcher().selected().map(|p| p.name.as_str()), Some("A"));

        c.fire();
        assert!(c.inventory().is_empty());
        assert_eq!(c.selected_index(), None);
        assert!(c.fire().is_none(), "empty inventory throws stones");
        assert_eq!(c.launcher().projectiles().len(), 3);
    }

    #[test]
    fn test_inventory_assigns_potion_ids() {
        let mut c = DefenseController::new(DefenseConfig::default());
        let crafted = potion("A", "damage");
        let first = c.add_potion(crafted.clone());
        let second = c.add_potion(crafted);
        assert_eq!((first, second), (PotionId(1), PotionId(2)));

        let saved = serde_json::to_string(&c.inventory()[0]).unwrap();
        let restored: Potion = serde_json::from_str(&saved).unwrap();
        assert_eq!(c.add_potion(restored), PotionId(3));

        assert_eq!(c.fire().map(|p| p.id), Some(PotionId(1)));
        let left: Vec<PotionId> = c.inventory().iter().map(|p| p.id).collect();
        assert_eq!(left, vec![PotionId(2), PotionId(3)]);
    }

    #[test]
    fn test_direct_hit_scores() {
        let mut c = DefenseController::new(quiet_config());
        let target = c.waves_mut().place_enemy(Vec2::new(160.0, 405.0), 0.0, 100.0, false);
        c.aim(0.0, 10.0);
        c.fire();
        for _ in 0..20 {
            c.update(0.05);
        }
        let enemy = c.waves().get(target).unwrap();
        assert!(enemy.health <= 40.0, "stone deals 3 * 20 plus its blast");
        assert_eq!(c.score(), HIT_SCORE);
        let events = c.drain_events();
        assert!(events.contains(&DefenseEvent::EnemyHit {
            enemy: target,
            payload: STONE_NAME.to_string(),
            hit: DirectHit::Damage { amount: 60.0, burning: false },
        }));
        assert!(events
            .iter()
            .any(|e| matches!(e, DefenseEvent::ZoneCreated { .. })));
        assert!(c.drain_events().is_empty());
    }

    #[test]
    fn test_status_decays_before_same_tick_hit() {
        let mut c = DefenseController::with_inventory(quiet_config(), vec![potion("Frost", "slow")]);
        let target = c.waves_mut().place_enemy(Vec2::new(160.0, 405.0), 0.0, 100.0, false);
        c.aim(0.0, 10.0);
        c.fire();

        let mut landed = None;
        for _ in 0..40 {
            if let Some(e) = c.waves_mut().get_mut(target) {
                e.status = StatusEffectState::default();
                e.status.apply_slow(0.5, 2.05);
            }
            c.update(0.1);
            landed = c.drain_events().into_iter().find_map(|event| match event {
                DefenseEvent::EnemyHit { enemy, hit, .. } if enemy == target => Some(hit),
                _ => None,
            });
            if landed.is_some() {
                break;
            }
        }
        assert!(matches!(landed, Some(DirectHit::Slow { seconds, .. }) if seconds == 2.0));

        // 2.05 decays to 1.95 before the 2.0 s hit is stacked on top
        let enemy = c.waves().get(target).unwrap();
        assert!((enemy.status.remaining(StatusType::Slowed) - 2.0).abs() < 1e-5);
        assert_eq!(enemy.status.slow_factor, 0.5);
    }

    #[test]
    fn test_enemy_reaching_lab_damages_it() {
        let mut c = DefenseController::new(quiet_config());
        c.waves_mut().place_enemy(Vec2::new(1.0, 410.0), 30.0, 100.0, false);
        c.update(0.1);
        assert_eq!(c.laboratory().health, 90.0);
        assert!(c.waves().enemies().is_empty());
    }

    #[test]
    fn test_lab_destruction_ends_game() {
        let mut c = DefenseController::new(quiet_config());
        c.laboratory_mut().health = 10.0;
        c.waves_mut().place_enemy(Vec2::new(1.0, 410.0), 30.0, 100.0, false);
        c.update(0.1);
        assert!(c.is_game_over());
        let events = c.drain_events();
        assert!(matches!(events.last(), Some(DefenseEvent::GameOver { .. })));

        let clock = c.clock;
        c.update(0.1);
        assert_eq!(c.clock, clock, "updates after game over are no-ops");
        assert!(c.fire().is_none());
    }

    #[test]
    fn test_wave_timer_forces_advance() {
        let mut config = quiet_config();
        config.waves.wave_duration = 1.0;
        let mut c = DefenseController::new(config);
        c.laboratory_mut().health = 50.0;
        for _ in 0..11 {
            c.update(0.1);
        }
        assert_eq!(c.wave(), 2);
        assert_eq!(c.score(), WAVE_CLEAR_SCORE);
        assert_eq!(c.laboratory().health, 70.0);
        assert!(c
            .drain_events()
            .contains(&DefenseEvent::WaveAdvanced { wave: 2, bonus: 100, timed_out: true }));
    }

    #[test]
    fn test_zero_dt_is_ignored() {
        let mut c = DefenseController::default();
        c.update(0.0);
        c.update(f32::NAN);
        assert_eq!(c.clock, 0.0);
    }
}
