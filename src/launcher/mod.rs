//! The potion launcher: aim state, payload selection and live projectiles.
//!
//! The launcher only reports what its projectiles hit. The caller applies
//! those hits to enemies, after the tick's status decay.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{LauncherConfig, Playfield};
use crate::constants::{DEFAULT_ANGLE_DEG, DEFAULT_POWER, PREVIEW_DT, PREVIEW_STEPS};
use crate::enemy::{Enemy, EnemyId};
use crate::potion::{Payload, Potion};
use crate::projectile::{clamp_angle, clamp_power, predict_trajectory, Flight, ProjectileBody};
use crate::zone::{create_effect_for_potion, ZoneEffect};

/// A projectile that terminated on an enemy or the floor this tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Impact {
    pub payload: Payload,
    pub point: Vec2,
    /// Enemies that register a hit, in arena order
    pub hits: Vec<EnemyId>,
    /// Zones left at the impact point: one per hit, or a single one for a
    /// zone potion that hit nothing
    pub zones: Vec<ZoneEffect>,
}

#[derive(Debug, Clone)]
pub struct Launcher {
    origin: Vec2,
    angle_degrees: f32,
    power: f32,
    selected: Option<Potion>,
    projectiles: Vec<ProjectileBody>,
    tuning: LauncherConfig,
    zone_query_radius: f32,
}

impl Launcher {
    pub fn new(tuning: &LauncherConfig, zone_query_radius: f32) -> Self {
        Self {
            origin: tuning.origin,
            angle_degrees: DEFAULT_ANGLE_DEG,
            power: DEFAULT_POWER,
            selected: None,
            projectiles: Vec::new(),
            tuning: tuning.clone(),
            zone_query_radius,
        }
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn angle_degrees(&self) -> f32 {
        self.angle_degrees
    }

    pub fn power(&self) -> f32 {
        self.power
    }

    pub fn aim(&mut self, angle_degrees: f32, power: f32) {
        self.set_angle(angle_degrees);
        self.set_power(power);
    }

    pub fn set_angle(&mut self, angle_degrees: f32) {
        self.angle_degrees = clamp_angle(angle_degrees);
    }

    pub fn set_power(&mut self, power: f32) {
        self.power = clamp_power(power);
    }

    /// `None` selects the stone.
    pub fn select_payload(&mut self, potion: Option<Potion>) {
        self.selected = potion;
    }

    pub fn selected(&self) -> Option<&Potion> {
        self.selected.as_ref()
    }

    fn pending_payload(&self) -> Payload {
        self.selected.clone().into()
    }

    /// Launch the selected payload. Returns the consumed potion, or `None`
    /// when a stone was thrown.
    pub fn fire(&mut self) -> Option<Potion> {
        let consumed = self.selected.take();
        let payload = Payload::from(consumed.clone());

        debug!(
            payload = payload.name(),
            angle = self.angle_degrees,
            power = self.power,
            "Projectile launched"
        );

        self.projectiles.push(ProjectileBody::create(
            self.origin,
            self.angle_degrees,
            self.power,
            payload,
            &self.tuning,
        ));
        consumed
    }

    pub fn projectiles(&self) -> &[ProjectileBody] {
        &self.projectiles
    }

    /// Aiming preview for the current aim and payload
    pub fn preview(&self, playfield: &Playfield) -> Vec<Vec2> {
        let payload = self.pending_payload();
        predict_trajectory(
            self.origin,
            self.angle_degrees,
            self.power,
            payload.speed_factor(&self.tuning),
            self.tuning.gravity,
            playfield,
            PREVIEW_STEPS,
            PREVIEW_DT,
        )
    }

    /// Advance every projectile and report the impacts of those that terminated.
    pub fn update(&mut self, dt: f32, playfield: &Playfield, enemies: &[Enemy]) -> Vec<Impact> {
        let bodies = std::mem::take(&mut self.projectiles);
        let mut impacts = Vec::new();

        for mut body in bodies {
            match body.advance(dt, playfield, enemies) {
                Flight::InFlight => self.projectiles.push(body),
                Flight::OutOfBounds => {
                    debug!(payload = body.payload().name(), "Projectile left the playfield");
                }
                Flight::HitEnemy { enemy, point } => {
                    impacts.push(self.resolve(body.into_payload(), point, Some(enemy), enemies));
                }
                Flight::HitFloor { point } => {
                    impacts.push(self.resolve(body.into_payload(), point, None, enemies));
                }
            }
        }
        impacts
    }

    fn resolve(&self, payload: Payload, point: Vec2, direct: Option<EnemyId>, enemies: &[Enemy]) -> Impact {
        let hits: Vec<EnemyId> = if payload.is_zone() {
            enemies
                .iter()
                .filter(|e| e.is_alive() && e.position.distance(point) < self.zone_query_radius)
                .map(|e| e.id)
                .collect()
        } else {
            direct.into_iter().collect()
        };

        let effect = || create_effect_for_potion(payload.name(), payload.description(), point.x, point.y);
        let zones: Vec<ZoneEffect> = if hits.is_empty() {
            payload.is_zone().then(effect).into_iter().collect()
        } else {
            hits.iter().map(|_| effect()).collect()
        };

        debug!(
            payload = payload.name(),
            x = point.x,
            y = point.y,
            hits = hits.len(),
            zones = zones.len(),
            "Projectile impact"
        );

        Impact {
            payload,
            point,
            hits,
            zones,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::potion::PotionCategory;

    fn launcher() -> Launcher {
        Launcher::new(&LauncherConfig::default(), 100.0)
    }

    fn run_until_impact(launcher: &mut Launcher, playfield: &Playfield, enemies: &[Enemy]) -> Vec<Impact> {
        for _ in 0..2000 {
            let impacts = launcher.update(0.05, playfield, enemies);
            if !impacts.is_empty() || launcher.projectiles().is_empty() {
                return impacts;
            }
        }
        panic!("projectile never terminated");
    }

    #[test]
    fn test_aim_is_clamped() {
        let mut l = launcher();
        l.aim(120.0, 0.0);
        assert_eq!(l.angle_degrees(), 90.0);
        assert_eq!(l.power(), 1.0);
        l.set_angle(-5.0);
        assert_eq!(l.angle_degrees(), 0.0);
    }

    #[test]
    fn test_fire_returns_consumed_potion() {
        let mut l = launcher();
        let potion = Potion::new("Fire", PotionCategory::Attack, "damage");
        let id = potion.id;
        l.select_payload(Some(potion));
        assert_eq!(l.fire().map(|p| p.id), Some(id));
        assert!(l.selected().is_none());
        assert!(l.fire().is_none(), "second shot is a stone");
        assert_eq!(l.projectiles().len(), 2);
        assert!(l.projectiles()[1].payload().is_stone());
    }

    #[test]
    fn test_floor_impact_without_hits_has_no_zone() {
        let mut l = launcher();
        let playfield = Playfield::default();
        l.select_payload(Some(Potion::new("Fire", PotionCategory::Attack, "damage")));
        l.fire();
        let impacts = run_until_impact(&mut l, &playfield, &[]);
        assert_eq!(impacts.len(), 1);
        assert!(impacts[0].hits.is_empty());
        assert!(impacts[0].zones.is_empty());
        assert_eq!(impacts[0].point.y, playfield.floor_y);
        assert!(l.projectiles().is_empty());
    }

    #[test]
    fn test_zone_potion_always_leaves_zone() {
        let mut l = launcher();
        let playfield = Playfield::default();
        l.select_payload(Some(Potion::new("Mud", PotionCategory::Zone, "slow trap")));
        l.fire();
        let impacts = run_until_impact(&mut l, &playfield, &[]);
        assert_eq!(impacts[0].zones.len(), 1);
    }

    #[test]
    fn test_direct_hit_registers_enemy() {
        let mut l = launcher();
        let playfield = Playfield::default();
        l.aim(0.0, 10.0);
        let target = Enemy::new(EnemyId(9), Vec2::new(160.0, 405.0), 0.0, 100.0, false);
        l.fire();
        let impacts = run_until_impact(&mut l, &playfield, std::slice::from_ref(&target));
        assert_eq!(impacts[0].hits, vec![EnemyId(9)]);
        assert_eq!(impacts[0].point, target.position);
        assert_eq!(impacts[0].zones.len(), 1);
    }

    #[test]
    fn test_out_of_bounds_produces_no_impact() {
        let mut l = launcher();
        let playfield = Playfield {
            width: 150.0,
            ..Default::default()
        };
        l.aim(60.0, 10.0);
        l.fire();
        let impacts = run_until_impact(&mut l, &playfield, &[]);
        assert!(impacts.is_empty());
        assert!(l.projectiles().is_empty());
    }

    #[test]
    fn test_preview_uses_payload_speed() {
        let mut l = launcher();
        let playfield = Playfield::default();
        let stone = l.preview(&playfield);
        l.select_payload(Some(Potion::new("Fire", PotionCategory::Attack, "damage")));
        let potion = l.preview(&playfield);
        assert!(stone[0].x - l.origin().x > potion[0].x - l.origin().x);
    }
}
