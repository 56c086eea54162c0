//! Render-facing view of a defense encounter.
//!
//! Plain data only; the render layer never touches simulation types.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use super::DefenseController;
use crate::constants::STONE_NAME;
use crate::enemy::{Enemy, EnemyId};
use crate::projectile::ProjectileBody;
use crate::status::StatusType;
use crate::zone::{ZoneArchetype, ZoneEffect};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LauncherView {
    pub origin: Vec2,
    pub angle_degrees: f32,
    pub power: f32,
    /// Name of what the next shot will carry
    pub payload: String,
    pub preview: Vec<Vec2>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub position: Vec2,
    pub payload: String,
    pub trail: Vec<Vec2>,
}

impl From<&ProjectileBody> for ProjectileView {
    fn from(body: &ProjectileBody) -> Self {
        Self {
            position: body.position,
            payload: body.payload().name().to_string(),
            trail: body.trail().copied().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: EnemyId,
    pub position: Vec2,
    pub health_ratio: f32,
    pub flying: bool,
    pub flashing: bool,
    pub status: Vec<StatusType>,
}

impl From<&Enemy> for EnemyView {
    fn from(enemy: &Enemy) -> Self {
        Self {
            id: enemy.id,
            position: enemy.position,
            health_ratio: enemy.health_ratio(),
            flying: enemy.flying,
            flashing: enemy.status.is_flashing(),
            status: enemy.status.active(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneView {
    pub archetype: ZoneArchetype,
    pub center: Vec2,
    pub radius: f32,
    pub progress: f32,
    pub tint: [u8; 3],
}

impl From<&ZoneEffect> for ZoneView {
    fn from(zone: &ZoneEffect) -> Self {
        Self {
            archetype: zone.archetype,
            center: zone.center,
            radius: zone.radius,
            progress: zone.progress(),
            tint: zone.tint,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenseSnapshot {
    pub wave: u32,
    pub score: u64,
    pub wave_time_left: f32,
    pub game_over: bool,
    pub lab_health: f32,
    pub lab_max_health: f32,
    pub inventory: Vec<String>,
    pub selected: Option<usize>,
    pub launcher: LauncherView,
    pub projectiles: Vec<ProjectileView>,
    pub enemies: Vec<EnemyView>,
    pub zones: Vec<ZoneView>,
}

impl DefenseSnapshot {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}

impl DefenseController {
    pub fn snapshot(&self) -> DefenseSnapshot {
        let launcher = self.launcher();
        let payload = launcher
            .selected()
            .map_or(STONE_NAME, |p| p.name.as_str())
            .to_string();

        DefenseSnapshot {
            wave: self.wave(),
            score: self.score(),
            wave_time_left: self.wave_time_left(),
            game_over: self.is_game_over(),
            lab_health: self.laboratory().health,
            lab_max_health: self.laboratory().max_health,
            inventory: self.inventory().iter().map(|p| p.name.clone()).collect(),
            selected: self.selected_index(),
            launcher: LauncherView {
                origin: launcher.origin(),
                angle_degrees: launcher.angle_degrees(),
                power: launcher.power(),
                payload,
                preview: self.preview(),
            },
            projectiles: launcher.projectiles().iter().map(ProjectileView::from).collect(),
            enemies: self.waves().enemies().iter().map(EnemyView::from).collect(),
            zones: self.zones().iter().map(ZoneView::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DefenseConfig;
    use crate::potion::{Potion, PotionCategory};

    #[test]
    fn test_snapshot_reflects_state() {
        let mut c = DefenseController::with_inventory(
            DefenseConfig::default(),
            vec![Potion::new("Fire", PotionCategory::Attack, "damage burn")],
        );
        c.waves_mut()
            .place_enemy(Vec2::new(500.0, 410.0), 30.0, 100.0, false);
        c.fire();
        c.update(0.1);

        let snap = c.snapshot();
        assert_eq!(snap.wave, 1);
        assert_eq!(snap.lab_health, 100.0);
        assert!(snap.inventory.is_empty());
        assert_eq!(snap.launcher.payload, "Stone");
        assert_eq!(snap.projectiles.len(), 1);
        assert_eq!(snap.projectiles[0].payload, "Fire");
        assert_eq!(snap.projectiles[0].trail.len(), 1);
        assert_eq!(snap.enemies.len(), 1);
        assert!(!snap.launcher.preview.is_empty());
    }

    #[test]
    fn test_snapshot_json() {
        let snap = DefenseController::default().snapshot();
        let json = snap.to_json();
        assert!(json.contains("\"wave\":1"));
        assert_eq!(DefenseSnapshot::from_json(&json), Some(snap));
    }
}
