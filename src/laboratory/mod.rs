//! The defended structure.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::LaboratoryConfig;
use crate::constants::LAB_UPGRADE_MULT;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Laboratory {
    pub health: f32,
    pub max_health: f32,
    pub level: u32,
}

impl Default for Laboratory {
    fn default() -> Self {
        Self::new(&LaboratoryConfig::default())
    }
}

impl Laboratory {
    pub fn new(tuning: &LaboratoryConfig) -> Self {
        Self {
            health: tuning.max_health,
            max_health: tuning.max_health,
            level: 1,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0.0
    }

    pub fn health_ratio(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    /// Returns true once the laboratory is destroyed.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        self.health = (self.health - amount.max(0.0)).max(0.0);
        warn!(amount, health = self.health, "Laboratory damaged");
        self.is_destroyed()
    }

    pub fn repair(&mut self, amount: f32) {
        self.health = (self.health + amount.max(0.0)).min(self.max_health);
    }

    /// Raise max health and heal half of the gain. Returns the new level.
    pub fn upgrade(&mut self) -> u32 {
        let old_max = self.max_health;
        self.max_health = (old_max * LAB_UPGRADE_MULT).floor();
        let bonus = ((self.max_health - old_max) / 2.0).floor();
        self.health = (self.health + bonus).min(self.max_health);
        self.level += 1;

        info!(level = self.level, max_health = self.max_health, "Laboratory upgraded");
        self.level
    }
}
