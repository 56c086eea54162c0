//! Potions, enhancement stones and projectile payloads.
//!
//! Potions are crafted elsewhere and arrive here as plain records. Their
//! free-text effect description drives what happens on a direct hit, so it
//! is parsed once into [`EffectKeywords`].

use serde::{Deserialize, Serialize};

use crate::config::LauncherConfig;
use crate::constants::{
    POTION_HITBOX_SIZE, STONE_DESCRIPTION, STONE_DURATION, STONE_HITBOX_SIZE, STONE_NAME,
    STONE_POWER,
};

/// Potion category from the crafting tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PotionCategory {
    Attack,
    Defense,
    Status,
    Zone,
}

/// Identity of one crafted potion instance. `PotionId(0)` until the
/// owning inventory assigns one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PotionId(pub u64);

/// Keywords recognised in an effect description
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectKeywords {
    pub damage: bool,
    pub burn: bool,
    pub slow: bool,
    pub dodge: bool,
    pub fog: bool,
    pub blind: bool,
    pub zone: bool,
}

impl EffectKeywords {
    pub fn parse(description: &str) -> Self {
        let text = description.to_lowercase();
        let has = |word: &str| text.contains(word);
        Self {
            damage: has("damage"),
            burn: has("burn"),
            slow: has("slow"),
            dodge: has("dodge"),
            fog: has("fog"),
            blind: has("blind"),
            zone: has("zone"),
        }
    }
}

/// A crafted potion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Potion {
    pub id: PotionId,
    pub name: String,
    pub category: PotionCategory,
    pub description: String,
    pub power: u32,
    pub duration: u32,
}

impl Potion {
    pub fn new(
        name: impl Into<String>,
        category: PotionCategory,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: PotionId::default(),
            name: name.into(),
            category,
            description: description.into(),
            power: 1,
            duration: 1,
        }
    }

    /// Override base stats (both floored at 1)
    pub fn with_stats(mut self, power: u32, duration: u32) -> Self {
        self.power = power.max(1);
        self.duration = duration.max(1);
        self
    }

    pub fn keywords(&self) -> EffectKeywords {
        EffectKeywords::parse(&self.description)
    }

    /// Consume a stone, raising the matching stat by one.
    pub fn apply_enhancement(&mut self, stone: EnhancementStone) {
        match stone.kind {
            StoneKind::Power => self.power += 1,
            StoneKind::Duration => self.duration += 1,
        }
    }

    /// Apply the two stone slots of the crafting bench, returning what was applied.
    pub fn enhance(&mut self, slots: [Option<EnhancementStone>; 2]) -> Vec<StoneKind> {
        let mut applied = Vec::new();
        for stone in slots.into_iter().flatten() {
            applied.push(stone.kind);
            self.apply_enhancement(stone);
        }
        applied
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoneKind {
    Power,
    Duration,
}

/// Single-use modifier. Not `Clone`: applying it moves it out of play.
#[derive(Debug, PartialEq, Eq)]
pub struct EnhancementStone {
    kind: StoneKind,
}

impl EnhancementStone {
    pub fn new(kind: StoneKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> StoneKind {
        self.kind
    }
}

/// What a projectile carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    Potion(Potion),
    /// Infinite low-power fallback thrown when nothing is selected
    Stone,
}

impl Payload {
    pub fn name(&self) -> &str {
        match self {
            Self::Potion(p) => &p.name,
            Self::Stone => STONE_NAME,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Self::Potion(p) => &p.description,
            Self::Stone => STONE_DESCRIPTION,
        }
    }

    pub fn power(&self) -> u32 {
        match self {
            Self::Potion(p) => p.power,
            Self::Stone => STONE_POWER,
        }
    }

    pub fn duration(&self) -> u32 {
        match self {
            Self::Potion(p) => p.duration,
            Self::Stone => STONE_DURATION,
        }
    }

    pub fn category(&self) -> PotionCategory {
        match self {
            Self::Potion(p) => p.category,
            Self::Stone => PotionCategory::Attack,
        }
    }

    pub fn keywords(&self) -> EffectKeywords {
        EffectKeywords::parse(self.description())
    }

    pub fn is_zone(&self) -> bool {
        self.category() == PotionCategory::Zone
    }

    pub fn is_stone(&self) -> bool {
        matches!(self, Self::Stone)
    }

    /// Launch velocity per unit of power; stones fly faster than potions.
    pub fn speed_factor(&self, launcher: &LauncherConfig) -> f32 {
        match self {
            Self::Potion(_) => launcher.potion_speed_factor,
            Self::Stone => launcher.stone_speed_factor,
        }
    }

    pub fn hitbox_size(&self) -> f32 {
        match self {
            Self::Potion(_) => POTION_HITBOX_SIZE,
            Self::Stone => STONE_HITBOX_SIZE,
        }
    }
}

impl From<Option<Potion>> for Payload {
    fn from(potion: Option<Potion>) -> Self {
        potion.map_or(Self::Stone, Self::Potion)
    }
}
