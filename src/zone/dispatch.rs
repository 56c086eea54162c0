//! Potion text to zone effect.
//!
//! Rules are checked top to bottom against the lowercased name and
//! description; the first rule whose keywords match builds the zone. The
//! last rule matches everything, so dispatch is total.

use bevy::math::Vec2;
use tracing::debug;

use super::{ZoneArchetype, ZoneEffect, ZoneProfile};
use crate::constants::{EXPLOSION_BASE_SIZE, EXPLOSION_RADIUS_MULT};

const EXPLOSION_TINT: [u8; 3] = [255, 100, 0];
const FIRE_TINT: [u8; 3] = [255, 60, 0];
const SMOKE_TINT: [u8; 3] = [150, 150, 150];
const MUD_TINT: [u8; 3] = [110, 80, 40];
const WATER_TINT: [u8; 3] = [0, 100, 255];
const WIND_TINT: [u8; 3] = [200, 220, 230];
const CRYSTAL_TINT: [u8; 3] = [150, 220, 255];
const EARTH_TINT: [u8; 3] = [139, 90, 43];

struct DispatchRule {
    keywords: &'static [&'static str],
    build: fn(&str, Vec2) -> ZoneEffect,
}

const RULES: &[DispatchRule] = &[
    DispatchRule {
        keywords: &["fire", "lava", "explosion", "burn"],
        build: fire,
    },
    DispatchRule {
        keywords: &["smoke", "vapor", "fog"],
        build: smoke,
    },
    DispatchRule {
        keywords: &["water", "mud"],
        build: water,
    },
    DispatchRule {
        keywords: &["wind", "tornado", "storm"],
        build: tornado,
    },
    DispatchRule {
        keywords: &["crystal", "freeze", "ice"],
        build: crystal,
    },
    DispatchRule {
        keywords: &["earth", "stone", "dust"],
        build: earth,
    },
];

fn mentions(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

fn explosion(center: Vec2, tint: [u8; 3]) -> ZoneEffect {
    ZoneEffect::new(
        ZoneArchetype::Explosion,
        center,
        EXPLOSION_BASE_SIZE * EXPLOSION_RADIUS_MULT,
        0.8,
        tint,
        ZoneProfile::damage(30.0),
    )
}

fn smoke_zone(center: Vec2, tint: [u8; 3]) -> ZoneEffect {
    ZoneEffect::new(
        ZoneArchetype::Smoke,
        center,
        80.0,
        3.0,
        tint,
        ZoneProfile {
            slow_factor: 0.7,
            blind_duration: 1.0,
            ..Default::default()
        },
    )
}

fn fire(text: &str, center: Vec2) -> ZoneEffect {
    if mentions(text, &["zone", "persistent", "puddle"]) {
        ZoneEffect::new(
            ZoneArchetype::FirePuddle,
            center,
            70.0,
            5.0,
            FIRE_TINT,
            ZoneProfile::damage(20.0),
        )
    } else {
        explosion(center, EXPLOSION_TINT)
    }
}

fn smoke(_text: &str, center: Vec2) -> ZoneEffect {
    smoke_zone(center, SMOKE_TINT)
}

fn water(text: &str, center: Vec2) -> ZoneEffect {
    if mentions(text, &["mud", "slow", "trap"]) {
        ZoneEffect::new(ZoneArchetype::Mud, center, 80.0, 4.0, MUD_TINT, ZoneProfile::slow(0.3))
    } else {
        ZoneEffect::new(
            ZoneArchetype::WaterSplash,
            center,
            60.0,
            0.8,
            WATER_TINT,
            ZoneProfile::slow(0.5),
        )
    }
}

fn tornado(_text: &str, center: Vec2) -> ZoneEffect {
    ZoneEffect::new(
        ZoneArchetype::Tornado,
        center,
        60.0,
        4.0,
        WIND_TINT,
        ZoneProfile {
            damage_per_second: 15.0,
            repel_force: 2.0,
            ..Default::default()
        },
    )
}

fn crystal(_text: &str, center: Vec2) -> ZoneEffect {
    ZoneEffect::new(
        ZoneArchetype::Crystal,
        center,
        40.0,
        3.0,
        CRYSTAL_TINT,
        ZoneProfile {
            stun_duration: 2.0,
            ..Default::default()
        },
    )
}

fn earth(text: &str, center: Vec2) -> ZoneEffect {
    if text.contains("dust") {
        smoke_zone(center, EARTH_TINT)
    } else {
        explosion(center, EARTH_TINT)
    }
}

/// Build the zone a potion leaves at its impact point.
pub fn create_effect_for_potion(name: &str, description: &str, x: f32, y: f32) -> ZoneEffect {
    let text = format!("{name} {description}").to_lowercase();
    let center = Vec2::new(x, y);

    let effect = RULES
        .iter()
        .find(|rule| mentions(&text, rule.keywords))
        .map(|rule| (rule.build)(&text, center))
        .unwrap_or_else(|| explosion(center, EXPLOSION_TINT));

    debug!(
        potion = name,
        archetype = ?effect.archetype,
        radius = effect.radius,
        x,
        y,
        "Zone effect created"
    );
    effect
}
