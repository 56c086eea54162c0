//! Per-enemy status effects.
//!
//! Four orthogonal timed modifiers (slow, burn, freeze, blind) plus the
//! hit-flash window used by the renderer. There is no combined state
//! machine: each timer decays and expires on its own.

use serde::{Deserialize, Serialize};

use crate::constants::HIT_FLASH_SECS;

/// Status effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusType {
    Slowed,   // reduced move speed
    Burning,  // damage per second
    Frozen,   // no movement at all
    Blinded,  // random direction flips
    HitFlash, // cosmetic
}

/// One flag + countdown pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimedModifier {
    pub active: bool,
    pub remaining: f32,
}

impl TimedModifier {
    /// Activate, never shortening what is left.
    pub fn extend(&mut self, seconds: f32) {
        let current = if self.active { self.remaining } else { 0.0 };
        self.remaining = current.max(seconds);
        self.active = self.remaining > 0.0;
    }

    /// Count down; returns true on the tick the modifier expires.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.active {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.active = false;
            self.remaining = 0.0;
            return true;
        }
        false
    }
}

/// Component-style status block owned by each enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffectState {
    pub slow: TimedModifier,
    /// 1.0 = normal speed, 0.0 = stopped
    pub slow_factor: f32,
    pub burn: TimedModifier,
    pub burn_dps: f32,
    pub freeze: TimedModifier,
    pub blind: TimedModifier,
    pub hit_flash: TimedModifier,
}

impl Default for StatusEffectState {
    fn default() -> Self {
        Self {
            slow: TimedModifier::default(),
            slow_factor: 1.0,
            burn: TimedModifier::default(),
            burn_dps: 0.0,
            freeze: TimedModifier::default(),
            blind: TimedModifier::default(),
            hit_flash: TimedModifier::default(),
        }
    }
}

impl StatusEffectState {
    /// Slow: keeps the stronger factor and the longer duration.
    pub fn apply_slow(&mut self, factor: f32, seconds: f32) {
        let factor = factor.clamp(0.0, 1.0);
        self.slow_factor = if self.slow.active {
            self.slow_factor.min(factor)
        } else {
            factor
        };
        self.slow.extend(seconds);
        if !self.slow.active {
            self.slow_factor = 1.0;
        }
    }

    /// Burn: keeps the higher damage and the longer duration.
    pub fn apply_burn(&mut self, damage_per_second: f32, seconds: f32) {
        let dps = damage_per_second.max(0.0);
        self.burn_dps = if self.burn.active {
            self.burn_dps.max(dps)
        } else {
            dps
        };
        self.burn.extend(seconds);
    }

    pub fn apply_freeze(&mut self, seconds: f32) {
        self.freeze.extend(seconds);
    }

    pub fn apply_blind(&mut self, seconds: f32) {
        self.blind.extend(seconds);
    }

    pub fn flash(&mut self) {
        self.hit_flash.extend(HIT_FLASH_SECS);
    }

    /// Decay every timer by `dt`. Returns the burn damage dealt this tick,
    /// bounded by the burn time that was actually left.
    pub fn tick(&mut self, dt: f32) -> f32 {
        let burn_damage = if self.burn.active {
            self.burn_dps * dt.min(self.burn.remaining)
        } else {
            0.0
        };

        if self.burn.tick(dt) {
            self.burn_dps = 0.0;
        }
        if self.slow.tick(dt) {
            self.slow_factor = 1.0;
        }
        self.freeze.tick(dt);
        self.blind.tick(dt);
        self.hit_flash.tick(dt);

        burn_damage
    }

    pub fn is_slowed(&self) -> bool {
        self.slow.active
    }

    pub fn is_burning(&self) -> bool {
        self.burn.active
    }

    pub fn is_frozen(&self) -> bool {
        self.freeze.active
    }

    pub fn is_blinded(&self) -> bool {
        self.blind.active
    }

    pub fn is_flashing(&self) -> bool {
        self.hit_flash.active
    }

    /// Movement speed modifier (1.0 = normal)
    pub fn speed_multiplier(&self) -> f32 {
        if self.is_frozen() {
            0.0
        } else if self.is_slowed() {
            self.slow_factor
        } else {
            1.0
        }
    }

    pub fn remaining(&self, status: StatusType) -> f32 {
        match status {
            StatusType::Slowed => self.slow.remaining,
            StatusType::Burning => self.burn.remaining,
            StatusType::Frozen => self.freeze.remaining,
            StatusType::Blinded => self.blind.remaining,
            StatusType::HitFlash => self.hit_flash.remaining,
        }
    }

    pub fn has(&self, status: StatusType) -> bool {
        match status {
            StatusType::Slowed => self.is_slowed(),
            StatusType::Burning => self.is_burning(),
            StatusType::Frozen => self.is_frozen(),
            StatusType::Blinded => self.is_blinded(),
            StatusType::HitFlash => self.is_flashing(),
        }
    }

    pub fn active(&self) -> Vec<StatusType> {
        [
            StatusType::Slowed,
            StatusType::Burning,
            StatusType::Frozen,
            StatusType::Blinded,
            StatusType::HitFlash,
        ]
        .into_iter()
        .filter(|s| self.has(*s))
        .collect()
    }
}
