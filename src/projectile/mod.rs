//! Ballistic integrator for thrown potions and stones.
//!
//! Screen coordinates: `x` grows to the right, `y` grows downward, so a
//! positive launch angle produces a negative initial `vy` and gravity adds
//! to `vy` every tick.

use std::collections::VecDeque;

use bevy::math::{Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::config::{LauncherConfig, Playfield};
use crate::constants::{MAX_ANGLE_DEG, MAX_POWER, MIN_ANGLE_DEG, MIN_POWER};
use crate::enemy::{Enemy, EnemyId};
use crate::potion::Payload;

/// Clamp a launch angle into [0, 90] degrees. NaN falls back to horizontal.
pub fn clamp_angle(angle_degrees: f32) -> f32 {
    if angle_degrees.is_nan() {
        return MIN_ANGLE_DEG;
    }
    angle_degrees.clamp(MIN_ANGLE_DEG, MAX_ANGLE_DEG)
}

/// Clamp a launch power into [1, 10]. NaN falls back to the weakest throw.
pub fn clamp_power(power: f32) -> f32 {
    if power.is_nan() {
        return MIN_POWER;
    }
    power.clamp(MIN_POWER, MAX_POWER)
}

/// Initial velocity for a throw
pub fn launch_velocity(angle_degrees: f32, power: f32, speed_factor: f32) -> Vec2 {
    let rad = clamp_angle(angle_degrees).to_radians();
    let speed = clamp_power(power) * speed_factor;
    Vec2::new(rad.cos() * speed, -rad.sin() * speed)
}

/// Result of advancing a projectile by one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Flight {
    InFlight,
    /// Overlapped a live enemy's hitbox; impact at the enemy's position
    HitEnemy { enemy: EnemyId, point: Vec2 },
    /// Crossed the floor plane; impact where the path meets the floor
    HitFloor { point: Vec2 },
    /// Left the horizontal bounds; no impact
    OutOfBounds,
}

impl Flight {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InFlight)
    }

    pub fn impact_point(&self) -> Option<Vec2> {
        match self {
            Self::HitEnemy { point, .. } | Self::HitFloor { point } => Some(*point),
            Self::InFlight | Self::OutOfBounds => None,
        }
    }
}

/// A potion or stone in flight
#[derive(Debug, Clone)]
pub struct ProjectileBody {
    pub position: Vec2,
    pub velocity: Vec2,
    angle_degrees: f32,
    power: f32,
    gravity: f32,
    payload: Payload,
    previous: Vec2,
    trail: VecDeque<Vec2>,
    trail_capacity: usize,
}

impl ProjectileBody {
    pub fn create(
        origin: Vec2,
        angle_degrees: f32,
        power: f32,
        payload: Payload,
        tuning: &LauncherConfig,
    ) -> Self {
        let angle_degrees = clamp_angle(angle_degrees);
        let power = clamp_power(power);
        let velocity = launch_velocity(angle_degrees, power, payload.speed_factor(tuning));
        let trail_capacity = tuning.trail_length.max(1);

        Self {
            position: origin,
            velocity,
            angle_degrees,
            power,
            gravity: tuning.gravity,
            payload,
            previous: origin,
            trail: VecDeque::with_capacity(trail_capacity + 1),
            trail_capacity,
        }
    }

    pub fn angle_degrees(&self) -> f32 {
        self.angle_degrees
    }

    pub fn power(&self) -> f32 {
        self.power
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn into_payload(self) -> Payload {
        self.payload
    }

    /// Recent positions, oldest first (render only)
    pub fn trail(&self) -> impl Iterator<Item = &Vec2> {
        self.trail.iter()
    }

    pub fn hitbox(&self) -> Rect {
        Rect::from_center_size(self.position, Vec2::splat(self.payload.hitbox_size()))
    }

    /// Integrate one tick: gravity first, then position.
    pub fn step(&mut self, dt: f32) {
        self.previous = self.position;
        self.velocity.y += self.gravity * dt;
        self.position += self.velocity * dt;

        self.trail.push_back(self.position);
        while self.trail.len() > self.trail_capacity {
            self.trail.pop_front();
        }
    }

    /// Integrate one tick and resolve termination.
    ///
    /// Enemy overlap is checked before the floor so a shot that reaches an
    /// enemy standing on the floor hits the enemy.
    pub fn advance(&mut self, dt: f32, playfield: &Playfield, enemies: &[Enemy]) -> Flight {
        self.step(dt);

        let hitbox = self.hitbox();
        if let Some(enemy) = enemies
            .iter()
            .filter(|e| e.is_alive())
            .find(|e| !hitbox.intersect(e.hitbox()).is_empty())
        {
            return Flight::HitEnemy {
                enemy: enemy.id,
                point: enemy.position,
            };
        }

        if self.position.y >= playfield.floor_y {
            return Flight::HitFloor {
                point: self.floor_crossing(playfield.floor_y),
            };
        }

        if !playfield.in_horizontal_bounds(self.position.x) {
            return Flight::OutOfBounds;
        }

        Flight::InFlight
    }

    fn floor_crossing(&self, floor_y: f32) -> Vec2 {
        let dy = self.position.y - self.previous.y;
        if self.previous.y >= floor_y || dy.abs() <= f32::EPSILON {
            return Vec2::new(self.position.x, floor_y);
        }
        let t = (floor_y - self.previous.y) / dy;
        Vec2::new(self.previous.x + (self.position.x - self.previous.x) * t, floor_y)
    }
}

/// Aiming preview: the path a throw would follow, sampled every `dt`.
///
/// Stops at the first point that leaves the horizontal bounds or reaches
/// the floor (that point is included).
#[allow(clippy::too_many_arguments)]
pub fn predict_trajectory(
    origin: Vec2,
    angle_degrees: f32,
    power: f32,
    speed_factor: f32,
    gravity: f32,
    playfield: &Playfield,
    steps: usize,
    dt: f32,
) -> Vec<Vec2> {
    let mut position = origin;
    let mut velocity = launch_velocity(angle_degrees, power, speed_factor);
    let mut points = Vec::with_capacity(steps);

    for _ in 0..steps {
        velocity.y += gravity * dt;
        position += velocity * dt;
        points.push(position);

        if position.y >= playfield.floor_y || !playfield.in_horizontal_bounds(position.x) {
            break;
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::potion::{Potion, PotionCategory};

    fn potion_payload() -> Payload {
        Payload::Potion(Potion::new("Water", PotionCategory::Status, "slow"))
    }

    #[test]
    fn test_clamping() {
        assert_eq!(clamp_angle(-30.0), 0.0);
        assert_eq!(clamp_angle(120.0), 90.0);
        assert_eq!(clamp_angle(f32::NAN), 0.0);
        assert_eq!(clamp_power(0.0), 1.0);
        assert_eq!(clamp_power(99.0), 10.0);
        assert_eq!(clamp_power(f32::NAN), 1.0);
    }

    #[test]
    fn test_initial_velocity() {
        let tuning = LauncherConfig::default();
        let body = ProjectileBody::create(Vec2::ZERO, 90.0, 4.0, potion_payload(), &tuning);
        assert!(body.velocity.x.abs() < 1e-4);
        assert!((body.velocity.y + 20.0).abs() < 1e-4, "straight up at 4 * 5");

        let stone = ProjectileBody::create(Vec2::ZERO, 0.0, 4.0, Payload::Stone, &tuning);
        assert!((stone.velocity.x - 50.0).abs() < 1e-4, "stone K is 12.5");
        assert_eq!(stone.velocity.y, 0.0);
    }

    #[test]
    fn test_step_applies_gravity_before_position() {
        let tuning = LauncherConfig::default();
        let mut body = ProjectileBody::create(Vec2::ZERO, 0.0, 2.0, potion_payload(), &tuning);
        body.step(1.0);
        assert!((body.velocity.y - 9.8).abs() < 1e-5);
        assert!((body.position.y - 9.8).abs() < 1e-5);
        assert!((body.position.x - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_trail_is_bounded_fifo() {
        let tuning = LauncherConfig {
            trail_length: 3,
            ..Default::default()
        };
        let mut body = ProjectileBody::create(Vec2::ZERO, 45.0, 5.0, potion_payload(), &tuning);
        for _ in 0..5 {
            body.step(0.1);
        }
        let trail: Vec<Vec2> = body.trail().copied().collect();
        assert_eq!(trail.len(), 3);
        assert_eq!(*trail.last().unwrap(), body.position);
    }

    #[test]
    fn test_floor_hit_interpolates() {
        let tuning = LauncherConfig::default();
        let playfield = Playfield::default();
        let mut body = ProjectileBody::create(
            Vec2::new(100.0, playfield.floor_y - 1.0),
            0.0,
            10.0,
            potion_payload(),
            &tuning,
        );
        let mut outcome = Flight::InFlight;
        for _ in 0..200 {
            outcome = body.advance(0.05, &playfield, &[]);
            if outcome.is_terminal() {
                break;
            }
        }
        match outcome {
            Flight::HitFloor { point } => {
                assert_eq!(point.y, playfield.floor_y);
                assert!(point.x > 100.0 && point.x <= body.position.x);
            }
            other => panic!("expected floor hit, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_bounds_is_silent() {
        let tuning = LauncherConfig::default();
        let playfield = Playfield {
            width: 120.0,
            ..Default::default()
        };
        let mut body = ProjectileBody::create(Vec2::new(100.0, 100.0), 0.0, 10.0, Payload::Stone, &tuning);
        let outcome = body.advance(1.0, &playfield, &[]);
        assert_eq!(outcome, Flight::OutOfBounds);
        assert!(outcome.impact_point().is_none());
    }

    #[test]
    fn test_preview_ends_at_floor() {
        let playfield = Playfield::default();
        let points = predict_trajectory(
            Vec2::new(100.0, 405.0),
            45.0,
            5.0,
            5.0,
            9.8,
            &playfield,
            30,
            0.1,
        );
        assert!(!points.is_empty());
        assert!(points.len() <= 30);
    }
}
