//! AI-controlled enemies
//!
//! All three kinds share one steering and one shooting routine; only the
//! tuning constants differ.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Bounds, Circle};
use super::projectile::Rocket;
use crate::tuning::{EnemyTuning, RocketTuning};
use crate::{bearing, heading, normalize_angle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Scout,
    Fighter,
    Destroyer,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Scout, EnemyKind::Fighter, EnemyKind::Destroyer];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Scout => "scout",
            EnemyKind::Fighter => "fighter",
            EnemyKind::Destroyer => "destroyer",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    pub size: f32,
    pub health: f32,
    pub max_health: f32,
    pub ammo: f32,
    pub max_ammo: f32,
    pub last_shot_tick: u64,
    pub current_speed: f32,
    pub target_speed: f32,
    /// Current turn rate (radians per tick), blended with inertia
    pub rotation_speed: f32,
    /// Outward wrap margin; starts wide enough to cover the off-screen spawn
    /// point and narrows to `size` once the enemy has been on screen
    pub wrap_margin: f32,
    pub active: bool,
}

impl Enemy {
    pub fn new(
        id: u32,
        kind: EnemyKind,
        pos: Vec2,
        rotation: f32,
        spawn_tick: u64,
        spawn_margin: f32,
        tuning: &EnemyTuning,
    ) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            rotation: normalize_angle(rotation),
            size: tuning.size,
            health: tuning.health,
            max_health: tuning.health,
            ammo: tuning.max_ammo,
            max_ammo: tuning.max_ammo,
            last_shot_tick: spawn_tick,
            current_speed: 0.0,
            target_speed: tuning.min_speed,
            rotation_speed: 0.0,
            wrap_margin: spawn_margin.max(0.0) + tuning.size,
            active: true,
        }
    }

    /// Steer toward the player, integrate and wrap
    pub fn update(&mut self, player: Vec2, bounds: &Bounds, tuning: &EnemyTuning) {
        if !self.active {
            return;
        }

        // Turn: blend a capped target turn rate into the current one
        let diff = normalize_angle(bearing(self.pos, player) - self.rotation);
        let target_turn = diff.clamp(-tuning.rotation_speed, tuning.rotation_speed);
        let inertia = tuning.rotation_inertia;
        self.rotation_speed = self.rotation_speed * inertia + target_turn * (1.0 - inertia);
        self.rotation = normalize_angle(self.rotation + self.rotation_speed);

        // Between the two radii the previous target is kept
        let distance = self.pos.distance(player);
        if distance > tuning.acceleration_distance {
            self.target_speed = tuning.max_speed;
        } else if distance < tuning.deceleration_distance {
            self.target_speed = tuning.min_speed;
        }

        if self.current_speed < self.target_speed {
            self.current_speed = (self.current_speed + tuning.acceleration).min(self.target_speed);
        } else if self.current_speed > self.target_speed {
            self.current_speed = (self.current_speed - tuning.deceleration).max(self.target_speed);
        }

        self.vel = heading(self.rotation) * self.current_speed;
        self.pos += self.vel;

        if bounds.contains(self.pos, 0.0) {
            self.wrap_margin = self.size;
        }
        self.pos = bounds.wrap(self.pos, self.wrap_margin);

        if self.ammo < self.max_ammo {
            self.ammo = (self.ammo + tuning.ammo_recharge).min(self.max_ammo);
        }
    }

    /// Fire a rocket at `target` if the cooldown has elapsed and a full
    /// round of ammo is available
    pub fn shoot(
        &mut self,
        tick: u64,
        target: Vec2,
        now_ms: u64,
        tuning: &EnemyTuning,
        rocket: &RocketTuning,
    ) -> Option<Rocket> {
        if !self.active || self.ammo < 1.0 {
            return None;
        }
        if tick.saturating_sub(self.last_shot_tick) < tuning.shoot_cooldown_ticks {
            return None;
        }

        self.last_shot_tick = tick;
        self.ammo -= 1.0;

        let muzzle = self.pos + heading(self.rotation) * self.size * rocket.launch_distance;
        Some(Rocket::new(muzzle, target, now_ms, Some(self.id), rocket))
    }

    /// Apply damage. Returns true only on the hit that destroys the enemy.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.active {
            return false;
        }
        self.health -= amount;
        if self.health <= 0.0 {
            self.active = false;
            return true;
        }
        false
    }

    pub fn health_ratio(&self) -> f32 {
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    pub fn ammo_ratio(&self) -> f32 {
        if self.max_ammo > 0.0 {
            (self.ammo / self.max_ammo).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

impl Circle for Enemy {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.size
    }
}
