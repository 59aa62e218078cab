//! The player's ship

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Bounds, Circle};
use super::projectile::Laser;
use crate::heading;
use crate::tuning::{LaserTuning, ShipTuning};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading in radians (0 = +x)
    pub rotation: f32,
    pub size: f32,
    pub ammo: f32,
    pub max_ammo: f32,
    /// Tick of the last successful shot. Starts at 0, so the first shot
    /// waits out one cooldown.
    pub last_shot_tick: u64,
}

impl Ship {
    /// Fresh ship at rest, full ammo, facing +x
    pub fn new(pos: Vec2, tuning: &ShipTuning) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            rotation: 0.0,
            size: tuning.size,
            ammo: tuning.max_ammo,
            max_ammo: tuning.max_ammo,
            last_shot_tick: 0,
        }
    }

    /// Forward thrust, clamped to `max_speed`
    pub fn thrust(&mut self, tuning: &ShipTuning) {
        self.vel += heading(self.rotation) * tuning.acceleration;
        let speed = self.vel.length();
        if speed > tuning.max_speed {
            self.vel = self.vel / speed * tuning.max_speed;
        }
    }

    /// Reverse thrust. Not clamped, so the ship can exceed max speed backward.
    pub fn reverse(&mut self, tuning: &ShipTuning) {
        self.vel -= heading(self.rotation) * tuning.acceleration;
    }

    pub fn turn_left(&mut self, tuning: &ShipTuning) {
        self.rotation -= tuning.turn_degrees_per_tick.to_radians();
    }

    pub fn turn_right(&mut self, tuning: &ShipTuning) {
        self.rotation += tuning.turn_degrees_per_tick.to_radians();
    }

    /// Integrate position, wrap at the bare screen edge, recharge ammo
    pub fn update(&mut self, bounds: &Bounds, tuning: &ShipTuning) {
        self.pos += self.vel;
        self.pos = bounds.wrap(self.pos, 0.0);
        if self.ammo < self.max_ammo {
            self.ammo = (self.ammo + tuning.ammo_recharge).min(self.max_ammo);
        }
    }

    /// Try to fire. Returns `None` when out of ammo or still cooling down.
    pub fn shoot(&mut self, tick: u64, tuning: &ShipTuning, laser: &LaserTuning) -> Option<Laser> {
        if self.ammo <= 0.0 {
            return None;
        }
        if tick.saturating_sub(self.last_shot_tick) < tuning.shot_cooldown_ticks {
            return None;
        }

        self.ammo = (self.ammo - tuning.shot_cost).max(0.0);
        self.last_shot_tick = tick;

        let muzzle = self.pos + heading(self.rotation) * self.size * tuning.gun_length;
        Some(Laser::new(muzzle, self.rotation, laser))
    }

    pub fn ammo_ratio(&self) -> f32 {
        if self.max_ammo > 0.0 {
            self.ammo / self.max_ammo
        } else {
            0.0
        }
    }
}

impl Circle for Ship {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.size
    }
}
