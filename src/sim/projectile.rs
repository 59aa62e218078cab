//! Lasers (ship-fired) and rockets (enemy-fired)
//!
//! Lasers expire by tick count, rockets by wall-clock age. Both die on leaving
//! the visible area; neither wraps.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Bounds, Circle};
use crate::heading;
use crate::tuning::{LaserTuning, RocketTuning};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laser {
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    pub size: f32,
    /// Ticks lived so far
    pub life: u32,
    pub max_life: u32,
    pub active: bool,
}

impl Laser {
    pub fn new(pos: Vec2, rotation: f32, tuning: &LaserTuning) -> Self {
        Self {
            pos,
            vel: heading(rotation) * tuning.speed,
            rotation,
            size: tuning.size,
            life: 0,
            max_life: tuning.lifetime_ticks,
            active: true,
        }
    }

    /// Advance one tick; returns whether the laser is still alive
    pub fn update(&mut self, bounds: &Bounds) -> bool {
        if !self.active {
            return false;
        }
        self.pos += self.vel;
        if !bounds.contains(self.pos, self.size) {
            self.active = false;
            return false;
        }
        self.life += 1;
        if self.life >= self.max_life {
            self.active = false;
        }
        self.active
    }
}

impl Circle for Laser {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.size
    }
}

/// One fading point of a rocket's exhaust
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub alpha: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rocket {
    pub pos: Vec2,
    /// Fixed at launch toward the target's position at that moment
    pub vel: Vec2,
    pub rotation: f32,
    pub size: f32,
    /// Wall-clock launch time (ms)
    pub launched_at_ms: u64,
    pub lifetime_ms: u64,
    /// Id of the enemy that fired it
    pub owner: Option<u32>,
    /// Oldest point first
    pub trail: VecDeque<TrailPoint>,
    pub active: bool,
}

impl Rocket {
    pub fn new(pos: Vec2, target: Vec2, now_ms: u64, owner: Option<u32>, tuning: &RocketTuning) -> Self {
        let dir = (target - pos).normalize_or_zero();
        // A target sitting exactly on the launch point still gets a heading
        let dir = if dir == Vec2::ZERO { Vec2::X } else { dir };
        Self {
            pos,
            vel: dir * tuning.speed,
            rotation: dir.y.atan2(dir.x),
            size: tuning.size,
            launched_at_ms: now_ms,
            lifetime_ms: tuning.lifetime_ms,
            owner,
            trail: VecDeque::with_capacity(tuning.trail_length + 1),
            active: true,
        }
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.launched_at_ms) >= self.lifetime_ms
    }

    /// Advance one tick; returns whether the rocket is still alive
    pub fn update(&mut self, bounds: &Bounds, now_ms: u64, tuning: &RocketTuning) -> bool {
        if !self.active {
            return false;
        }
        if self.is_expired(now_ms) {
            self.active = false;
            return false;
        }

        self.pos += self.vel;

        self.trail.push_back(TrailPoint {
            pos: self.pos,
            alpha: 1.0,
        });
        while self.trail.len() > tuning.trail_length {
            self.trail.pop_front();
        }
        for point in self.trail.iter_mut() {
            point.alpha *= tuning.trail_decay;
        }
        self.trail.retain(|p| p.alpha > tuning.trail_floor);

        if !bounds.contains(self.pos, self.size) {
            self.active = false;
        }
        self.active
    }
}

impl Circle for Rocket {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Bounds {
        Bounds::new(800.0, 600.0)
    }

    #[test]
    fn test_laser_expires_after_lifetime() {
        let tuning = LaserTuning {
            speed: 1.0,
            lifetime_ticks: 3,
            ..Default::default()
        };
        let mut laser = Laser::new(Vec2::new(400.0, 300.0), 0.0, &tuning);
        assert!(laser.update(&bounds()));
        assert!(laser.update(&bounds()));
        assert!(!laser.update(&bounds()));
        assert!(!laser.active);
    }

    #[test]
    fn test_laser_dies_off_screen() {
        let mut laser = Laser::new(Vec2::new(805.0, 300.0), 0.0, &LaserTuning::default());
        assert!(!laser.update(&bounds()));
    }

    #[test]
    fn test_rocket_aims_once_at_launch() {
        let tuning = RocketTuning::default();
        let mut rocket = Rocket::new(Vec2::new(100.0, 100.0), Vec2::new(200.0, 100.0), 0, None, &tuning);
        assert!((rocket.vel - Vec2::new(2.0, 0.0)).length() < 1e-5);
        rocket.update(&bounds(), 16, &tuning);
        assert!((rocket.vel - Vec2::new(2.0, 0.0)).length() < 1e-5);
        assert_eq!(rocket.pos, Vec2::new(102.0, 100.0));
    }

    #[test]
    fn test_rocket_wall_clock_lifetime() {
        let tuning = RocketTuning::default();
        let t0 = 10_000;
        let mut rocket = Rocket::new(Vec2::new(400.0, 300.0), Vec2::new(400.0, 0.0), t0, None, &tuning);
        assert!(rocket.update(&bounds(), t0 + tuning.lifetime_ms - 1, &tuning));
        assert!(!rocket.update(&bounds(), t0 + tuning.lifetime_ms, &tuning));
        assert!(!rocket.active);
    }

    #[test]
    fn test_rocket_trail_is_bounded_and_fades() {
        let tuning = RocketTuning::default();
        let mut rocket = Rocket::new(Vec2::new(400.0, 300.0), Vec2::new(0.0, 300.0), 0, None, &tuning);
        for i in 0..30 {
            rocket.update(&bounds(), i, &tuning);
            assert!(rocket.trail.len() <= tuning.trail_length);
        }
        let newest = rocket.trail.back().unwrap();
        let oldest = rocket.trail.front().unwrap();
        assert!(newest.alpha > oldest.alpha);
        assert!(rocket.trail.iter().all(|p| p.alpha > tuning.trail_floor));
    }

    #[test]
    fn test_rocket_with_degenerate_target() {
        let tuning = RocketTuning::default();
        let p = Vec2::new(50.0, 50.0);
        let rocket = Rocket::new(p, p, 0, None, &tuning);
        assert!(rocket.vel.is_finite());
        assert!(rocket.vel.length() > 0.0);
    }
}
