//! Explosion effects. Purely visual: no area damage.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::ExplosionTuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub radius: f32,
    pub max_radius: f32,
    pub alpha: f32,
    pub active: bool,
}

impl Explosion {
    pub fn new(pos: Vec2, radius: f32, tuning: &ExplosionTuning) -> Self {
        Self {
            pos,
            radius,
            max_radius: radius * tuning.max_scale,
            alpha: 1.0,
            active: true,
        }
    }

    /// Grow and fade; returns whether the explosion is still visible
    pub fn update(&mut self, tuning: &ExplosionTuning) -> bool {
        if !self.active {
            return false;
        }
        self.radius += tuning.growth;
        self.alpha -= tuning.fade;
        if self.alpha <= 0.0 || self.radius >= self.max_radius {
            self.alpha = self.alpha.max(0.0);
            self.active = false;
        }
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explosion_ends_at_max_radius() {
        let tuning = ExplosionTuning::default();
        let mut e = Explosion::new(Vec2::ZERO, 5.0, &tuning);
        // 5 -> 15 in steps of 2 takes 5 ticks
        let mut ticks = 0;
        while e.update(&tuning) {
            ticks += 1;
        }
        assert_eq!(ticks, 4);
        assert!(!e.active);
    }

    #[test]
    fn test_large_explosion_ends_by_fading() {
        let tuning = ExplosionTuning::default();
        let mut e = Explosion::new(Vec2::ZERO, 125.0, &tuning);
        let mut ticks = 0;
        while e.update(&tuning) {
            ticks += 1;
            assert!(e.alpha > 0.0);
        }
        // alpha 1.0 / 0.05 per tick, allowing for float drift
        assert!((18..=20).contains(&ticks));
    }
}
