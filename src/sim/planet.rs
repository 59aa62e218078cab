//! Static planets: collision hazards regenerated every round

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::{Bounds, Circle, circles_overlap};
use crate::tuning::PlanetTuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Planet {
    pub pos: Vec2,
    pub radius: f32,
    pub color: String,
}

impl Circle for Planet {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// Place `tuning.count` planets fully inside `bounds`, keeping clear of the
/// ship spawn point when possible
pub fn generate_planets<R: Rng>(rng: &mut R, bounds: &Bounds, tuning: &PlanetTuning) -> Vec<Planet> {
    let spawn = bounds.center();
    let mut planets = Vec::with_capacity(tuning.count);

    for _ in 0..tuning.count {
        let mut candidate = random_planet(rng, bounds, tuning);
        let mut attempts = 1;
        while circles_overlap(candidate.pos, candidate.radius, spawn, tuning.spawn_clearance)
            && attempts < tuning.placement_attempts
        {
            candidate = random_planet(rng, bounds, tuning);
            attempts += 1;
        }
        if circles_overlap(candidate.pos, candidate.radius, spawn, tuning.spawn_clearance) {
            log::debug!("Planet at {:?} overlaps the spawn zone after {attempts} attempts", candidate.pos);
        }
        planets.push(candidate);
    }

    planets
}

fn random_planet<R: Rng>(rng: &mut R, bounds: &Bounds, tuning: &PlanetTuning) -> Planet {
    let radius = if tuning.max_radius > tuning.min_radius {
        rng.random_range(tuning.min_radius..tuning.max_radius)
    } else {
        tuning.min_radius
    };
    // Small viewports still get a valid range
    let span_x = (bounds.width - 2.0 * radius).max(0.0);
    let span_y = (bounds.height - 2.0 * radius).max(0.0);
    let pos = Vec2::new(
        radius + rng.random::<f32>() * span_x,
        radius + rng.random::<f32>() * span_y,
    );
    let color = if tuning.colors.is_empty() {
        String::from("#4B0082")
    } else {
        tuning.colors[rng.random_range(0..tuning.colors.len())].clone()
    };
    Planet { pos, radius, color }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_planets_inside_bounds_and_clear_of_spawn() {
        let bounds = Bounds::new(1024.0, 768.0);
        let tuning = PlanetTuning::default();
        for seed in 0..20 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let planets = generate_planets(&mut rng, &bounds, &tuning);
            assert_eq!(planets.len(), tuning.count);
            for p in &planets {
                assert!(p.radius >= tuning.min_radius && p.radius <= tuning.max_radius);
                assert!(p.pos.x - p.radius >= 0.0 && p.pos.x + p.radius <= bounds.width);
                assert!(p.pos.y - p.radius >= 0.0 && p.pos.y + p.radius <= bounds.height);
                assert!(!circles_overlap(p.pos, p.radius, bounds.center(), tuning.spawn_clearance));
                assert!(tuning.colors.contains(&p.color));
            }
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let bounds = Bounds::new(800.0, 600.0);
        let tuning = PlanetTuning::default();
        let a = generate_planets(&mut Pcg32::seed_from_u64(7), &bounds, &tuning);
        let b = generate_planets(&mut Pcg32::seed_from_u64(7), &bounds, &tuning);
        let pa: Vec<_> = a.iter().map(|p| p.pos).collect();
        let pb: Vec<_> = b.iter().map(|p| p.pos).collect();
        assert_eq!(pa, pb);
    }
}
