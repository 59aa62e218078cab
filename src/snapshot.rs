//! Read-only view of a finished tick for renderers and HUDs

use glam::Vec2;
use serde::Serialize;

use crate::sim::{EnemyKind, GameState};

#[derive(Debug, Clone, Serialize)]
pub struct PlanetView {
    pub pos: Vec2,
    pub radius: f32,
    pub color: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ExplosionView {
    pub pos: Vec2,
    pub radius: f32,
    pub alpha: f32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct LaserView {
    pub pos: Vec2,
    pub rotation: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RocketView {
    pub pos: Vec2,
    pub rotation: f32,
    /// Oldest first, as (position, alpha)
    pub trail: Vec<(Vec2, f32)>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct EnemyView {
    pub pos: Vec2,
    pub rotation: f32,
    pub kind: EnemyKind,
    pub health: f32,
    pub ammo: f32,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ShipView {
    pub pos: Vec2,
    pub rotation: f32,
    pub ammo: f32,
}

/// Everything needed to draw one frame. Ratios are in 0..=1.
#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    pub frame: u64,
    pub planets: Vec<PlanetView>,
    pub explosions: Vec<ExplosionView>,
    pub lasers: Vec<LaserView>,
    pub rockets: Vec<RocketView>,
    pub enemies: Vec<EnemyView>,
    pub ship: ShipView,
    pub score: u64,
    pub lives: u32,
    pub round: u32,
    pub in_transition: bool,
    pub game_over: bool,
    pub game_complete: bool,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            frame: state.frame_count,
            planets: state
                .planets
                .iter()
                .map(|p| PlanetView {
                    pos: p.pos,
                    radius: p.radius,
                    color: p.color.clone(),
                })
                .collect(),
            explosions: state
                .explosions
                .iter()
                .map(|e| ExplosionView {
                    pos: e.pos,
                    radius: e.radius,
                    alpha: e.alpha,
                })
                .collect(),
            lasers: state
                .lasers
                .iter()
                .map(|l| LaserView {
                    pos: l.pos,
                    rotation: l.rotation,
                })
                .collect(),
            rockets: state
                .rockets
                .iter()
                .map(|r| RocketView {
                    pos: r.pos,
                    rotation: r.rotation,
                    trail: r.trail.iter().map(|t| (t.pos, t.alpha)).collect(),
                })
                .collect(),
            enemies: state
                .enemies
                .iter()
                .map(|e| EnemyView {
                    pos: e.pos,
                    rotation: e.rotation,
                    kind: e.kind,
                    health: e.health_ratio(),
                    ammo: e.ammo_ratio(),
                    active: e.active,
                })
                .collect(),
            ship: ShipView {
                pos: state.ship.pos,
                rotation: state.ship.rotation,
                ammo: state.ship.ammo_ratio(),
            },
            score: state.score,
            lives: state.lives,
            round: state.rounds.current_round(),
            in_transition: state.rounds.is_in_transition(),
            game_over: state.game_over,
            game_complete: state.is_game_complete(),
        }
    }
}
