//! Game state aggregate
//!
//! Everything a tick reads or writes lives here. Only `tick` and the
//! resolvers it calls mutate it.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::{Enemy, EnemyKind};
use super::explosion::Explosion;
use super::geometry::Bounds;
use super::planet::{Planet, generate_planets};
use super::projectile::{Laser, Rocket};
use super::round::{RoundController, SpawnOrder};
use super::ship::Ship;
use crate::tuning::Tuning;

/// Why an enemy left play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KillCause {
    Laser,
    Rocket,
    Planet,
    /// Two enemies ran into each other
    Collision,
    /// Rammed the player's ship
    Ship,
}

/// Notable things that happened during the last tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted { round: u32 },
    RoundCleared { round: u32 },
    EnemySpawned { id: u32, kind: EnemyKind },
    EnemyDestroyed { id: u32, kind: EnemyKind, cause: KillCause },
    RocketShotDown,
    ShipDestroyed { lives_left: u32 },
    GameOver { score: u64 },
    GameComplete { score: u64 },
}

#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub bounds: Bounds,
    pub ship: Ship,
    pub lasers: Vec<Laser>,
    pub rockets: Vec<Rocket>,
    pub enemies: Vec<Enemy>,
    pub planets: Vec<Planet>,
    pub explosions: Vec<Explosion>,
    pub score: u64,
    pub lives: u32,
    /// Simulation tick counter
    pub frame_count: u64,
    pub game_over: bool,
    pub rounds: RoundController,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Fresh match: full lives, zero score, ship centered, planets placed,
    /// round controller idle
    pub fn new(seed: u64, bounds: Bounds, tuning: &Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let planets = generate_planets(&mut rng, &bounds, &tuning.planets);
        Self {
            seed,
            rng,
            bounds,
            ship: Ship::new(bounds.center(), &tuning.ship),
            lasers: Vec::new(),
            rockets: Vec::new(),
            enemies: Vec::new(),
            planets,
            explosions: Vec::new(),
            score: 0,
            lives: tuning.initial_lives,
            frame_count: 0,
            game_over: false,
            rounds: RoundController::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Turn a spawn order into a live enemy
    pub fn spawn_enemy(&mut self, order: SpawnOrder, tuning: &Tuning) -> u32 {
        let id = self.next_entity_id();
        let enemy = Enemy::new(
            id,
            order.kind,
            order.pos,
            order.rotation,
            self.frame_count,
            tuning.enemies.spawn_offset,
            tuning.enemies.get(order.kind),
        );
        self.enemies.push(enemy);
        self.events.push(GameEvent::EnemySpawned { id, kind: order.kind });
        id
    }

    /// New planet layout for the next round
    pub fn regenerate_planets(&mut self, tuning: &Tuning) {
        self.planets = generate_planets(&mut self.rng, &self.bounds, &tuning.planets);
    }

    /// Start the next round: new planets, then the controller's banner window
    pub fn begin_next_round(&mut self, now_ms: u64, tuning: &Tuning) {
        if self.rounds.current_round() > 0 {
            self.regenerate_planets(tuning);
        }
        self.rounds.start_round(now_ms, tuning);
        self.events.push(GameEvent::RoundStarted {
            round: self.rounds.current_round(),
        });
    }

    pub fn live_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.active).count()
    }

    pub fn is_game_complete(&self) -> bool {
        self.rounds.is_game_complete()
    }

    /// Drop every inactive entity
    pub fn compact(&mut self) {
        self.lasers.retain(|l| l.active);
        self.rockets.retain(|r| r.active);
        self.enemies.retain(|e| e.active);
        self.explosions.retain(|e| e.active);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let tuning = Tuning::default();
        let state = GameState::new(42, Bounds::new(800.0, 600.0), &tuning);
        assert_eq!(state.lives, tuning.initial_lives);
        assert_eq!(state.score, 0);
        assert_eq!(state.planets.len(), tuning.planets.count);
        assert_eq!(state.ship.pos, state.bounds.center());
        assert_eq!(state.rounds.current_round(), 0);
        assert!(!state.game_over);
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut state = GameState::new(1, Bounds::new(800.0, 600.0), &Tuning::default());
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_begin_round_keeps_first_layout() {
        let tuning = Tuning::default();
        let mut state = GameState::new(5, Bounds::new(800.0, 600.0), &tuning);
        let first: Vec<_> = state.planets.iter().map(|p| p.pos).collect();
        state.begin_next_round(0, &tuning);
        let after: Vec<_> = state.planets.iter().map(|p| p.pos).collect();
        assert_eq!(first, after);
        assert_eq!(state.events, vec![GameEvent::RoundStarted { round: 1 }]);

        state.begin_next_round(10, &tuning);
        let regenerated: Vec<_> = state.planets.iter().map(|p| p.pos).collect();
        assert_ne!(first, regenerated);
    }
}
