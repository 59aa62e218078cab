//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One tick per call, no internal clock
//! - Seeded RNG only
//! - Stable iteration order (insertion order of each collection)
//! - No rendering or platform dependencies

pub mod combat;
pub mod enemy;
pub mod explosion;
pub mod geometry;
pub mod planet;
pub mod projectile;
pub mod round;
pub mod ship;
pub mod state;
pub mod tick;

pub use enemy::{Enemy, EnemyKind};
pub use explosion::Explosion;
pub use geometry::{Bounds, Circle, circles_overlap, collide};
pub use planet::{Planet, generate_planets};
pub use projectile::{Laser, Rocket, TrailPoint};
pub use round::{KindCounts, RoundController, RoundPhase, SpawnOrder};
pub use ship::Ship;
pub use state::{GameEvent, GameState, KillCause};
pub use tick::{TickInput, tick};
