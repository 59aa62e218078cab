//! Round progression
//!
//! ```text
//! Idle -> Transition -> Spawning -> Complete -> Transition -> ... -> GameComplete
//! ```
//!
//! Transition and spawn cadence run on wall-clock milliseconds; the controller
//! never looks at the tick counter.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::enemy::EnemyKind;
use super::geometry::Bounds;
use crate::bearing;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Before the first round
    Idle,
    /// "Round N" banner; nothing spawns
    Transition,
    /// Enemies arrive on a fixed cadence until the quota is met
    Spawning,
    /// Everything spawned this round is gone
    Complete,
    /// Final round cleared
    GameComplete,
}

/// Per-kind counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCounts {
    pub scout: u32,
    pub fighter: u32,
    pub destroyer: u32,
}

impl KindCounts {
    pub fn get(&self, kind: EnemyKind) -> u32 {
        match kind {
            EnemyKind::Scout => self.scout,
            EnemyKind::Fighter => self.fighter,
            EnemyKind::Destroyer => self.destroyer,
        }
    }

    pub fn get_mut(&mut self, kind: EnemyKind) -> &mut u32 {
        match kind {
            EnemyKind::Scout => &mut self.scout,
            EnemyKind::Fighter => &mut self.fighter,
            EnemyKind::Destroyer => &mut self.destroyer,
        }
    }
}

/// Where and what to spawn next
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnOrder {
    pub kind: EnemyKind,
    pub pos: Vec2,
    /// Initial heading, toward the middle of the screen
    pub rotation: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundController {
    current_round: u32,
    enemies_remaining: u32,
    phase: RoundPhase,
    round_started_ms: u64,
    last_spawn_ms: Option<u64>,
    spawned: KindCounts,
}

impl Default for RoundController {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundController {
    pub fn new() -> Self {
        Self {
            current_round: 0,
            enemies_remaining: 0,
            phase: RoundPhase::Idle,
            round_started_ms: 0,
            last_spawn_ms: None,
            spawned: KindCounts::default(),
        }
    }

    /// Advance to the next round and open its transition window
    pub fn start_round(&mut self, now_ms: u64, tuning: &Tuning) {
        self.current_round += 1;
        self.enemies_remaining = tuning.rounds.total(self.current_round);
        self.round_started_ms = now_ms;
        self.last_spawn_ms = None;
        self.spawned = KindCounts::default();
        self.phase = RoundPhase::Transition;
        log::info!(
            "Starting round {} with {} enemies",
            self.current_round,
            self.enemies_remaining
        );
    }

    /// Per-tick update. Yields at most one spawn.
    pub fn update<R: Rng>(
        &mut self,
        now_ms: u64,
        bounds: &Bounds,
        rng: &mut R,
        tuning: &Tuning,
    ) -> Option<SpawnOrder> {
        match self.phase {
            RoundPhase::Transition => {
                if now_ms.saturating_sub(self.round_started_ms) >= tuning.rounds.round_duration_ms {
                    log::debug!("Round {} transition over, spawning begins", self.current_round);
                    self.phase = RoundPhase::Spawning;
                    // First enemy arrives one spawn delay after the banner
                    self.last_spawn_ms = Some(now_ms);
                }
                None
            }
            RoundPhase::Spawning => {
                if let Some(last) = self.last_spawn_ms
                    && now_ms.saturating_sub(last) < tuning.rounds.spawn_delay_ms
                {
                    return None;
                }
                let kind = self.next_kind(tuning)?;
                self.last_spawn_ms = Some(now_ms);
                *self.spawned.get_mut(kind) += 1;
                let order = edge_spawn(kind, bounds, rng, tuning.enemies.spawn_offset);
                log::debug!("Spawning {} at ({:.0}, {:.0})", kind.as_str(), order.pos.x, order.pos.y);
                Some(order)
            }
            RoundPhase::Idle | RoundPhase::Complete | RoundPhase::GameComplete => None,
        }
    }

    /// Fighters first, then destroyers, scouts otherwise. `None` once every
    /// quota for the round is met.
    fn next_kind(&self, tuning: &Tuning) -> Option<EnemyKind> {
        let round = self.current_round;
        let unmet = |kind| self.spawned.get(kind) < tuning.rounds.quota(kind, round);
        [EnemyKind::Fighter, EnemyKind::Destroyer, EnemyKind::Scout]
            .into_iter()
            .find(|&kind| unmet(kind))
    }

    /// Report one enemy removal. Must be called exactly once per enemy that
    /// leaves play, whatever the cause.
    pub fn enemy_destroyed(&mut self) {
        if self.enemies_remaining == 0 {
            log::warn!("Enemy destroyed with no enemies remaining in round {}", self.current_round);
            return;
        }
        self.enemies_remaining -= 1;
        log::debug!("Enemy destroyed, {} remaining", self.enemies_remaining);
    }

    /// Counter drained, nothing alive, and not in the banner window. The
    /// counter and the live list can disagree for a tick after a kill, so
    /// both are checked.
    pub fn is_round_complete(&self, live_enemies: usize) -> bool {
        self.phase == RoundPhase::Spawning && self.enemies_remaining == 0 && live_enemies == 0
    }

    /// Mark the round cleared; returns true when it was the final round
    pub fn complete_round(&mut self, tuning: &Tuning) -> bool {
        if self.current_round >= tuning.rounds.max_rounds {
            self.phase = RoundPhase::GameComplete;
            log::info!("Final round {} cleared", self.current_round);
            true
        } else {
            self.phase = RoundPhase::Complete;
            log::info!("Round {} cleared", self.current_round);
            false
        }
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn enemies_remaining(&self) -> u32 {
        self.enemies_remaining
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_in_transition(&self) -> bool {
        self.phase == RoundPhase::Transition
    }

    pub fn is_game_complete(&self) -> bool {
        self.phase == RoundPhase::GameComplete
    }

    pub fn spawned(&self) -> KindCounts {
        self.spawned
    }
}

/// Uniform point along a random screen edge, pushed `offset` outward
fn edge_spawn<R: Rng>(kind: EnemyKind, bounds: &Bounds, rng: &mut R, offset: f32) -> SpawnOrder {
    let pos = match rng.random_range(0..4) {
        0 => Vec2::new(rng.random::<f32>() * bounds.width, -offset),
        1 => Vec2::new(bounds.width + offset, rng.random::<f32>() * bounds.height),
        2 => Vec2::new(rng.random::<f32>() * bounds.width, bounds.height + offset),
        _ => Vec2::new(-offset, rng.random::<f32>() * bounds.height),
    };
    SpawnOrder {
        kind,
        pos,
        rotation: bearing(pos, bounds.center()),
    }
}
