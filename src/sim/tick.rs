//! Fixed timestep simulation tick
//!
//! Core game loop that advances the match by one step. Fire cooldowns run on
//! the tick counter; round timing and rocket lifetime run on the wall-clock
//! `now_ms` the caller passes in.

use super::combat;
use super::state::{GameEvent, GameState};
use crate::tuning::Tuning;

/// Input commands for a single tick, sampled once at the top
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub thrust: bool,
    pub reverse: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub fire: bool,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: u64, tuning: &Tuning) {
    state.events.clear();

    // Terminal states only count frames
    if state.game_over || state.is_game_complete() {
        state.frame_count += 1;
        return;
    }

    state.explosions.iter_mut().for_each(|e| {
        e.update(&tuning.explosion);
    });

    update_ship(state, input, tuning);

    state.lasers.retain_mut(|l| l.update(&state.bounds));
    state
        .rockets
        .retain_mut(|r| r.update(&state.bounds, now_ms, &tuning.rocket));

    update_enemies(state, now_ms, tuning);

    if let Some(order) = state.rounds.update(now_ms, &state.bounds, &mut state.rng, tuning) {
        state.spawn_enemy(order, tuning);
    }

    if state.rounds.is_round_complete(state.live_enemies()) {
        let round = state.rounds.current_round();
        state.events.push(GameEvent::RoundCleared { round });
        if state.rounds.complete_round(tuning) {
            log::info!("All {round} rounds cleared, final score {}", state.score);
            state.events.push(GameEvent::GameComplete { score: state.score });
        } else {
            state.begin_next_round(now_ms, tuning);
        }
    }

    combat::resolve(state, tuning);
    state.compact();

    state.frame_count += 1;
}

fn update_ship(state: &mut GameState, input: &TickInput, tuning: &Tuning) {
    let ship = &mut state.ship;
    if input.turn_left {
        ship.turn_left(&tuning.ship);
    }
    if input.turn_right {
        ship.turn_right(&tuning.ship);
    }
    if input.thrust {
        ship.thrust(&tuning.ship);
    }
    if input.reverse {
        ship.reverse(&tuning.ship);
    }
    ship.update(&state.bounds, &tuning.ship);

    if input.fire
        && let Some(laser) = ship.shoot(state.frame_count, &tuning.ship, &tuning.laser)
    {
        state.lasers.push(laser);
    }
}

/// Steer every enemy toward the ship and let each try a shot
fn update_enemies(state: &mut GameState, now_ms: u64, tuning: &Tuning) {
    let target = state.ship.pos;
    let tick = state.frame_count;

    for enemy in state.enemies.iter_mut().filter(|e| e.active) {
        let kind = tuning.enemies.get(enemy.kind);
        enemy.update(target, &state.bounds, kind);
        if let Some(rocket) = enemy.shoot(tick, target, now_ms, kind, &tuning.rocket) {
            state.rockets.push(rocket);
        }
    }

    state.enemies.retain(|e| e.active);
}
