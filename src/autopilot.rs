//! Demo-mode pilot
//!
//! Produces the same `TickInput` a player would, from the current state
//! only. Used by the headless runner and attract screens.

use glam::Vec2;

use crate::sim::{GameState, TickInput};
use crate::{bearing, heading, normalize_angle};

/// Radians either side of the target bearing where the guns open up
const AIM_TOLERANCE: f32 = 0.15;
/// Close the distance when the target is farther than this
const ENGAGE_DISTANCE: f32 = 250.0;
/// Back off when the target is closer than this
const KEEP_AWAY: f32 = 90.0;
/// Rockets inside this radius take priority over enemies
const ROCKET_ALERT: f32 = 120.0;
/// How far ahead to look for planets
const LOOKAHEAD: f32 = 60.0;

/// Pick the input for the next tick
pub fn autopilot_input(state: &GameState) -> TickInput {
    let ship = &state.ship;
    let mut input = TickInput::default();

    // Planet directly ahead: veer off and coast
    let ahead = ship.pos + heading(ship.rotation) * LOOKAHEAD;
    if let Some(planet) = state
        .planets
        .iter()
        .find(|p| p.pos.distance(ahead) < p.radius + ship.size)
    {
        let away = normalize_angle(bearing(planet.pos, ship.pos) - ship.rotation);
        steer(&mut input, away);
        input.reverse = ship.vel.length() > 1.0;
        return input;
    }

    let Some(target) = pick_target(state) else {
        return input;
    };

    let diff = normalize_angle(bearing(ship.pos, target) - ship.rotation);
    steer(&mut input, diff);

    let distance = ship.pos.distance(target);
    input.fire = diff.abs() < AIM_TOLERANCE;
    input.thrust = distance > ENGAGE_DISTANCE && diff.abs() < 0.5;
    input.reverse = distance < KEEP_AWAY;
    input
}

/// Nearby rocket first, else the closest live enemy
fn pick_target(state: &GameState) -> Option<Vec2> {
    let ship = state.ship.pos;
    let rocket = nearest(ship, state.rockets.iter().filter(|r| r.active).map(|r| r.pos))
        .filter(|pos| pos.distance(ship) < ROCKET_ALERT);
    rocket.or_else(|| nearest(ship, state.enemies.iter().filter(|e| e.active).map(|e| e.pos)))
}

fn nearest(from: Vec2, points: impl Iterator<Item = Vec2>) -> Option<Vec2> {
    points.min_by(|a, b| {
        a.distance_squared(from)
            .partial_cmp(&b.distance_squared(from))
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

fn steer(input: &mut TickInput, diff: f32) {
    if diff > AIM_TOLERANCE / 2.0 {
        input.turn_right = true;
    } else if diff < -AIM_TOLERANCE / 2.0 {
        input.turn_left = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Bounds, Enemy, EnemyKind};
    use crate::tuning::Tuning;

    fn lone_ship() -> (GameState, Tuning) {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, Bounds::new(800.0, 600.0), &tuning);
        state.planets.clear();
        (state, tuning)
    }

    fn put_enemy(state: &mut GameState, tuning: &Tuning, pos: Vec2) {
        let id = state.next_entity_id();
        state
            .enemies
            .push(Enemy::new(id, EnemyKind::Scout, pos, 0.0, 0, 0.0, &tuning.enemies.scout));
    }

    #[test]
    fn test_idle_without_targets() {
        let (state, _) = lone_ship();
        assert_eq!(autopilot_input(&state), TickInput::default());
    }

    #[test]
    fn test_fires_when_aligned() {
        let (mut state, tuning) = lone_ship();
        let ahead = state.ship.pos + Vec2::new(150.0, 0.0);
        put_enemy(&mut state, &tuning, ahead);
        let input = autopilot_input(&state);
        assert!(input.fire);
        assert!(!input.turn_left && !input.turn_right);
    }

    #[test]
    fn test_turns_toward_target() {
        let (mut state, tuning) = lone_ship();
        // Straight "down" on screen is +y, a positive bearing
        let below = state.ship.pos + Vec2::new(0.0, 200.0);
        put_enemy(&mut state, &tuning, below);
        let input = autopilot_input(&state);
        assert!(input.turn_right);
        assert!(!input.fire);
    }

    #[test]
    fn test_avoids_planet_ahead() {
        let (mut state, _) = lone_ship();
        let ahead = state.ship.pos + Vec2::new(60.0, 5.0);
        state.planets.push(crate::sim::Planet {
            pos: ahead,
            radius: 20.0,
            color: "#fff".into(),
        });
        let input = autopilot_input(&state);
        assert!(input.turn_left || input.turn_right);
        assert!(!input.fire);
    }
}
