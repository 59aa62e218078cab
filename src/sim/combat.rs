//! Collision, damage and scoring
//!
//! Runs once per tick after all movement. Checks happen in a fixed priority
//! order so no entity is resolved two contradictory ways in the same tick:
//!
//! 1. ship vs planet
//! 2. ship vs enemy (both destroyed)
//! 3. ship vs rocket
//! 4. enemy vs planet (scored)
//! 5. enemy vs enemy (both destroyed, unscored)
//! 6. laser vs enemy (first hit consumes the laser)
//! 7. laser vs rocket (only if 6 missed)
//! 8. rocket vs enemy, else rocket, else planet
//!
//! Destruction only flips `active`; compaction happens at the end of the tick.
//! Inactive entities are skipped by every check.

use glam::Vec2;

use super::enemy::Enemy;
use super::explosion::Explosion;
use super::geometry::collide;
use super::projectile::Rocket;
use super::ship::Ship;
use super::state::{GameEvent, GameState, KillCause};
use crate::tuning::Tuning;

/// Side effects gathered while scanning, applied once at the end
#[derive(Debug, Default)]
struct Outcome {
    score: u64,
    /// Enemies removed this pass; one round notification each
    kills: u32,
    explosions: Vec<Explosion>,
    events: Vec<GameEvent>,
    ship_hit: bool,
}

impl Outcome {
    fn explode(&mut self, pos: Vec2, radius: f32, tuning: &Tuning) {
        self.explosions.push(Explosion::new(pos, radius, &tuning.explosion));
    }

    /// Book-keeping for an enemy that has just gone inactive
    fn record_kill(&mut self, enemy: &Enemy, cause: KillCause, scored: bool, tuning: &Tuning) {
        let kind_tuning = tuning.enemies.get(enemy.kind);
        self.kills += 1;
        if scored {
            self.score += kind_tuning.score;
        }
        self.explode(enemy.pos, enemy.size * kind_tuning.explosion_scale, tuning);
        self.events.push(GameEvent::EnemyDestroyed {
            id: enemy.id,
            kind: enemy.kind,
            cause,
        });
        log::debug!("{} #{} destroyed by {:?}", enemy.kind.as_str(), enemy.id, cause);
    }

    /// Deactivate an enemy outright (collisions). No-op if already inactive.
    fn destroy_enemy(&mut self, enemy: &mut Enemy, cause: KillCause, scored: bool, tuning: &Tuning) {
        if !enemy.active {
            return;
        }
        enemy.active = false;
        self.record_kill(enemy, cause, scored, tuning);
    }

    /// Apply weapon damage; records the kill on the destroying hit only
    fn damage_enemy(&mut self, enemy: &mut Enemy, amount: f32, cause: KillCause, tuning: &Tuning) {
        if enemy.take_damage(amount) {
            self.record_kill(enemy, cause, true, tuning);
        }
    }
}

/// Resolve every collision for this tick
pub fn resolve(state: &mut GameState, tuning: &Tuning) {
    let mut out = Outcome::default();

    ship_collisions(state, &mut out, tuning);
    enemy_planet_collisions(state, &mut out, tuning);
    enemy_enemy_collisions(state, &mut out, tuning);
    laser_hits(state, &mut out, tuning);
    rocket_hits(state, &mut out, tuning);

    state.score += out.score;
    for _ in 0..out.kills {
        state.rounds.enemy_destroyed();
    }
    state.explosions.append(&mut out.explosions);
    state.events.append(&mut out.events);

    if out.ship_hit {
        ship_destroyed(state, tuning);
    }
}

/// Steps 1-3: at most one ship death per tick
fn ship_collisions(state: &mut GameState, out: &mut Outcome, tuning: &Tuning) {
    let ship = &state.ship;

    if state.planets.iter().any(|p| collide(ship, p)) {
        log::debug!("Ship crashed into a planet");
        out.ship_hit = true;
        return;
    }

    if let Some(i) = state.enemies.iter().position(|e| e.active && collide(ship, e)) {
        out.destroy_enemy(&mut state.enemies[i], KillCause::Ship, false, tuning);
        out.ship_hit = true;
        return;
    }

    if let Some(i) = state.rockets.iter().position(|r| r.active && collide(ship, r)) {
        let rocket = &mut state.rockets[i];
        rocket.active = false;
        out.explode(rocket.pos, rocket.size, tuning);
        out.ship_hit = true;
    }
}

/// Step 4
fn enemy_planet_collisions(state: &mut GameState, out: &mut Outcome, tuning: &Tuning) {
    for enemy in state.enemies.iter_mut().filter(|e| e.active) {
        if state.planets.iter().any(|p| collide(&*enemy, p)) {
            out.destroy_enemy(enemy, KillCause::Planet, true, tuning);
        }
    }
}

/// Step 5: every unordered pair of live enemies
fn enemy_enemy_collisions(state: &mut GameState, out: &mut Outcome, tuning: &Tuning) {
    let enemies = &mut state.enemies;
    for j in 1..enemies.len() {
        let (head, tail) = enemies.split_at_mut(j);
        let b = &mut tail[0];
        for a in head.iter_mut() {
            if !b.active {
                break;
            }
            if a.active && collide(&*a, &*b) {
                out.destroy_enemy(a, KillCause::Collision, false, tuning);
                out.destroy_enemy(b, KillCause::Collision, false, tuning);
            }
        }
    }
}

/// Steps 6-7
fn laser_hits(state: &mut GameState, out: &mut Outcome, tuning: &Tuning) {
    for laser in state.lasers.iter_mut().filter(|l| l.active) {
        if let Some(i) = state.enemies.iter().position(|e| e.active && collide(&*laser, e)) {
            laser.active = false;
            out.damage_enemy(&mut state.enemies[i], tuning.laser.damage, KillCause::Laser, tuning);
            continue;
        }

        if let Some(i) = state.rockets.iter().position(|r| r.active && collide(&*laser, r)) {
            let rocket = &mut state.rockets[i];
            laser.active = false;
            rocket.active = false;
            out.score += tuning.rocket_score;
            out.explode(rocket.pos, rocket.size, tuning);
            out.events.push(GameEvent::RocketShotDown);
        }
    }
}

/// Step 8. A rocket never hits the enemy that fired it.
fn rocket_hits(state: &mut GameState, out: &mut Outcome, tuning: &Tuning) {
    let rockets = &mut state.rockets;
    for i in 0..rockets.len() {
        if !rockets[i].active {
            continue;
        }

        let rocket = &rockets[i];
        let hit = state
            .enemies
            .iter()
            .position(|e| e.active && Some(e.id) != rocket.owner && collide(rocket, e));
        if let Some(e) = hit {
            rockets[i].active = false;
            out.explode(rockets[i].pos, rockets[i].size, tuning);
            out.damage_enemy(&mut state.enemies[e], tuning.rocket.damage, KillCause::Rocket, tuning);
            continue;
        }

        if let Some(j) = find_rocket_hit(&rockets[..], i) {
            for k in [i, j] {
                rockets[k].active = false;
                out.explode(rockets[k].pos, rockets[k].size, tuning);
            }
            continue;
        }

        let rocket = &mut rockets[i];
        if state.planets.iter().any(|p| collide(&*rocket, p)) {
            rocket.active = false;
            out.explode(rocket.pos, rocket.size * tuning.explosion.planet_impact_scale, tuning);
        }
    }
}

fn find_rocket_hit(rockets: &[Rocket], i: usize) -> Option<usize> {
    let rocket = &rockets[i];
    rockets
        .iter()
        .enumerate()
        .position(|(j, other)| j != i && other.active && collide(rocket, other))
}

/// Lose a life; respawn at the center or end the match
fn ship_destroyed(state: &mut GameState, tuning: &Tuning) {
    let wreck = state.ship.pos;
    state
        .explosions
        .push(Explosion::new(wreck, state.ship.size, &tuning.explosion));
    state.lives = state.lives.saturating_sub(1);
    state.events.push(GameEvent::ShipDestroyed {
        lives_left: state.lives,
    });

    if state.lives > 0 {
        log::debug!("Ship destroyed, {} lives left", state.lives);
        state.ship = Ship::new(state.bounds.center(), &tuning.ship);
    } else {
        log::info!("Game over with score {}", state.score);
        state.game_over = true;
        state.events.push(GameEvent::GameOver { score: state.score });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::EnemyKind;
    use crate::sim::geometry::Bounds;
    use crate::sim::planet::Planet;
    use crate::sim::projectile::Laser;

    fn empty_state(tuning: &Tuning) -> GameState {
        let mut state = GameState::new(1, Bounds::new(800.0, 600.0), tuning);
        state.planets.clear();
        state.rounds.start_round(0, tuning);
        state.events.clear();
        state
    }

    fn add_enemy(state: &mut GameState, kind: EnemyKind, pos: Vec2, tuning: &Tuning) -> usize {
        let id = state.next_entity_id();
        state.enemies.push(Enemy::new(id, kind, pos, 0.0, 0, 0.0, tuning.enemies.get(kind)));
        state.enemies.len() - 1
    }

    fn planet(pos: Vec2, radius: f32) -> Planet {
        Planet {
            pos,
            radius,
            color: "#4B0082".into(),
        }
    }

    #[test]
    fn test_laser_kill_scores_once_on_third_hit() {
        let tuning = Tuning::default();
        let mut state = empty_state(&tuning);
        let target = Vec2::new(100.0, 100.0);
        add_enemy(&mut state, EnemyKind::Scout, target, &tuning);
        let remaining = state.rounds.enemies_remaining();

        for hit in 1..=3 {
            state.lasers.push(Laser::new(target, 0.0, &tuning.laser));
            resolve(&mut state, &tuning);
            assert!(state.lasers.iter().all(|l| !l.active));
            if hit < 3 {
                assert!(state.enemies[0].active);
                assert_eq!(state.score, 0);
            }
            state.compact();
        }

        assert!(state.enemies.is_empty());
        assert_eq!(state.score, tuning.enemies.scout.score);
        assert_eq!(state.rounds.enemies_remaining(), remaining - 1);
        assert_eq!(state.explosions.len(), 1);
    }

    #[test]
    fn test_mutual_enemy_collision_unscored() {
        let tuning = Tuning::default();
        let mut state = empty_state(&tuning);
        add_enemy(&mut state, EnemyKind::Scout, Vec2::new(100.0, 100.0), &tuning);
        add_enemy(&mut state, EnemyKind::Fighter, Vec2::new(110.0, 100.0), &tuning);
        let remaining = state.rounds.enemies_remaining();

        resolve(&mut state, &tuning);

        assert!(state.enemies.iter().all(|e| !e.active));
        assert_eq!(state.rounds.enemies_remaining(), remaining - 2);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_three_way_pileup_notifies_each_enemy_once() {
        let tuning = Tuning::default();
        let mut state = empty_state(&tuning);
        for x in [100.0, 105.0, 110.0] {
            add_enemy(&mut state, EnemyKind::Scout, Vec2::new(x, 100.0), &tuning);
        }
        let remaining = state.rounds.enemies_remaining();
        resolve(&mut state, &tuning);
        // The third one overlaps both, but its partners are already gone by
        // the time its pairs come up
        let alive: Vec<bool> = state.enemies.iter().map(|e| e.active).collect();
        assert_eq!(alive, vec![false, false, true]);
        assert_eq!(state.rounds.enemies_remaining(), remaining - 2);
        assert_eq!(state.score, 0);

        state.compact();
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].pos, Vec2::new(110.0, 100.0));
    }

    #[test]
    fn test_adjacent_kills_in_one_tick() {
        let tuning = Tuning::default();
        let mut state = empty_state(&tuning);
        let a = Vec2::new(100.0, 100.0);
        let b = Vec2::new(300.0, 100.0);
        let ia = add_enemy(&mut state, EnemyKind::Scout, a, &tuning);
        let ib = add_enemy(&mut state, EnemyKind::Scout, b, &tuning);
        state.enemies[ia].health = 5.0;
        state.enemies[ib].health = 5.0;
        state.lasers.push(Laser::new(a, 0.0, &tuning.laser));
        state.lasers.push(Laser::new(b, 0.0, &tuning.laser));

        resolve(&mut state, &tuning);
        state.compact();

        assert!(state.enemies.is_empty());
        assert!(state.lasers.is_empty());
        assert_eq!(state.score, 2 * tuning.enemies.scout.score);
    }

    #[test]
    fn test_enemy_planet_kill_is_scored() {
        let tuning = Tuning::default();
        let mut state = empty_state(&tuning);
        state.planets.push(planet(Vec2::new(100.0, 100.0), 20.0));
        add_enemy(&mut state, EnemyKind::Destroyer, Vec2::new(120.0, 100.0), &tuning);

        resolve(&mut state, &tuning);

        assert!(!state.enemies[0].active);
        assert_eq!(state.score, tuning.enemies.destroyer.score);
        // Destroyer explosion uses the x5 multiplier
        let boom = &state.explosions[0];
        assert!((boom.radius - 25.0 * 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_ship_enemy_collision_costs_a_life() {
        let tuning = Tuning::default();
        let mut state = empty_state(&tuning);
        let center = state.bounds.center();
        state.ship.pos = Vec2::new(200.0, 200.0);
        state.ship.vel = Vec2::new(3.0, 1.0);
        state.ship.ammo = 10.0;
        add_enemy(&mut state, EnemyKind::Scout, Vec2::new(205.0, 200.0), &tuning);
        let remaining = state.rounds.enemies_remaining();

        resolve(&mut state, &tuning);

        assert!(!state.enemies[0].active);
        assert_eq!(state.rounds.enemies_remaining(), remaining - 1);
        assert_eq!(state.lives, tuning.initial_lives - 1);
        assert_eq!(state.score, 0);
        assert_eq!(state.ship.pos, center);
        assert_eq!(state.ship.vel, Vec2::ZERO);
        assert_eq!(state.ship.ammo, tuning.ship.max_ammo);
        assert!(!state.game_over);
    }

    #[test]
    fn test_last_life_ends_game() {
        let tuning = Tuning::default();
        let mut state = empty_state(&tuning);
        state.lives = 1;
        let ship_pos = state.ship.pos;
        state.planets.push(planet(ship_pos, 10.0));

        resolve(&mut state, &tuning);

        assert_eq!(state.lives, 0);
        assert!(state.game_over);
        assert!(state.events.contains(&GameEvent::GameOver { score: 0 }));
    }

    #[test]
    fn test_one_ship_death_per_tick() {
        let tuning = Tuning::default();
        let mut state = empty_state(&tuning);
        let ship_pos = state.ship.pos;
        state.planets.push(planet(ship_pos + Vec2::new(20.0, 0.0), 10.0));
        state
            .rockets
            .push(Rocket::new(ship_pos, ship_pos + Vec2::X, 0, None, &tuning.rocket));

        resolve(&mut state, &tuning);

        assert_eq!(state.lives, tuning.initial_lives - 1);
    }

    #[test]
    fn test_laser_shoots_down_rocket() {
        let tuning = Tuning::default();
        let mut state = empty_state(&tuning);
        let p = Vec2::new(50.0, 50.0);
        state.rockets.push(Rocket::new(p, p + Vec2::X, 0, None, &tuning.rocket));
        state.lasers.push(Laser::new(p, 0.0, &tuning.laser));

        resolve(&mut state, &tuning);

        assert!(!state.rockets[0].active);
        assert!(!state.lasers[0].active);
        assert_eq!(state.score, tuning.rocket_score);
    }

    #[test]
    fn test_laser_prefers_enemy_over_rocket() {
        let tuning = Tuning::default();
        let mut state = empty_state(&tuning);
        let p = Vec2::new(50.0, 50.0);
        add_enemy(&mut state, EnemyKind::Fighter, p, &tuning);
        state.rockets.push(Rocket::new(p, p + Vec2::X, 0, None, &tuning.rocket));
        state.lasers.push(Laser::new(p, 0.0, &tuning.laser));

        resolve(&mut state, &tuning);

        // Laser spent on the enemy; the rocket then hits that same enemy
        assert!(!state.lasers[0].active);
        assert_eq!(state.enemies[0].health, 60.0 - 10.0 - 25.0);
        assert!(!state.rockets[0].active);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_rocket_ignores_its_shooter() {
        let tuning = Tuning::default();
        let mut state = empty_state(&tuning);
        let p = Vec2::new(400.0, 100.0);
        let idx = add_enemy(&mut state, EnemyKind::Scout, p, &tuning);
        let owner = state.enemies[idx].id;
        state
            .rockets
            .push(Rocket::new(p, p + Vec2::X, 0, Some(owner), &tuning.rocket));

        resolve(&mut state, &tuning);

        assert!(state.rockets[0].active);
        assert_eq!(state.enemies[0].health, tuning.enemies.scout.health);
    }

    #[test]
    fn test_rocket_rocket_and_planet_impacts() {
        let tuning = Tuning::default();
        let mut state = empty_state(&tuning);
        let p = Vec2::new(50.0, 50.0);
        state.rockets.push(Rocket::new(p, p + Vec2::X, 0, None, &tuning.rocket));
        state.rockets.push(Rocket::new(p + Vec2::new(3.0, 0.0), p, 0, None, &tuning.rocket));
        let q = Vec2::new(600.0, 400.0);
        state.planets.push(planet(q, 20.0));
        state.rockets.push(Rocket::new(q, Vec2::ZERO, 0, None, &tuning.rocket));

        resolve(&mut state, &tuning);

        assert!(state.rockets.iter().all(|r| !r.active));
        // The planet burst is the big one
        let biggest = state
            .explosions
            .iter()
            .map(|e| e.radius)
            .fold(0.0f32, f32::max);
        assert!((biggest - tuning.rocket.size * 3.0).abs() < 1e-4);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_rocket_kill_awards_score() {
        let tuning = Tuning::default();
        let mut state = empty_state(&tuning);
        let p = Vec2::new(300.0, 300.0) + Vec2::new(200.0, 0.0);
        let idx = add_enemy(&mut state, EnemyKind::Scout, p, &tuning);
        state.enemies[idx].health = 20.0;
        state.rockets.push(Rocket::new(p, Vec2::ZERO, 0, None, &tuning.rocket));

        resolve(&mut state, &tuning);

        assert!(!state.enemies[0].active);
        assert_eq!(state.score, tuning.enemies.scout.score);
    }
}
