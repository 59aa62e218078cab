//! Data-driven game balance
//!
//! Every constant the simulation reads lives here. A `Tuning` is built once at
//! startup (defaults, or JSON overrides on top of the defaults), validated, and
//! then passed by reference to every component that needs it.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::EnemyKind;

/// Errors raised while loading or validating a tuning table
#[derive(Debug)]
pub enum TuningError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read tuning file: {err}"),
            Self::Parse(err) => write!(f, "failed to parse tuning JSON: {err}"),
            Self::Invalid { field, reason } => write!(f, "invalid tuning value `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for TuningError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

/// Player ship handling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipTuning {
    /// Collision radius in pixels
    pub size: f32,
    /// Velocity added per tick of thrust
    pub acceleration: f32,
    /// Forward thrust speed cap (reverse thrust is not clamped)
    pub max_speed: f32,
    /// Rotation per tick while a turn key is held (degrees)
    pub turn_degrees_per_tick: f32,
    pub max_ammo: f32,
    /// Ammo regained per tick
    pub ammo_recharge: f32,
    /// Ammo consumed per shot
    pub shot_cost: f32,
    /// Minimum ticks between shots
    pub shot_cooldown_ticks: u64,
    /// Laser muzzle distance as a multiple of `size`
    pub gun_length: f32,
}

impl Default for ShipTuning {
    fn default() -> Self {
        Self {
            size: 15.0,
            acceleration: 0.2,
            max_speed: 5.0,
            turn_degrees_per_tick: 3.0,
            max_ammo: 100.0,
            ammo_recharge: 0.5,
            shot_cost: 10.0,
            shot_cooldown_ticks: 10,
            gun_length: 1.3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LaserTuning {
    pub speed: f32,
    pub size: f32,
    pub lifetime_ticks: u32,
    pub damage: f32,
}

impl Default for LaserTuning {
    fn default() -> Self {
        Self {
            speed: 10.0,
            size: 10.0,
            lifetime_ticks: 60,
            damage: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RocketTuning {
    pub speed: f32,
    pub size: f32,
    /// Wall-clock lifetime
    pub lifetime_ms: u64,
    pub damage: f32,
    pub trail_length: usize,
    /// Multiplicative alpha decay applied to every trail point per tick
    pub trail_decay: f32,
    /// Trail points at or below this alpha are dropped
    pub trail_floor: f32,
    /// Launch distance from the shooter as a multiple of its size
    pub launch_distance: f32,
}

impl Default for RocketTuning {
    fn default() -> Self {
        Self {
            speed: 2.0,
            size: 5.0,
            lifetime_ms: 5000,
            damage: 25.0,
            trail_length: 8,
            trail_decay: 0.9,
            trail_floor: 0.05,
            launch_distance: 1.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionTuning {
    /// Radius growth per tick
    pub growth: f32,
    /// Alpha lost per tick
    pub fade: f32,
    /// Final radius as a multiple of the starting radius
    pub max_scale: f32,
    /// Size multiplier for a rocket bursting on a planet
    pub planet_impact_scale: f32,
}

impl Default for ExplosionTuning {
    fn default() -> Self {
        Self {
            growth: 2.0,
            fade: 0.05,
            max_scale: 3.0,
            planet_impact_scale: 3.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetTuning {
    pub count: usize,
    pub min_radius: f32,
    pub max_radius: f32,
    pub colors: Vec<String>,
    /// No planet may overlap this radius around the ship spawn point
    pub spawn_clearance: f32,
    /// Placement attempts per planet before giving up on the clearance rule
    pub placement_attempts: u32,
}

impl Default for PlanetTuning {
    fn default() -> Self {
        Self {
            count: 5,
            min_radius: 15.0,
            max_radius: 40.0,
            colors: ["#4B0082", "#800080", "#9932CC", "#8A2BE2", "#9370DB"]
                .into_iter()
                .map(String::from)
                .collect(),
            spawn_clearance: 80.0,
            placement_attempts: 32,
        }
    }
}

/// Per-kind enemy constants. Steering and shooting are shared code paths
/// parameterized by these values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub size: f32,
    pub health: f32,
    pub max_speed: f32,
    pub min_speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    /// Turn-rate cap (radians per tick)
    pub rotation_speed: f32,
    /// Weight of the previous turn-rate in the blend, in [0, 1)
    pub rotation_inertia: f32,
    /// Beyond this distance the enemy speeds up to `max_speed`
    pub acceleration_distance: f32,
    /// Inside this distance the enemy slows to `min_speed`
    pub deceleration_distance: f32,
    pub shoot_cooldown_ticks: u64,
    pub max_ammo: f32,
    /// Ammo regained per tick
    pub ammo_recharge: f32,
    pub score: u64,
    /// Explosion size multiplier on destruction
    pub explosion_scale: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self::scout()
    }
}

impl EnemyTuning {
    pub fn scout() -> Self {
        Self {
            size: 12.0,
            health: 30.0,
            max_speed: 1.0,
            min_speed: 0.2,
            acceleration: 0.03,
            deceleration: 0.02,
            rotation_speed: 0.01,
            rotation_inertia: 0.99,
            acceleration_distance: 150.0,
            deceleration_distance: 50.0,
            shoot_cooldown_ticks: 300,
            max_ammo: 3.0,
            ammo_recharge: 0.01,
            score: 100,
            explosion_scale: 1.0,
        }
    }

    pub fn fighter() -> Self {
        Self {
            size: 18.0,
            health: 60.0,
            max_speed: 1.0,
            min_speed: 0.2,
            acceleration: 0.04,
            deceleration: 0.025,
            rotation_speed: 0.04,
            rotation_inertia: 0.92,
            acceleration_distance: 180.0,
            deceleration_distance: 80.0,
            shoot_cooldown_ticks: 240,
            max_ammo: 5.0,
            ammo_recharge: 0.015,
            score: 250,
            explosion_scale: 3.0,
        }
    }

    pub fn destroyer() -> Self {
        Self {
            size: 25.0,
            health: 100.0,
            max_speed: 0.6,
            min_speed: 0.5,
            acceleration: 0.05,
            deceleration: 0.03,
            rotation_speed: 0.02,
            rotation_inertia: 0.95,
            acceleration_distance: 200.0,
            deceleration_distance: 100.0,
            shoot_cooldown_ticks: 180,
            max_ammo: 8.0,
            ammo_recharge: 0.02,
            score: 500,
            explosion_scale: 5.0,
        }
    }
}

/// Deserializes through [`EnemyTableOverrides`], so a partial per-kind entry
/// fills its gaps from that kind's own defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "EnemyTableOverrides")]
pub struct EnemyTable {
    pub scout: EnemyTuning,
    pub fighter: EnemyTuning,
    pub destroyer: EnemyTuning,
    /// Spawn distance outside the screen edge
    pub spawn_offset: f32,
}

impl Default for EnemyTable {
    fn default() -> Self {
        Self {
            scout: EnemyTuning::scout(),
            fighter: EnemyTuning::fighter(),
            destroyer: EnemyTuning::destroyer(),
            spawn_offset: 50.0,
        }
    }
}

macro_rules! enemy_override {
    ($($field:ident: $ty:ty),* $(,)?) => {
        /// Sparse per-kind override as read from JSON
        #[derive(Debug, Default, Deserialize)]
        #[serde(default)]
        struct EnemyOverride {
            $($field: Option<$ty>,)*
        }

        impl EnemyOverride {
            fn apply(self, mut base: EnemyTuning) -> EnemyTuning {
                $(if let Some(value) = self.$field {
                    base.$field = value;
                })*
                base
            }
        }
    };
}

enemy_override! {
    size: f32,
    health: f32,
    max_speed: f32,
    min_speed: f32,
    acceleration: f32,
    deceleration: f32,
    rotation_speed: f32,
    rotation_inertia: f32,
    acceleration_distance: f32,
    deceleration_distance: f32,
    shoot_cooldown_ticks: u64,
    max_ammo: f32,
    ammo_recharge: f32,
    score: u64,
    explosion_scale: f32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EnemyTableOverrides {
    scout: EnemyOverride,
    fighter: EnemyOverride,
    destroyer: EnemyOverride,
    spawn_offset: Option<f32>,
}

impl From<EnemyTableOverrides> for EnemyTable {
    fn from(raw: EnemyTableOverrides) -> Self {
        let defaults = Self::default();
        Self {
            scout: raw.scout.apply(defaults.scout),
            fighter: raw.fighter.apply(defaults.fighter),
            destroyer: raw.destroyer.apply(defaults.destroyer),
            spawn_offset: raw.spawn_offset.unwrap_or(defaults.spawn_offset),
        }
    }
}

impl EnemyTable {
    pub fn get(&self, kind: EnemyKind) -> &EnemyTuning {
        match kind {
            EnemyKind::Scout => &self.scout,
            EnemyKind::Fighter => &self.fighter,
            EnemyKind::Destroyer => &self.destroyer,
        }
    }
}

/// Per-round quotas, one entry per round (index 0 = round 1)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundTable {
    /// Banner time before spawning starts
    pub round_duration_ms: u64,
    /// Wall-clock gap between spawns
    pub spawn_delay_ms: u64,
    pub max_rounds: u32,
    pub scout: Vec<u32>,
    pub fighter: Vec<u32>,
    pub destroyer: Vec<u32>,
}

impl Default for RoundTable {
    fn default() -> Self {
        Self {
            round_duration_ms: 3000,
            spawn_delay_ms: 2000,
            max_rounds: 10,
            scout: vec![3, 4, 5, 6, 6, 7, 8, 8, 9, 10],
            fighter: vec![0, 1, 1, 2, 2, 3, 3, 4, 4, 5],
            destroyer: vec![0, 0, 1, 1, 2, 2, 2, 3, 3, 4],
        }
    }
}

impl RoundTable {
    /// Quota for `kind` in the 1-based `round`. Rounds past the table reuse
    /// its last entry.
    pub fn quota(&self, kind: EnemyKind, round: u32) -> u32 {
        let table = match kind {
            EnemyKind::Scout => &self.scout,
            EnemyKind::Fighter => &self.fighter,
            EnemyKind::Destroyer => &self.destroyer,
        };
        if table.is_empty() {
            return 0;
        }
        let index = (round.max(1) as usize - 1).min(table.len() - 1);
        table[index]
    }

    pub fn total(&self, round: u32) -> u32 {
        EnemyKind::ALL.iter().map(|&k| self.quota(k, round)).sum()
    }
}

/// Logical key names bound to each action
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Controls {
    pub up_key: String,
    pub down_key: String,
    pub left_key: String,
    pub right_key: String,
    pub shoot_key: String,
    pub restart_key: String,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            up_key: "ArrowUp".into(),
            down_key: "ArrowDown".into(),
            left_key: "ArrowLeft".into(),
            right_key: "ArrowRight".into(),
            shoot_key: " ".into(),
            restart_key: "r".into(),
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub initial_lives: u32,
    /// Score for shooting down a rocket
    pub rocket_score: u64,
    pub ship: ShipTuning,
    pub laser: LaserTuning,
    pub rocket: RocketTuning,
    pub explosion: ExplosionTuning,
    pub planets: PlanetTuning,
    pub enemies: EnemyTable,
    pub rounds: RoundTable,
    pub controls: Controls,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_lives: 3,
            rocket_score: 10,
            ship: ShipTuning::default(),
            laser: LaserTuning::default(),
            rocket: RocketTuning::default(),
            explosion: ExplosionTuning::default(),
            planets: PlanetTuning::default(),
            enemies: EnemyTable::default(),
            rounds: RoundTable::default(),
            controls: Controls::default(),
        }
    }
}

impl Tuning {
    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a JSON tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject tables the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
            TuningError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if self.initial_lives == 0 {
            return Err(invalid("initial_lives", "must be at least 1"));
        }
        if self.ship.size <= 0.0 || self.ship.max_ammo <= 0.0 {
            return Err(invalid("ship", "size and max_ammo must be positive"));
        }
        if self.laser.size <= 0.0 || self.laser.lifetime_ticks == 0 {
            return Err(invalid("laser", "size and lifetime must be positive"));
        }
        if self.rocket.size <= 0.0 || self.rocket.lifetime_ms == 0 {
            return Err(invalid("rocket", "size and lifetime must be positive"));
        }
        if !(0.0..1.0).contains(&self.rocket.trail_decay) {
            return Err(invalid("rocket.trail_decay", "must be in [0, 1)"));
        }
        if self.explosion.fade <= 0.0 {
            return Err(invalid("explosion.fade", "must be positive"));
        }
        if self.planets.min_radius <= 0.0 || self.planets.min_radius > self.planets.max_radius {
            return Err(invalid("planets", "radius range must be positive and ordered"));
        }
        if self.planets.count > 0 && self.planets.colors.is_empty() {
            return Err(invalid("planets.colors", "at least one color is required"));
        }
        for kind in EnemyKind::ALL {
            let e = self.enemies.get(kind);
            if e.size <= 0.0 || e.health <= 0.0 {
                return Err(invalid("enemies", format!("{kind:?} needs positive size and health")));
            }
            if !(0.0..1.0).contains(&e.rotation_inertia) {
                return Err(invalid("enemies", format!("{kind:?} rotation_inertia must be in [0, 1)")));
            }
            if e.min_speed > e.max_speed {
                return Err(invalid("enemies", format!("{kind:?} min_speed exceeds max_speed")));
            }
        }
        let r = &self.rounds;
        if r.scout.is_empty() || r.fighter.is_empty() || r.destroyer.is_empty() {
            return Err(invalid("rounds", "quota tables must not be empty"));
        }
        if r.max_rounds == 0 {
            return Err(invalid("rounds.max_rounds", "must be at least 1"));
        }
        Ok(())
    }
}
