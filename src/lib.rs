//! Nebula Strike - a wave-based 2D space shooter
//!
//! Core modules:
//! - `sim`: Simulation core (entities, rounds, combat, per-tick orchestration)
//! - `engine`: Loop lifecycle (start/stop/restart) and input routing
//! - `tuning`: Data-driven game balance
//! - `input`: Key bindings and per-frame action state
//! - `clock`: Wall-clock time sources
//! - `snapshot`: Read-only view handed to renderers

pub mod autopilot;
pub mod clock;
pub mod engine;
pub mod input;
pub mod sim;
pub mod snapshot;
pub mod tuning;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{Engine, EngineError, Viewport};
pub use input::{Action, InputState, KeyBindings};
pub use snapshot::RenderSnapshot;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal scheduler rate
    pub const TICK_RATE_HZ: u32 = 60;
    /// Nominal wall-clock duration of one tick
    pub const FRAME_MS: f64 = 1000.0 / TICK_RATE_HZ as f64;
    /// Default seed for the headless runner
    pub const DEFAULT_SEED: u64 = 0x5eed_cafe;
}

/// Normalize an angle to (-π, π]
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !angle.is_finite() {
        return 0.0;
    }
    angle %= TAU;
    if angle > PI {
        angle -= TAU;
    } else if angle <= -PI {
        angle += TAU;
    }
    angle
}

/// Unit vector pointing along `theta`
#[inline]
pub fn heading(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Bearing (radians) from `from` toward `to`
#[inline]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}
