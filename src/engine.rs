//! Loop lifecycle and input routing
//!
//! The engine owns the one `GameState`, the tuning table and a clock. An
//! external scheduler calls [`Engine::advance`] about 60 times a second; the
//! engine never spins its own loop.

use std::fmt;

use rand::Rng;

use crate::autopilot::autopilot_input;
use crate::clock::Clock;
use crate::input::{Action, InputState, KeyBindings};
use crate::sim::{self, Bounds, GameState};
use crate::snapshot::RenderSnapshot;
use crate::tuning::{Tuning, TuningError};

/// Drawing surface dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    fn bounds(self) -> Result<Bounds, EngineError> {
        let usable = |v: f32| v.is_finite() && v > 0.0;
        if usable(self.width) && usable(self.height) {
            Ok(Bounds::new(self.width, self.height))
        } else {
            Err(EngineError::InvalidSurface {
                width: self.width,
                height: self.height,
            })
        }
    }
}

#[derive(Debug)]
pub enum EngineError {
    /// No surface to draw on; the loop refuses to start
    MissingSurface,
    InvalidSurface { width: f32, height: f32 },
    Tuning(TuningError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSurface => write!(f, "no rendering surface available"),
            Self::InvalidSurface { width, height } => {
                write!(f, "invalid surface size {width}x{height}")
            }
            Self::Tuning(e) => write!(f, "bad tuning: {e}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Tuning(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TuningError> for EngineError {
    fn from(e: TuningError) -> Self {
        Self::Tuning(e)
    }
}

pub struct Engine<C: Clock> {
    state: GameState,
    tuning: Tuning,
    clock: C,
    bindings: KeyBindings,
    input: InputState,
    running: bool,
    autopilot: bool,
}

impl<C: Clock> Engine<C> {
    /// Build a match on `surface`. Fails without a usable surface or with an
    /// invalid tuning table. Round 1 starts right away; call [`start`] to
    /// begin ticking.
    ///
    /// [`start`]: Engine::start
    pub fn new(surface: Option<Viewport>, tuning: Tuning, clock: C, seed: u64) -> Result<Self, EngineError> {
        let bounds = surface.ok_or(EngineError::MissingSurface)?.bounds()?;
        tuning.validate()?;

        let mut state = GameState::new(seed, bounds, &tuning);
        state.begin_next_round(clock.now_ms(), &tuning);
        log::info!(
            "Engine ready: {}x{} surface, seed {seed:#x}",
            bounds.width,
            bounds.height
        );

        Ok(Self {
            bindings: KeyBindings::from_controls(&tuning.controls),
            state,
            tuning,
            clock,
            input: InputState::default(),
            running: false,
            autopilot: false,
        })
    }

    pub fn start(&mut self) {
        if !self.running {
            log::info!("Loop started");
        }
        self.running = true;
    }

    pub fn stop(&mut self) {
        if self.running {
            log::info!("Loop stopped at frame {}", self.state.frame_count);
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Let the demo pilot fly instead of the held keys
    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
    }

    /// Run one tick if the loop is running. Returns whether a tick ran.
    /// Game over halts the loop until [`restart`](Engine::restart).
    pub fn advance(&mut self) -> bool {
        if !self.running {
            return false;
        }

        let input = if self.autopilot {
            autopilot_input(&self.state)
        } else {
            self.input.tick_input()
        };
        sim::tick(&mut self.state, &input, self.clock.now_ms(), &self.tuning);

        for event in &self.state.events {
            log::trace!("{event:?}");
        }
        if self.state.game_over {
            self.stop();
        }
        true
    }

    /// Throw the match away and start over at round 1 with a fresh seed
    /// drawn from the current run
    pub fn restart(&mut self) {
        let seed = self.state.rng.random::<u64>();
        let bounds = self.state.bounds;
        self.state = GameState::new(seed, bounds, &self.tuning);
        self.state.begin_next_round(self.clock.now_ms(), &self.tuning);
        self.input.clear();
        log::info!("Restarted with seed {seed:#x}");
        self.start();
    }

    /// Route a key press. Restart acts immediately; while the game is over
    /// nothing else is accepted.
    pub fn key_down(&mut self, key: &str) {
        let Some(action) = self.bindings.action(key) else {
            return;
        };
        if action == Action::Restart {
            if self.input.press(action) {
                self.restart();
                // Still physically held
                self.input.press(action);
            }
            return;
        }
        if self.state.game_over {
            return;
        }
        self.input.press(action);
    }

    pub fn key_up(&mut self, key: &str) {
        if let Some(action) = self.bindings.action(key) {
            self.input.release(action);
        }
    }

    /// Adopt a new surface size: bounds change, a ship left outside is
    /// moved to the new center, and planets are laid out again
    pub fn resize(&mut self, surface: Viewport) -> Result<(), EngineError> {
        let bounds = surface.bounds()?;
        self.state.bounds = bounds;
        if !bounds.contains(self.state.ship.pos, 0.0) {
            self.state.ship.pos = bounds.center();
        }
        self.state.regenerate_planets(&self.tuning);
        log::debug!("Resized to {}x{}", bounds.width, bounds.height);
        Ok(())
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(&self.state)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }
}
