//! Key bindings and held-key state
//!
//! Key events arrive whenever the host delivers them; the engine samples
//! the held state once at the top of each tick.

use serde::{Deserialize, Serialize};

use crate::sim::TickInput;
use crate::tuning::Controls;

/// Logical game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Thrust,
    Reverse,
    TurnLeft,
    TurnRight,
    Fire,
    /// Edge-triggered: acts on press, never sampled
    Restart,
}

/// Physical key name to action
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: Vec<(String, Action)>,
}

impl KeyBindings {
    pub fn from_controls(controls: &Controls) -> Self {
        Self {
            bindings: vec![
                (controls.up_key.clone(), Action::Thrust),
                (controls.down_key.clone(), Action::Reverse),
                (controls.left_key.clone(), Action::TurnLeft),
                (controls.right_key.clone(), Action::TurnRight),
                (controls.shoot_key.clone(), Action::Fire),
                (controls.restart_key.clone(), Action::Restart),
            ],
        }
    }

    /// Look up a key. Letters match regardless of case so a held Shift
    /// doesn't swallow them.
    pub fn action(&self, key: &str) -> Option<Action> {
        self.bindings
            .iter()
            .find(|(bound, _)| bound.eq_ignore_ascii_case(key))
            .map(|(_, action)| *action)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_controls(&Controls::default())
    }
}

/// Which actions are currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub thrust: bool,
    pub reverse: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub fire: bool,
    pub restart: bool,
}

impl InputState {
    fn slot(&mut self, action: Action) -> &mut bool {
        match action {
            Action::Thrust => &mut self.thrust,
            Action::Reverse => &mut self.reverse,
            Action::TurnLeft => &mut self.turn_left,
            Action::TurnRight => &mut self.turn_right,
            Action::Fire => &mut self.fire,
            Action::Restart => &mut self.restart,
        }
    }

    /// Mark held; returns true only on the transition from released
    pub fn press(&mut self, action: Action) -> bool {
        let slot = self.slot(action);
        let fresh = !*slot;
        *slot = true;
        fresh
    }

    pub fn release(&mut self, action: Action) {
        *self.slot(action) = false;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Snapshot for the next tick
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            thrust: self.thrust,
            reverse: self.reverse,
            turn_left: self.turn_left,
            turn_right: self.turn_right,
            fire: self.fire,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let keys = KeyBindings::default();
        assert_eq!(keys.action("ArrowUp"), Some(Action::Thrust));
        assert_eq!(keys.action(" "), Some(Action::Fire));
        assert_eq!(keys.action("R"), Some(Action::Restart));
        assert_eq!(keys.action("q"), None);
    }

    #[test]
    fn test_custom_bindings() {
        let controls = Controls {
            up_key: "w".into(),
            ..Default::default()
        };
        let keys = KeyBindings::from_controls(&controls);
        assert_eq!(keys.action("w"), Some(Action::Thrust));
        assert_eq!(keys.action("ArrowUp"), None);
    }

    #[test]
    fn test_press_is_edge_detected() {
        let mut input = InputState::default();
        assert!(input.press(Action::Restart));
        // Key repeat
        assert!(!input.press(Action::Restart));
        input.release(Action::Restart);
        assert!(input.press(Action::Restart));
    }

    #[test]
    fn test_tick_input_mirrors_held_keys() {
        let mut input = InputState::default();
        input.press(Action::Thrust);
        input.press(Action::Fire);
        let t = input.tick_input();
        assert!(t.thrust && t.fire);
        assert!(!t.turn_left && !t.reverse);
        input.clear();
        assert_eq!(input.tick_input(), TickInput::default());
    }
}
