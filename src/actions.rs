use bevy::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerAction {
    TargetForward,
    TargetBackward,
    TargetLeft,
    TargetRight,
    ToggleWander,
    ToggleGizmos,
}

/// Held state for movement actions, edge state for toggles.
#[derive(Default, Resource)]
pub struct ActionState {
    pressed: HashMap<PlayerAction, bool>,
    just_pressed: HashMap<PlayerAction, bool>,
}

impl ActionState {
    pub fn set(&mut self, action: PlayerAction, is_pressed: bool) {
        self.pressed.insert(action, is_pressed);
    }

    pub fn set_just_pressed(&mut self, action: PlayerAction, just: bool) {
        self.just_pressed.insert(action, just);
    }

    pub fn pressed(&self, action: PlayerAction) -> bool {
        *self.pressed.get(&action).unwrap_or(&false)
    }

    pub fn just_pressed(&self, action: PlayerAction) -> bool {
        *self.just_pressed.get(&action).unwrap_or(&false)
    }
}
