// src/locomotion/components.rs
use bevy::prelude::*;

/// Names the entity a creature walks toward and looks at.
/// Sits next to the `LocomotionController` on the creature's root.
#[derive(Component, Clone, Copy, Debug)]
pub struct TrackTarget(pub Entity);
