use bevy::prelude::*;
use bevy::transform::TransformSystem;

use crate::locomotion::systems::{drive_locomotion, draw_locomotion_gizmos};

/// Everything that moves the creature's bones. Hosts can gate or order it
/// (e.g. `.run_if(in_state(..))`).
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct LocomotionSet;

/// Toggle for the debug overlay.
#[derive(Resource, Debug, Default)]
pub struct LocomotionDebug {
    pub enabled: bool,
}

pub struct LocomotionPlugin {
    /// Register gizmo drawing (needs the gizmo plugin, i.e. `DefaultPlugins`).
    pub debug_gizmos: bool,
}

impl Default for LocomotionPlugin {
    fn default() -> Self {
        Self { debug_gizmos: true }
    }
}

impl LocomotionPlugin {
    /// No rendering dependencies; for tests and servers.
    pub fn headless() -> Self {
        Self { debug_gizmos: false }
    }
}

impl Plugin for LocomotionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, drive_locomotion.in_set(LocomotionSet));

        if self.debug_gizmos {
            app.init_resource::<LocomotionDebug>()
                // draw from this frame's propagated poses
                .add_systems(
                    PostUpdate,
                    draw_locomotion_gizmos.after(TransformSystem::TransformPropagate),
                );
        }
    }
}
