use bevy::prelude::*;

use gecko::locomotion::{CreatureConfigAssetPlugin, LocomotionPlugin, LocomotionSet};

mod setup;
mod input;
mod actions;
mod state;
mod ui;
mod target;
mod creature;

// re-export the bits we actually need in main
use actions::ActionState;
use input::{camera_controller, gizmo_toggle_system, input_mapping_system, pause_toggle_system};
use state::GameState;
use target::{click_to_place_target, move_target_with_keys, toggle_wander, wander_target};
use ui::{despawn_pause_overlay, spawn_controls_help, spawn_pause_overlay};

fn main() {
    App::new()
        // core engine plugins
        .add_plugins(DefaultPlugins)
        // creature config asset + per-frame locomotion
        .add_plugins(CreatureConfigAssetPlugin)
        .add_plugins(LocomotionPlugin::default())
        // init resources & game-state
        .init_resource::<ActionState>()
        .init_state::<GameState>()
        .configure_sets(Update, LocomotionSet.run_if(in_state(GameState::Running)))
        // camera, lights, ground, target, config handle
        .add_systems(Startup, (setup::setup, spawn_controls_help))
        // pause‐menu UI
        .add_systems(OnEnter(GameState::Paused), spawn_pause_overlay)
        .add_systems(OnExit(GameState::Paused), despawn_pause_overlay)
        // input + target + camera each frame
        .add_systems(Update, (pause_toggle_system, setup::spawn_creature_when_ready))
        .add_systems(
            Update,
            (
                input_mapping_system,
                (toggle_wander, gizmo_toggle_system),
                (move_target_with_keys, click_to_place_target, wander_target),
            )
                .chain()
                .before(LocomotionSet)
                .run_if(in_state(GameState::Running)),
        )
        .add_systems(
            Update,
            camera_controller.after(LocomotionSet).run_if(in_state(GameState::Running)),
        )
        .run();
}
