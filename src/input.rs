use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::input::{mouse::MouseMotion, keyboard::KeyCode, ButtonInput};

use gecko::locomotion::smoothing::approach;
use gecko::locomotion::LocomotionDebug;

use crate::actions::{PlayerAction, ActionState};
use crate::creature::Gecko;
use crate::setup::MainCamera;
use crate::state::GameState;

pub const ROTATE_SPEED: f32 = 0.2;
pub const FOCUS_FOLLOW_RATE: f32 = 4.0;
pub const MAX_CAMERA_DT: f32 = 0.05; // never use a dt larger than 50ms
/// Keep the camera this far above the ground plane.
pub const MIN_CAMERA_HEIGHT: f32 = 0.5;

#[derive(Component)]
pub struct CameraOrbit {
    pub focus: Vec3,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
}

pub fn input_mapping_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut action_state: ResMut<ActionState>,
) {
    action_state.set(PlayerAction::TargetForward, keys.pressed(KeyCode::KeyW));
    action_state.set(PlayerAction::TargetBackward, keys.pressed(KeyCode::KeyS));
    action_state.set(PlayerAction::TargetLeft, keys.pressed(KeyCode::KeyA));
    action_state.set(PlayerAction::TargetRight, keys.pressed(KeyCode::KeyD));
    action_state.set_just_pressed(PlayerAction::ToggleWander, keys.just_pressed(KeyCode::KeyT));
    action_state.set_just_pressed(PlayerAction::ToggleGizmos, keys.just_pressed(KeyCode::KeyG));
}

pub fn pause_toggle_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GameState>>,
    current_state: Res<State<GameState>>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        if current_state.get() == &GameState::Running {
            next_state.set(GameState::Paused);
            info!("Paused game");
        } else if current_state.get() == &GameState::Paused {
            next_state.set(GameState::Running);
            info!("Resumed game");
        }
    }
}

pub fn gizmo_toggle_system(
    action_state: Res<ActionState>,
    overlay: Option<ResMut<LocomotionDebug>>,
) {
    if !action_state.just_pressed(PlayerAction::ToggleGizmos) {
        return;
    }
    let Some(mut overlay) = overlay else { return; };
    overlay.enabled = !overlay.enabled;
    let shown = overlay.enabled;
    info!("Locomotion gizmos {}", if shown { "on" } else { "off" });
}

pub fn camera_controller(
    time: Res<Time>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut motion_evr: EventReader<MouseMotion>,
    mut scroll_evr: EventReader<MouseWheel>,
    creatures: Query<&Transform, (With<Gecko>, Without<MainCamera>)>,
    mut query: Query<(&mut Transform, &mut CameraOrbit), With<MainCamera>>,
) {
    // 0) Clamp delta
    let mut dt = time.delta_secs();
    if dt > MAX_CAMERA_DT {
        dt = MAX_CAMERA_DT;
    }

    let Ok((mut tf, mut orbit)) = query.single_mut() else { return; };

    // 1) Follow the creature
    if let Some(body) = creatures.iter().next() {
        approach(&mut orbit.focus, &body.translation, FOCUS_FOLLOW_RATE, dt);
    }

    // 2) Zoom
    for ev in scroll_evr.read() {
        let amount = match ev.unit {
            MouseScrollUnit::Line => ev.y * 1.0,
            MouseScrollUnit::Pixel => ev.y * 0.02,
        };
        orbit.radius = (orbit.radius - amount).clamp(2.0, 40.0);
    }

    // 3) Orbit
    if mouse_buttons.pressed(MouseButton::Middle) {
        for ev in motion_evr.read() {
            orbit.yaw += ev.delta.x * ROTATE_SPEED * dt;
            orbit.pitch += ev.delta.y * ROTATE_SPEED * dt;
        }
    } else {
        motion_evr.clear();
    }

    orbit.pitch = orbit.pitch.clamp(
        -std::f32::consts::FRAC_PI_2 + 0.01,
        std::f32::consts::FRAC_PI_2 - 0.01,
    );

    // 4) Position camera
    let xz_radius = orbit.radius * orbit.pitch.cos();
    let offset = Vec3::new(
        xz_radius * orbit.yaw.cos(),
        orbit.radius * orbit.pitch.sin(),
        xz_radius * orbit.yaw.sin(),
    );

    tf.translation = orbit.focus + offset;

    // 5) Prevent underground camera
    if tf.translation.y < MIN_CAMERA_HEIGHT {
        tf.translation.y = MIN_CAMERA_HEIGHT;
    }

    tf.look_at(orbit.focus, Vec3::Y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn world_with_toggle(pressed: bool) -> World {
        let mut world = World::new();
        let mut actions = ActionState::default();
        actions.set_just_pressed(PlayerAction::ToggleGizmos, pressed);
        world.insert_resource(actions);
        world
    }

    #[test]
    fn gizmo_toggle_flips_the_overlay_once_per_press() {
        let mut world = world_with_toggle(true);
        world.init_resource::<LocomotionDebug>();

        world.run_system_once(gizmo_toggle_system).unwrap();
        assert!(world.resource::<LocomotionDebug>().enabled);

        // key held, no new edge
        world
            .resource_mut::<ActionState>()
            .set_just_pressed(PlayerAction::ToggleGizmos, false);
        world.run_system_once(gizmo_toggle_system).unwrap();
        assert!(world.resource::<LocomotionDebug>().enabled);

        world
            .resource_mut::<ActionState>()
            .set_just_pressed(PlayerAction::ToggleGizmos, true);
        world.run_system_once(gizmo_toggle_system).unwrap();
        assert!(!world.resource::<LocomotionDebug>().enabled);
    }

    #[test]
    fn gizmo_toggle_without_overlay_resource_does_nothing() {
        let mut world = world_with_toggle(true);
        world.run_system_once(gizmo_toggle_system).unwrap();
        assert!(!world.contains_resource::<LocomotionDebug>());
    }

    #[test]
    fn camera_focus_follows_the_gecko_only() {
        use bevy::ecs::event::Events;
        use std::time::Duration;

        let mut world = World::new();
        let mut time = Time::<()>::default();
        time.advance_by(Duration::from_millis(16));
        world.insert_resource(time);
        world.init_resource::<ButtonInput<MouseButton>>();
        world.init_resource::<Events<MouseMotion>>();
        world.init_resource::<Events<MouseWheel>>();

        // something else with a transform must not pull the camera
        world.spawn(Transform::from_xyz(-50.0, 0.0, 0.0));
        world.spawn((Gecko, Transform::from_xyz(5.0, 0.25, 0.0)));
        let camera = world
            .spawn((
                MainCamera,
                Transform::default(),
                CameraOrbit { focus: Vec3::ZERO, radius: 8.0, yaw: 0.0, pitch: 0.6 },
            ))
            .id();

        for _ in 0..400 {
            world.run_system_once(camera_controller).unwrap();
        }
        let focus = world.get::<CameraOrbit>(camera).unwrap().focus;
        assert!(focus.distance(Vec3::new(5.0, 0.25, 0.0)) < 1e-2, "focus at {focus}");
        let eye = world.get::<Transform>(camera).unwrap().translation;
        assert!(eye.y >= MIN_CAMERA_HEIGHT);
    }
}
