// src/target.rs
//! The thing the gecko chases: driven by keys, mouse clicks, or a seeded
//! random roam.

use std::f32::consts::TAU;

use bevy::input::mouse::MouseButton;
use bevy::input::ButtonInput;
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, Window};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::actions::{ActionState, PlayerAction};
use crate::input::CameraOrbit;

pub const TARGET_SPEED: f32 = 3.0;
/// Target hovers a little above the ground so the head has something to pitch at.
pub const TARGET_HEIGHT: f32 = 0.3;

#[derive(Component)]
pub struct Target;

/// Seeded random roaming inside a disc around the origin.
#[derive(Component)]
pub struct Wander {
    pub enabled: bool,
    pub radius: f32,
    pub speed: f32,
    pub retarget: Timer,
    goal: Vec3,
    rng: ChaCha8Rng,
}

impl Wander {
    pub fn new(seed: u64, radius: f32, speed: f32, every_secs: f32) -> Self {
        Self {
            enabled: false,
            radius,
            speed,
            retarget: Timer::from_seconds(every_secs, TimerMode::Repeating),
            goal: Vec3::new(0.0, TARGET_HEIGHT, 0.0),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniform over the disc.
    fn pick_goal(&mut self) -> Vec3 {
        let ang = self.rng.random_range(0.0..TAU);
        let dist = self.radius * self.rng.random::<f32>().sqrt();
        Vec3::new(dist * ang.cos(), TARGET_HEIGHT, dist * ang.sin())
    }
}

/// WASD moves the target relative to the camera; any manual move stops roaming.
pub fn move_target_with_keys(
    time: Res<Time>,
    action_state: Res<ActionState>,
    cameras: Query<&CameraOrbit>,
    mut targets: Query<(&mut Transform, Option<&mut Wander>), With<Target>>,
) {
    let Ok(orbit) = cameras.single() else { return; };

    let forward = Vec2::new(-orbit.yaw.cos(), -orbit.yaw.sin());
    let right = Vec2::new(-forward.y, forward.x);

    let mut dir = Vec2::ZERO;
    if action_state.pressed(PlayerAction::TargetForward) { dir += forward; }
    if action_state.pressed(PlayerAction::TargetBackward) { dir -= forward; }
    if action_state.pressed(PlayerAction::TargetLeft) { dir -= right; }
    if action_state.pressed(PlayerAction::TargetRight) { dir += right; }
    if dir == Vec2::ZERO {
        return;
    }

    let delta = dir.normalize() * TARGET_SPEED * time.delta_secs();
    for (mut tf, wander) in &mut targets {
        tf.translation.x += delta.x;
        tf.translation.z += delta.y;
        if let Some(mut wander) = wander {
            wander.enabled = false;
        }
    }
}

/// On left-click, cast a ray into the world and drop the target where it
/// meets the ground plane.
pub fn click_to_place_target(
    windows: Query<&Window, With<PrimaryWindow>>,
    buttons: Res<ButtonInput<MouseButton>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    mut targets: Query<(&mut Transform, Option<&mut Wander>), With<Target>>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }

    let Ok(window) = windows.single() else { return; };
    let Some(cursor_pos) = window.cursor_position() else { return; };
    let Ok((camera, cam_transform)) = cameras.single() else { return; };
    let Ok(ray) = camera.viewport_to_world(cam_transform, cursor_pos) else { return; };

    if ray.direction.y.abs() < f32::EPSILON {
        return;
    }
    let t_plane = -ray.origin.y / ray.direction.y;
    if t_plane <= 0.0 {
        return;
    }
    let hit = ray.origin + ray.direction * t_plane;

    for (mut tf, wander) in &mut targets {
        tf.translation = Vec3::new(hit.x, TARGET_HEIGHT, hit.z);
        if let Some(mut wander) = wander {
            wander.enabled = false;
        }
    }
    debug!("Target placed at ({:.2}, {:.2})", hit.x, hit.z);
}

pub fn toggle_wander(action_state: Res<ActionState>, mut wanderers: Query<&mut Wander>) {
    if !action_state.just_pressed(PlayerAction::ToggleWander) {
        return;
    }
    for mut wander in &mut wanderers {
        wander.enabled = !wander.enabled;
        if wander.enabled {
            let goal = wander.pick_goal();
            wander.goal = goal;
            wander.retarget.reset();
        }
        info!("Target wander {}", if wander.enabled { "on" } else { "off" });
    }
}

/// Roams toward the current goal, picking a new one every `retarget` period.
pub fn wander_target(time: Res<Time>, mut targets: Query<(&mut Transform, &mut Wander), With<Target>>) {
    let dt = time.delta_secs();

    for (mut tf, mut wander) in &mut targets {
        if !wander.enabled {
            continue;
        }
        if wander.retarget.tick(time.delta()).just_finished() {
            let goal = wander.pick_goal();
            wander.goal = goal;
        }

        let to_goal = wander.goal - tf.translation;
        let step = wander.speed * dt;
        if to_goal.length() > step {
            tf.translation += to_goal.normalize_or_zero() * step;
        } else {
            tf.translation = wander.goal;
        }
    }
}
