// src/locomotion/aim.rs
//! Head and eye tracking.
//!
//! The head turns toward the target by at most `max_turn_angle` away from its
//! rest pose. Both eyes share one look rotation taken from the head's
//! position (separate per-eye origins go cross-eyed on near targets), then
//! each eye's local yaw is clamped into its own window.

use bevy::prelude::*;

use crate::locomotion::config::{EyeConfig, HeadConfig, YawWindow};
use crate::locomotion::geometry::{look_rotation, rotate_towards, wrap_degrees};
use crate::locomotion::rig::Skeleton;
use crate::locomotion::smoothing::approached;

/// An eye node plus the local yaw range it may use.
#[derive(Clone, Copy, Debug)]
pub struct EyeAim {
    pub node: Entity,
    pub yaw_window: YawWindow,
}

#[derive(Clone, Debug)]
pub struct AimController {
    head: Entity,
    left_eye: EyeAim,
    right_eye: EyeAim,
    head_config: HeadConfig,
    eye_tracking_speed: f32,
}

impl AimController {
    /// Binds `eyes.left` to `left_eye` and `eyes.right` to `right_eye`.
    pub fn new(
        head: Entity,
        left_eye: Entity,
        right_eye: Entity,
        head_config: HeadConfig,
        eyes: &EyeConfig,
    ) -> Self {
        Self::with_eyes(
            head,
            EyeAim { node: left_eye, yaw_window: eyes.left },
            EyeAim { node: right_eye, yaw_window: eyes.right },
            head_config,
            eyes.tracking_speed,
        )
    }

    /// Explicit per-eye windows, for rigs whose eye bones use mirrored axes.
    pub fn with_eyes(
        head: Entity,
        left_eye: EyeAim,
        right_eye: EyeAim,
        head_config: HeadConfig,
        eye_tracking_speed: f32,
    ) -> Self {
        Self { head, left_eye, right_eye, head_config, eye_tracking_speed }
    }

    pub fn eyes(&self) -> [EyeAim; 2] {
        [self.left_eye, self.right_eye]
    }

    pub fn aim_head(&self, skeleton: &mut impl Skeleton, target: Vec3, dt: f32) {
        let head = self.head;
        let current = skeleton.local_rotation(head);

        // measure the target in the head's rest frame
        skeleton.set_local_rotation(head, Quat::IDENTITY);
        let world_dir = target - skeleton.position(head);
        let local_dir = skeleton.inverse_transform_direction(head, world_dir);

        let max_turn = self.head_config.max_turn_angle.to_radians();
        let goal = local_dir
            .try_normalize()
            .and_then(|dir| look_rotation(rotate_towards(Vec3::NEG_Z, dir, max_turn), Vec3::Y))
            .unwrap_or(current);

        let smoothed = approached(&current, &goal, self.head_config.tracking_speed, dt);
        skeleton.set_local_rotation(head, smoothed);
    }

    pub fn aim_eyes(&self, skeleton: &mut impl Skeleton, target: Vec3, dt: f32) {
        let goal = look_rotation(target - skeleton.position(self.head), Vec3::Y);
        for eye in [self.left_eye, self.right_eye] {
            self.aim_eye(skeleton, &eye, goal, dt);
        }
    }

    fn aim_eye(&self, skeleton: &mut impl Skeleton, eye: &EyeAim, goal: Option<Quat>, dt: f32) {
        let current = skeleton.rotation(eye.node);
        let goal = goal.unwrap_or(current);
        let smoothed = approached(&current, &goal, self.eye_tracking_speed, dt);
        skeleton.set_rotation(eye.node, smoothed);

        let clamped = clamp_local_yaw(skeleton.local_rotation(eye.node), eye.yaw_window);
        skeleton.set_local_rotation(eye.node, clamped);
    }
}

/// Clamp the yaw of a local rotation (YXZ Euler order) into `window`,
/// leaving pitch and roll as they are.
pub fn clamp_local_yaw(local: Quat, window: YawWindow) -> Quat {
    let (yaw, pitch, roll) = local.to_euler(EulerRot::YXZ);
    let yaw = window.clamp(wrap_degrees(yaw.to_degrees()));
    Quat::from_euler(EulerRot::YXZ, yaw.to_radians(), pitch, roll)
}
