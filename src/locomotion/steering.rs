// src/locomotion/steering.rs
//! Body root motion: bang-bang turn rate toward the target, standoff-band
//! approach/retreat, both reached through exponential smoothing.

use bevy::prelude::*;

use crate::locomotion::config::SteeringConfig;
use crate::locomotion::geometry::{project_on_plane, signed_angle_clockwise};
use crate::locomotion::rig::Skeleton;
use crate::locomotion::smoothing::approach;

/// Only walk while the target is within this many degrees of straight ahead.
const MAX_WALKING_ANGLE: f32 = 90.0;

/// What the controller saw this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SteeringSample {
    /// Degrees, positive when the target is to the right.
    pub angle_to_target: f32,
    pub distance_to_target: f32,
}

#[derive(Clone, Debug)]
pub struct SteeringController {
    config: SteeringConfig,
    /// World-space linear velocity.
    pub velocity: Vec3,
    /// Degrees per second about the body's up axis, positive turns right.
    pub angular_velocity: f32,
}

impl SteeringController {
    pub fn new(config: SteeringConfig) -> Self {
        Self { config, velocity: Vec3::ZERO, angular_velocity: 0.0 }
    }

    pub fn config(&self) -> &SteeringConfig {
        &self.config
    }

    pub fn update(
        &mut self,
        skeleton: &mut impl Skeleton,
        root: Entity,
        target: Vec3,
        dt: f32,
    ) -> SteeringSample {
        let cfg = self.config;
        let position = skeleton.position(root);
        let up = skeleton.up(root);

        let toward_target = target - position;
        let toward_target_projected = project_on_plane(toward_target, up);
        let angle_to_target =
            signed_angle_clockwise(skeleton.forward(root), toward_target_projected, up).to_degrees();

        // --- Turning ---
        let mut target_angular_velocity = 0.0;
        if angle_to_target.abs() > cfg.max_angle_to_target {
            target_angular_velocity = if angle_to_target > 0.0 {
                cfg.turn_speed
            } else {
                -cfg.turn_speed
            };
        }
        approach(&mut self.angular_velocity, &target_angular_velocity, cfg.turn_acceleration, dt);

        // clockwise about up is a negative right-handed angle
        let turn = Quat::from_axis_angle(up, -(self.angular_velocity * dt).to_radians());
        let rotation = skeleton.rotation(root);
        skeleton.set_rotation(root, turn * rotation);

        // --- Moving ---
        let distance_to_target = toward_target.length();
        let mut target_velocity = Vec3::ZERO;
        if angle_to_target.abs() < MAX_WALKING_ANGLE {
            let heading = toward_target_projected.normalize_or_zero();
            if distance_to_target > cfg.max_distance_to_target {
                target_velocity = heading * cfg.move_speed;
            } else if distance_to_target < cfg.min_distance_to_target {
                target_velocity = -heading * cfg.move_speed;
            }
        }
        approach(&mut self.velocity, &target_velocity, cfg.move_acceleration, dt);
        skeleton.set_position(root, position + self.velocity * dt);

        SteeringSample { angle_to_target, distance_to_target }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locomotion::rig::Rig;
    use bevy::ecs::system::SystemState;

    const DT: f32 = 1.0 / 60.0;

    fn config() -> SteeringConfig {
        SteeringConfig {
            turn_speed: 90.0,
            move_speed: 2.0,
            turn_acceleration: 10.0,
            move_acceleration: 50.0,
            min_distance_to_target: 3.0,
            max_distance_to_target: 5.0,
            max_angle_to_target: 30.0,
        }
    }

    fn world_with_root() -> (World, Entity) {
        let mut world = World::new();
        let root = world.spawn(Transform::IDENTITY).id();
        (world, root)
    }

    #[test]
    fn approaches_into_the_standoff_band_and_settles() {
        let (mut world, root) = world_with_root();
        let mut state = SystemState::<Rig<'static, 'static>>::new(&mut world);
        let mut rig = state.get_mut(&mut world);
        let mut steering = SteeringController::new(config());
        let target = Vec3::new(0.0, 0.0, -10.0);

        let mut previous = f32::MAX;
        for _ in 0..600 {
            steering.update(&mut rig, root, target, DT);
            let distance = rig.position(root).distance(target);
            assert!(distance <= previous + 1e-5, "distance grew: {previous} -> {distance}");
            assert!(distance >= 3.0);
            previous = distance;
        }

        let distance = rig.position(root).distance(target);
        assert!((distance - 5.0).abs() < 0.1, "settled at {distance}");
        assert!(steering.velocity.length() < 1e-3);
        assert!(steering.angular_velocity.abs() < 1e-6);
    }

    #[test]
    fn angular_velocity_decays_without_reversing_inside_tolerance() {
        let (mut world, root) = world_with_root();
        let mut state = SystemState::<Rig<'static, 'static>>::new(&mut world);
        let mut rig = state.get_mut(&mut world);
        let mut steering = SteeringController::new(config());
        steering.angular_velocity = 90.0;
        // dead ahead and already in the band
        let target = Vec3::new(0.0, 0.0, -4.0);

        let mut previous = steering.angular_velocity;
        for _ in 0..300 {
            let sample = steering.update(&mut rig, root, target, DT);
            assert!(sample.angle_to_target.abs() <= 30.0);
            assert!(steering.angular_velocity >= 0.0);
            assert!(steering.angular_velocity <= previous);
            previous = steering.angular_velocity;
        }
        assert!(steering.angular_velocity < 1e-3);
    }

    #[test]
    fn turns_right_in_place_toward_a_side_target() {
        let (mut world, root) = world_with_root();
        let mut state = SystemState::<Rig<'static, 'static>>::new(&mut world);
        let mut rig = state.get_mut(&mut world);
        let mut steering = SteeringController::new(config());
        // right and slightly behind
        let target = Vec3::new(10.0, 0.0, 1.0);

        let first = steering.update(&mut rig, root, target, DT);
        assert!(first.angle_to_target > 90.0);
        assert!(steering.angular_velocity > 0.0);
        // rotate in place, never strafe or back up
        assert_eq!(steering.velocity, Vec3::ZERO);

        for _ in 0..600 {
            steering.update(&mut rig, root, target, DT);
        }
        let heading = rig.forward(root);
        let off = heading.angle_between(target - rig.position(root)).to_degrees();
        assert!(off <= 30.0 + 1.0, "still {off} degrees off");
    }

    #[test]
    fn left_target_gives_negative_angle() {
        let (mut world, root) = world_with_root();
        let mut state = SystemState::<Rig<'static, 'static>>::new(&mut world);
        let mut rig = state.get_mut(&mut world);
        let mut steering = SteeringController::new(config());

        let sample = steering.update(&mut rig, root, Vec3::new(-5.0, 0.0, -5.0), DT);
        assert!((sample.angle_to_target + 45.0).abs() < 1e-3);
        assert!(steering.angular_velocity < 0.0);
    }

    #[test]
    fn retreats_when_too_close() {
        let (mut world, root) = world_with_root();
        let mut state = SystemState::<Rig<'static, 'static>>::new(&mut world);
        let mut rig = state.get_mut(&mut world);
        let mut steering = SteeringController::new(config());

        steering.update(&mut rig, root, Vec3::new(0.0, 0.0, -1.0), DT);
        assert!(steering.velocity.z > 0.0, "should back away, got {:?}", steering.velocity);
    }

    #[test]
    fn target_directly_above_produces_no_nan() {
        let (mut world, root) = world_with_root();
        let mut state = SystemState::<Rig<'static, 'static>>::new(&mut world);
        let mut rig = state.get_mut(&mut world);
        let mut steering = SteeringController::new(config());

        for _ in 0..10 {
            steering.update(&mut rig, root, Vec3::new(0.0, 8.0, 0.0), DT);
        }
        assert!(rig.position(root).is_finite());
        assert!(rig.rotation(root).is_finite());
        assert_eq!(steering.velocity, Vec3::ZERO);
    }
}
