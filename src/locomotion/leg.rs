// src/locomotion/leg.rs
//! Per-leg stepping: a foot stays put until it drifts too far from its home
//! anchor, then arcs back to (slightly past) the anchor over a fixed duration.

use bevy::math::curve::{Curve, EaseFunction};
use bevy::prelude::*;

use crate::locomotion::config::LegConfig;
use crate::locomotion::geometry::{project_on_plane, quadratic_bezier};
use crate::locomotion::rig::Skeleton;

/// One step's path, fixed when the step starts.
#[derive(Clone, Debug, PartialEq)]
pub struct StepTrajectory {
    pub start: Vec3,
    pub control: Vec3,
    pub end: Vec3,
    pub start_rotation: Quat,
    pub end_rotation: Quat,
    pub elapsed: f32,
}

impl StepTrajectory {
    /// Path from the foot's current pose to just past `home`, lifted by half
    /// the step length along the anchor's up axis.
    pub fn toward_home(
        foot_position: Vec3,
        foot_rotation: Quat,
        home: &GlobalTransform,
        config: &LegConfig,
    ) -> Self {
        let home_position = home.translation();
        let toward_home = home_position - foot_position;

        let overshoot_distance = config.want_step_at_distance * config.step_overshoot_fraction;
        // kept level so the foot never overshoots into the ground or the air
        let overshoot = project_on_plane(toward_home * overshoot_distance, Vec3::Y);
        let end = home_position + overshoot;

        let lift = home.rotation() * Vec3::Y * (foot_position.distance(end) * 0.5);
        let control = foot_position.midpoint(end) + lift;

        Self {
            start: foot_position,
            control,
            end,
            start_rotation: foot_rotation,
            end_rotation: home.rotation(),
            elapsed: 0.0,
        }
    }

    /// Pose at eased progress `t` in [0, 1].
    pub fn sample(&self, t: f32) -> (Vec3, Quat) {
        (
            quadratic_bezier(self.start, self.control, self.end, t),
            self.start_rotation.slerp(self.end_rotation, t),
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum StepState {
    #[default]
    Idle,
    Stepping(StepTrajectory),
}

/// Drives one foot entity toward its home anchor entity.
#[derive(Clone, Debug)]
pub struct LegStepper {
    pub foot: Entity,
    pub home: Entity,
    config: LegConfig,
    state: StepState,
}

impl LegStepper {
    pub fn new(foot: Entity, home: Entity, config: LegConfig) -> Self {
        Self { foot, home, config, state: StepState::Idle }
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        matches!(self.state, StepState::Stepping(_))
    }

    pub fn state(&self) -> &StepState {
        &self.state
    }

    pub fn config(&self) -> &LegConfig {
        &self.config
    }

    pub fn trajectory(&self) -> Option<&StepTrajectory> {
        match &self.state {
            StepState::Stepping(trajectory) => Some(trajectory),
            StepState::Idle => None,
        }
    }

    /// Start a step if the foot has drifted past the trigger distance.
    /// Returns whether a step started; always `false` mid-step.
    pub fn request_move(&mut self, skeleton: &impl Skeleton) -> bool {
        if self.is_moving() {
            return false;
        }

        let foot_position = skeleton.position(self.foot);
        let home = skeleton.global_transform(self.home);
        let drift = foot_position.distance(home.translation());
        if drift <= self.config.want_step_at_distance {
            return false;
        }

        let trajectory = StepTrajectory::toward_home(
            foot_position,
            skeleton.rotation(self.foot),
            &home,
            &self.config,
        );
        debug!(
            "Leg {}: stepping {:.3} from home, landing at {:?}",
            self.foot, drift, trajectory.end
        );
        self.state = StepState::Stepping(trajectory);
        true
    }

    /// Move the foot along the current step; no-op while idle.
    pub fn advance(&mut self, skeleton: &mut impl Skeleton, dt: f32) {
        let StepState::Stepping(trajectory) = &mut self.state else {
            return;
        };

        trajectory.elapsed += dt;
        let duration = self.config.move_duration;
        if trajectory.elapsed >= duration || duration <= 0.0 {
            skeleton.set_position(self.foot, trajectory.end);
            skeleton.set_rotation(self.foot, trajectory.end_rotation);
            self.state = StepState::Idle;
            return;
        }

        let eased = EaseFunction::CubicInOut.sample_clamped(trajectory.elapsed / duration);
        let (position, rotation) = trajectory.sample(eased);
        skeleton.set_position(self.foot, position);
        skeleton.set_rotation(self.foot, rotation);
    }
}
