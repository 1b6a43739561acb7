// src/locomotion/controller.rs
//! The per-creature root: owns the legs, gait, steering and aim, and runs
//! them in a fixed order once per frame.

use bevy::prelude::*;

use crate::locomotion::aim::AimController;
use crate::locomotion::config::CreatureConfig;
use crate::locomotion::gait::{GaitLegs, GaitScheduler, LegId};
use crate::locomotion::leg::LegStepper;
use crate::locomotion::rig::Skeleton;
use crate::locomotion::steering::{SteeringController, SteeringSample};

/// One value per leg.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Legs<T> {
    pub front_left: T,
    pub front_right: T,
    pub back_left: T,
    pub back_right: T,
}

impl<T> Legs<T> {
    pub fn get(&self, leg: LegId) -> &T {
        match leg {
            LegId::FrontLeft => &self.front_left,
            LegId::FrontRight => &self.front_right,
            LegId::BackLeft => &self.back_left,
            LegId::BackRight => &self.back_right,
        }
    }

    pub fn get_mut(&mut self, leg: LegId) -> &mut T {
        match leg {
            LegId::FrontLeft => &mut self.front_left,
            LegId::FrontRight => &mut self.front_right,
            LegId::BackLeft => &mut self.back_left,
            LegId::BackRight => &mut self.back_right,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (LegId, &T)> {
        LegId::ALL.into_iter().map(move |leg| (leg, self.get(leg)))
    }

    pub fn map_ref<U>(&self, mut f: impl FnMut(&T) -> U) -> Legs<U> {
        Legs {
            front_left: f(&self.front_left),
            front_right: f(&self.front_right),
            back_left: f(&self.back_left),
            back_right: f(&self.back_right),
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Legs<U> {
        Legs {
            front_left: f(self.front_left),
            front_right: f(self.front_right),
            back_left: f(self.back_left),
            back_right: f(self.back_right),
        }
    }
}

/// Entities the controller drives. Feet move in world space, so they should
/// not be children of the body; home anchors usually are.
#[derive(Clone, Copy, Debug)]
pub struct CreatureNodes {
    pub head: Entity,
    pub left_eye: Entity,
    pub right_eye: Entity,
    pub feet: Legs<Entity>,
    pub homes: Legs<Entity>,
}

/// Gait's window onto the steppers for one tick.
struct StepRequests<'a, S: Skeleton> {
    legs: &'a mut Legs<LegStepper>,
    skeleton: &'a S,
}

impl<S: Skeleton> GaitLegs for StepRequests<'_, S> {
    fn request_move(&mut self, leg: LegId) {
        self.legs.get_mut(leg).request_move(self.skeleton);
    }

    fn is_moving(&self, leg: LegId) -> bool {
        self.legs.get(leg).is_moving()
    }
}

#[derive(Component, Clone, Debug)]
pub struct LocomotionController {
    legs: Legs<LegStepper>,
    gait: GaitScheduler,
    steering: SteeringController,
    aim: AimController,
    last_steering: SteeringSample,
}

impl LocomotionController {
    pub fn new(nodes: &CreatureNodes, config: &CreatureConfig) -> Self {
        let legs = Legs {
            front_left: (nodes.feet.front_left, nodes.homes.front_left),
            front_right: (nodes.feet.front_right, nodes.homes.front_right),
            back_left: (nodes.feet.back_left, nodes.homes.back_left),
            back_right: (nodes.feet.back_right, nodes.homes.back_right),
        }
        .map(|(foot, home)| LegStepper::new(foot, home, config.legs));

        Self {
            legs,
            gait: GaitScheduler::default(),
            steering: SteeringController::new(config.steering),
            aim: AimController::new(
                nodes.head,
                nodes.left_eye,
                nodes.right_eye,
                config.head,
                &config.eyes,
            ),
            last_steering: SteeringSample::default(),
        }
    }

    /// Replace the aim controller, e.g. to bind eye windows differently.
    pub fn with_aim(mut self, aim: AimController) -> Self {
        self.aim = aim;
        self
    }

    pub fn legs(&self) -> &Legs<LegStepper> {
        &self.legs
    }

    pub fn gait(&self) -> &GaitScheduler {
        &self.gait
    }

    pub fn steering(&self) -> &SteeringController {
        &self.steering
    }

    pub fn aim(&self) -> &AimController {
        &self.aim
    }

    pub fn last_steering(&self) -> SteeringSample {
        self.last_steering
    }

    /// One frame: gait requests, leg trajectories, body steering, head aim,
    /// eye aim. Later stages see the poses earlier stages wrote.
    /// Frames with a non-positive or non-finite `dt` are skipped.
    pub fn tick(&mut self, skeleton: &mut impl Skeleton, root: Entity, target: Vec3, dt: f32) {
        if !(dt > 0.0 && dt.is_finite()) {
            return;
        }

        self.gait.tick(&mut StepRequests { legs: &mut self.legs, skeleton: &*skeleton });
        for leg in LegId::ALL {
            self.legs.get_mut(leg).advance(skeleton, dt);
        }

        self.last_steering = self.steering.update(skeleton, root, target, dt);
        self.aim.aim_head(skeleton, target, dt);
        self.aim.aim_eyes(skeleton, target, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locomotion::aim::EyeAim;
    use crate::locomotion::gait::DiagonalPair;
    use crate::locomotion::rig::Rig;
    use bevy::ecs::system::SystemState;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    const DT: f32 = 1.0 / 60.0;

    const HIPS: Legs<Vec3> = Legs {
        front_left: Vec3::new(-0.4, -0.25, -0.45),
        front_right: Vec3::new(0.4, -0.25, -0.45),
        back_left: Vec3::new(-0.4, -0.25, 0.45),
        back_right: Vec3::new(0.4, -0.25, 0.45),
    };

    fn spawn_creature(world: &mut World) -> (Entity, CreatureNodes) {
        let root = world.spawn(Transform::from_xyz(0.0, 0.25, 0.0)).id();
        let head = world.spawn((Transform::from_xyz(0.0, 0.1, -0.7), ChildOf(root))).id();
        let left_eye = world.spawn((Transform::from_xyz(-0.1, 0.05, -0.1), ChildOf(head))).id();
        let right_eye = world.spawn((Transform::from_xyz(0.1, 0.05, -0.1), ChildOf(head))).id();
        let homes = HIPS.map(|at| world.spawn((Transform::from_translation(at), ChildOf(root))).id());
        let feet = HIPS.map(|at| world.spawn(Transform::from_translation(at + Vec3::Y * 0.25)).id());
        (root, CreatureNodes { head, left_eye, right_eye, feet, homes })
    }

    #[test]
    fn no_cross_pair_step_starts_while_a_pair_is_in_flight() {
        let mut world = World::new();
        let (root, nodes) = spawn_creature(&mut world);
        let mut controller = LocomotionController::new(&nodes, &CreatureConfig::default());
        let mut state = SystemState::<Rig<'static, 'static>>::new(&mut world);
        let mut rig = state.get_mut(&mut world);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let mut target = Vec3::new(0.0, 0.0, -8.0);
        let mut steps_started = 0;
        for frame in 0..3000 {
            if frame % 240 == 0 {
                target = Vec3::new(rng.random_range(-12.0..12.0), 0.0, rng.random_range(-12.0..12.0));
            }
            let before = controller.legs().map_ref(LegStepper::is_moving);
            controller.tick(&mut rig, root, target, DT);
            let after = controller.legs().map_ref(LegStepper::is_moving);

            for leg in LegId::ALL {
                if *before.get(leg) || !*after.get(leg) {
                    continue;
                }
                steps_started += 1;
                let pair = leg.pair();
                for other in pair.other().legs() {
                    assert!(
                        !*before.get(other) && !*after.get(other),
                        "frame {frame}: {leg:?} began while {other:?} was stepping"
                    );
                }
            }
        }
        assert!(steps_started > 20, "only {steps_started} steps in a long walk");
    }

    #[test]
    fn feet_follow_the_body() {
        let mut world = World::new();
        let (root, nodes) = spawn_creature(&mut world);
        let mut controller = LocomotionController::new(&nodes, &CreatureConfig::default());
        let mut state = SystemState::<Rig<'static, 'static>>::new(&mut world);
        let mut rig = state.get_mut(&mut world);

        let target = Vec3::new(0.0, 0.0, -20.0);
        for _ in 0..900 {
            controller.tick(&mut rig, root, target, DT);
        }
        // walked well forward; every foot stays within a stride of its anchor
        assert!(rig.position(root).z < -10.0);
        let reach = CreatureConfig::default().legs.want_step_at_distance * 3.0;
        for (leg, foot) in nodes.feet.iter() {
            let home = rig.position(*nodes.homes.get(leg));
            let drift = rig.position(*foot).distance(home);
            assert!(drift < reach, "{leg:?} drifted {drift}");
        }
    }

    #[test]
    fn first_tick_activates_pair_a() {
        let mut world = World::new();
        let (root, nodes) = spawn_creature(&mut world);
        let mut controller = LocomotionController::new(&nodes, &CreatureConfig::default());
        let mut state = SystemState::<Rig<'static, 'static>>::new(&mut world);
        let mut rig = state.get_mut(&mut world);

        controller.tick(&mut rig, root, Vec3::new(0.0, 0.0, -3.0), DT);
        assert_eq!(controller.gait().active_pair(), DiagonalPair::A);
    }

    #[test]
    fn non_positive_dt_leaves_everything_alone() {
        let mut world = World::new();
        let (root, nodes) = spawn_creature(&mut world);
        let mut controller = LocomotionController::new(&nodes, &CreatureConfig::default());
        let mut state = SystemState::<Rig<'static, 'static>>::new(&mut world);
        let mut rig = state.get_mut(&mut world);

        let before = rig.global_transform(nodes.head);
        controller.tick(&mut rig, root, Vec3::new(5.0, 0.0, -5.0), 0.0);
        controller.tick(&mut rig, root, Vec3::new(5.0, 0.0, -5.0), f32::NAN);
        assert_eq!(rig.global_transform(nodes.head), before);
        assert_eq!(controller.steering().velocity, Vec3::ZERO);
        assert!(controller.legs().iter().all(|(_, leg)| !leg.is_moving()));
    }

    #[test]
    fn crossed_eye_windows_follow_the_eye_they_were_given() {
        let mut world = World::new();
        let (root, nodes) = spawn_creature(&mut world);
        let mut config = CreatureConfig::default();
        // hold body and head still so only the eyes move
        config.head.tracking_speed = 0.0;
        config.steering.turn_speed = 0.0;
        config.steering.move_speed = 0.0;
        let eyes = config.eyes;
        let crossed = AimController::with_eyes(
            nodes.head,
            EyeAim { node: nodes.left_eye, yaw_window: eyes.right },
            EyeAim { node: nodes.right_eye, yaw_window: eyes.left },
            config.head,
            eyes.tracking_speed,
        );
        let mut controller = LocomotionController::new(&nodes, &config).with_aim(crossed);
        let mut state = SystemState::<Rig<'static, 'static>>::new(&mut world);
        let mut rig = state.get_mut(&mut world);

        // far off to the left, level with the head
        let target = Vec3::new(-10.0, 0.35, -1.7);
        for _ in 0..300 {
            controller.tick(&mut rig, root, target, DT);
        }

        let yaw = |eye: Entity| rig.local_rotation(eye).to_euler(EulerRot::YXZ).0.to_degrees();
        assert!((yaw(nodes.left_eye) - eyes.right.max).abs() < 1e-3, "left eye at {}", yaw(nodes.left_eye));
        assert!((yaw(nodes.right_eye) - eyes.left.max).abs() < 1e-3, "right eye at {}", yaw(nodes.right_eye));
        assert_eq!(controller.aim().eyes()[0].yaw_window, eyes.right);
    }
}
