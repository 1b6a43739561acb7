// src/locomotion/systems.rs

use std::f32::consts::FRAC_PI_2;

use bevy::color::palettes::css::{GOLD, LIGHT_SKY_BLUE, ORANGE_RED, SEA_GREEN, SLATE_GRAY};
use bevy::prelude::*;

use crate::locomotion::components::TrackTarget;
use crate::locomotion::controller::LocomotionController;
use crate::locomotion::plugin::LocomotionDebug;
use crate::locomotion::rig::{Rig, Skeleton};

/// Samples per drawn step curve.
const CURVE_SEGMENTS: usize = 12;

/// Ticks every creature once with this frame's delta.
pub fn drive_locomotion(
    time: Res<Time>,
    mut creatures: Query<(Entity, &mut LocomotionController, &TrackTarget)>,
    mut rig: Rig,
) {
    let dt = time.delta_secs();
    for (root, mut controller, track) in &mut creatures {
        let target = rig.position(track.0);
        controller.tick(&mut rig, root, target, dt);
    }
}

/// Where a leg meets the body: the anchor's offset on its parent, lifted to
/// the parent's own level.
fn hip_position(anchor: &Transform, parent: &GlobalTransform) -> Vec3 {
    parent.transform_point(anchor.translation.with_y(0.0))
}

/// Home anchors, legs drawn from the body to each foot, in-flight step
/// curves and the standoff band.
pub fn draw_locomotion_gizmos(
    mut gizmos: Gizmos,
    overlay: Res<LocomotionDebug>,
    creatures: Query<(&LocomotionController, &TrackTarget)>,
    transforms: Query<&GlobalTransform>,
    anchors: Query<(&Transform, &ChildOf)>,
) {
    if !overlay.enabled {
        return;
    }

    for (controller, track) in &creatures {
        for (_, leg) in controller.legs().iter() {
            let (Ok(home), Ok(foot)) = (transforms.get(leg.home), transforms.get(leg.foot)) else {
                continue;
            };
            gizmos.sphere(Isometry3d::from_translation(home.translation()), 0.04, SEA_GREEN);

            let hip = anchors
                .get(leg.home)
                .ok()
                .and_then(|(local, child_of)| {
                    let parent = transforms.get(child_of.parent()).ok()?;
                    Some(hip_position(local, parent))
                })
                .unwrap_or(home.translation());
            let color = if leg.is_moving() { ORANGE_RED } else { SLATE_GRAY };
            gizmos.line(hip, foot.translation(), color);

            if let Some(path) = leg.trajectory() {
                let points = (0..=CURVE_SEGMENTS).map(|i| path.sample(i as f32 / CURVE_SEGMENTS as f32).0);
                gizmos.linestrip(points, GOLD);
            }
        }

        let Ok(target) = transforms.get(track.0) else { continue };
        let band = controller.steering().config();
        let flat = Isometry3d::new(target.translation(), Quat::from_rotation_x(FRAC_PI_2));
        gizmos.circle(flat, band.min_distance_to_target, LIGHT_SKY_BLUE);
        gizmos.circle(flat, band.max_distance_to_target, LIGHT_SKY_BLUE);
    }
}
