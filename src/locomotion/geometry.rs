// src/locomotion/geometry.rs
//! Small vector/rotation helpers shared by steering, stepping and aiming.
//! None of these return NaN for degenerate (zero-length) input.

use bevy::prelude::*;

/// Below this squared length a direction is treated as "no direction".
const DEGENERATE_LEN_SQ: f32 = 1e-12;

/// Remove the component of `v` along `normal`.
#[inline]
pub fn project_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    match normal.try_normalize() {
        Some(n) => v - n * v.dot(n),
        None => v,
    }
}

/// Signed angle in radians from `from` to `to` about `axis`, positive when
/// `to` lies clockwise of `from` looking down `axis` (i.e. to the right when
/// `axis` is up). Zero if either vector is degenerate.
pub fn signed_angle_clockwise(from: Vec3, to: Vec3, axis: Vec3) -> f32 {
    if from.length_squared() <= DEGENERATE_LEN_SQ || to.length_squared() <= DEGENERATE_LEN_SQ {
        return 0.0;
    }
    let angle = from.angle_between(to);
    if axis.dot(to.cross(from)) < 0.0 {
        -angle
    } else {
        angle
    }
}

/// Rotate `from` toward `to` by at most `max_angle` radians, keeping the
/// length of `from`. Returns `from` unchanged when either is degenerate.
pub fn rotate_towards(from: Vec3, to: Vec3, max_angle: f32) -> Vec3 {
    let (Some(f), Some(t)) = (from.try_normalize(), to.try_normalize()) else {
        return from;
    };
    let max_angle = max_angle.max(0.0);
    let angle = f.angle_between(t);
    if angle <= max_angle {
        return t * from.length();
    }
    // anti-parallel has no unique axis, any perpendicular will do
    let axis = f
        .cross(t)
        .try_normalize()
        .unwrap_or_else(|| f.any_orthonormal_vector());
    Quat::from_axis_angle(axis, max_angle) * from
}

/// Rotation whose local -Z points along `forward` with local +Y as close to
/// `up` as possible. `None` when `forward` is zero or parallel to `up`.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let back = -forward.try_normalize()?;
    let right = up.cross(back).try_normalize()?;
    let up = back.cross(right);
    Some(Quat::from_mat3(&Mat3::from_cols(right, up, back)))
}

/// Wrap degrees into (-180, 180].
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Quadratic Bézier through `control`, evaluated by repeated lerp.
#[inline]
pub fn quadratic_bezier(start: Vec3, control: Vec3, end: Vec3, t: f32) -> Vec3 {
    start.lerp(control, t).lerp(control.lerp(end, t), t)
}
