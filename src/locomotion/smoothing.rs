// src/locomotion/smoothing.rs
//! Frame-rate independent exponential smoothing.
//!
//! Every smoothed quantity in the rig moves by
//! `lerp(current, target, 1 - e^(-rate * dt))` (slerp for rotations), so the
//! fraction covered per second depends only on `rate`, never on how many
//! frames that second was split into.

use bevy::math::StableInterpolate;

/// Nudge `current` toward `target` in place.
#[inline]
pub fn approach<T: StableInterpolate>(current: &mut T, target: &T, rate: f32, dt: f32) {
    // -inf * 0 would poison the exponent with NaN
    if dt <= 0.0 || !dt.is_finite() {
        return;
    }
    current.smooth_nudge(target, rate.max(0.0), dt);
}

/// Like [`approach`], returning the new value instead of assigning it.
#[inline]
pub fn approached<T: StableInterpolate + Clone>(current: &T, target: &T, rate: f32, dt: f32) -> T {
    let mut value = current.clone();
    approach(&mut value, target, rate, dt);
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::prelude::*;

    fn run_scalar(rate: f32, dt: f32, total: f32) -> f32 {
        let mut v = 0.0_f32;
        let steps = (total / dt).round() as usize;
        for _ in 0..steps {
            approach(&mut v, &10.0, rate, dt);
        }
        v
    }

    #[test]
    fn scalar_convergence_is_frame_rate_independent() {
        let coarse = run_scalar(3.0, 1.0 / 30.0, 1.0);
        let fine = run_scalar(3.0, 1.0 / 240.0, 1.0);
        assert!((coarse - fine).abs() < 1e-3, "{coarse} vs {fine}");
        // 1 - e^-3 of the way there after one second
        let expected = 10.0 * (1.0 - (-3.0_f32).exp());
        assert!((fine - expected).abs() < 1e-3);
    }

    #[test]
    fn vector_convergence_is_frame_rate_independent() {
        let target = Vec3::new(4.0, -2.0, 7.5);
        let mut coarse = Vec3::ZERO;
        let mut fine = Vec3::ZERO;
        for _ in 0..15 {
            approach(&mut coarse, &target, 5.0, 1.0 / 30.0);
        }
        for _ in 0..120 {
            approach(&mut fine, &target, 5.0, 1.0 / 240.0);
        }
        assert!(coarse.distance(fine) < 1e-3);
    }

    #[test]
    fn infinite_rate_snaps_and_zero_rate_holds() {
        let mut snapped = 1.0_f32;
        approach(&mut snapped, &5.0, f32::INFINITY, 1.0 / 60.0);
        assert_eq!(snapped, 5.0);

        let mut held = 1.0_f32;
        approach(&mut held, &5.0, 0.0, 1.0 / 60.0);
        assert_eq!(held, 1.0);
    }

    #[test]
    fn non_positive_dt_is_a_no_op() {
        let mut v = Vec3::X;
        approach(&mut v, &Vec3::Y, f32::INFINITY, 0.0);
        assert_eq!(v, Vec3::X);
        approach(&mut v, &Vec3::Y, 4.0, -0.1);
        assert_eq!(v, Vec3::X);
    }

    #[test]
    fn rotations_slerp_toward_target() {
        let target = Quat::from_rotation_y(1.2);
        let halfway = approached(&Quat::IDENTITY, &target, 1.0, std::f32::consts::LN_2);
        let (axis, angle) = halfway.to_axis_angle();
        assert!(axis.distance(Vec3::Y) < 1e-4);
        assert!((angle - 0.6).abs() < 1e-4);
    }
}
