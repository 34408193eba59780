//! Angle helpers and the rotation ↔ direction convention
//!
//! Rotations are `(inclination, azimuth, roll)` in radians. Inclination is
//! measured from +Y (0 looks straight up, π straight down), azimuth from -Z
//! around +Y.

use std::f32::consts::{FRAC_PI_2, PI, TAU};
use glam::Vec3;

/// Wrap into `[0, 2π)`
pub fn clamp_rad(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid may round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Wrap into `[-π, π)`
pub fn clamp_rad_principal(angle: f32) -> f32 {
    clamp_rad(angle + PI) - PI
}

/// Component-wise [`clamp_rad_principal`]
pub fn clamp_rad_principal_vec(rot: Vec3) -> Vec3 {
    Vec3::new(
        clamp_rad_principal(rot.x),
        clamp_rad_principal(rot.y),
        clamp_rad_principal(rot.z),
    )
}

/// Shortest signed angular difference `to - from`, in `[-π, π)`
pub fn angle_delta(from: f32, to: f32) -> f32 {
    clamp_rad_principal(to - from)
}

/// Per-component shortest-arc interpolation between two rotations
pub fn mix_rotation(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    Vec3::new(
        from.x + angle_delta(from.x, to.x) * t,
        from.y + angle_delta(from.y, to.y) * t,
        from.z + angle_delta(from.z, to.z) * t,
    )
}

/// Shift `angle` by whole turns so it lies within π of `reference`
pub fn unwrap_near(angle: f32, reference: f32) -> f32 {
    reference + angle_delta(reference, angle)
}

/// Forward vector of a rotation (roll has no influence)
pub fn forward_from_rotation(rot: Vec3) -> Vec3 {
    let (sin_x, cos_x) = rot.x.sin_cos();
    let (sin_y, cos_y) = rot.y.sin_cos();
    Vec3::new(sin_x * sin_y, cos_x, -sin_x * cos_y)
}

/// Raw right vector of a rotation. Orthogonal to the forward vector only when
/// roll is zero; [`crate::galaxy3d::Camera`] re-orthogonalises it.
pub fn right_from_rotation(rot: Vec3) -> Vec3 {
    let tilt = FRAC_PI_2 - rot.z;
    let yaw = rot.y + FRAC_PI_2;
    Vec3::new(tilt.sin() * yaw.sin(), tilt.cos(), -tilt.sin() * yaw.cos())
}

/// Inclination and azimuth of a direction, with zero roll
pub fn rotation_from_direction(dir: Vec3) -> Vec3 {
    let d = dir.normalize_or_zero();
    Vec3::new(d.y.clamp(-1.0, 1.0).acos(), d.x.atan2(-d.z), 0.0)
}

#[cfg(test)]
#[path = "angles_tests.rs"]
mod tests;
