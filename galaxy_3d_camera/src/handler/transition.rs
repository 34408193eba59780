/// Timed blend from the camera's pose toward the active controller's pose.
///
/// A transition starts from a snapshot of the live camera and runs for
/// `seconds · time_factor`. The target is not stored: it is re-read from the
/// controller every evaluation, so a moving target is tracked while blending.

use glam::Vec3;
use crate::utils;

/// Camera pose sampled or applied by the handler
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
}

impl Pose {
    pub fn new(position: Vec3, rotation: Vec3, fov: f32) -> Self {
        Self { position, rotation, fov }
    }

    /// Linear position/FOV blend, shortest-arc rotation blend
    pub fn mix(&self, target: &Pose, t: f32) -> Pose {
        Pose {
            position: self.position.lerp(target.position, t),
            rotation: utils::mix_rotation(self.rotation, target.rotation, t),
            fov: self.fov + (target.fov - self.fov) * t,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CameraTransition {
    start: Pose,
    time_start_ms: f32,
    time_end_ms: f32,
    /// Scales every requested duration
    time_factor: f32,
    /// Ease-out exponent of the blend
    time_exponent: f32,
}

impl CameraTransition {
    pub fn new(time_factor: f32, time_exponent: f32) -> Self {
        Self {
            start: Pose::new(Vec3::ZERO, Vec3::ZERO, 90.0),
            time_start_ms: 0.0,
            time_end_ms: 0.0,
            time_factor,
            time_exponent,
        }
    }

    pub fn time_factor(&self) -> f32 {
        self.time_factor
    }

    pub fn set_time_factor(&mut self, factor: f32) {
        self.time_factor = factor;
    }

    pub fn time_exponent(&self) -> f32 {
        self.time_exponent
    }

    pub fn set_time_exponent(&mut self, exponent: f32) {
        self.time_exponent = exponent;
    }

    pub fn start(&self) -> &Pose {
        &self.start
    }

    pub fn time_start_ms(&self) -> f32 {
        self.time_start_ms
    }

    pub fn time_end_ms(&self) -> f32 {
        self.time_end_ms
    }

    /// Start blending from `from` at `now_ms`. Replaces any running blend.
    pub fn begin(&mut self, from: Pose, seconds: f32, now_ms: f32) {
        let seconds = seconds.max(0.0) * self.time_factor;

        self.start = from;
        self.time_start_ms = now_ms;
        self.time_end_ms = now_ms + seconds * 1000.0;
    }

    pub fn is_active(&self, now_ms: f32) -> bool {
        now_ms < self.time_end_ms && self.time_end_ms > self.time_start_ms
    }

    /// Blend weight of the target: `1 - ratio^exp` with `ratio` the share of
    /// time remaining
    pub fn tween_factor(&self, now_ms: f32) -> f32 {
        let duration = self.time_end_ms - self.time_start_ms;
        let ratio = if duration != 0.0 {
            ((self.time_end_ms - now_ms) / duration).clamp(0.0, 1.0)
        } else {
            0.0
        };

        1.0 - ratio.powf(self.time_exponent)
    }

    /// Pose for the camera at `now_ms`: the target itself once the blend is
    /// over, `None` when nothing is to be applied
    pub fn evaluate(&self, target: &Pose, now_ms: f32) -> Option<Pose> {
        if now_ms >= self.time_end_ms {
            return Some(*target);
        }
        if self.time_end_ms <= self.time_start_ms {
            return None;
        }

        Some(self.start.mix(target, self.tween_factor(now_ms)))
    }
}

#[cfg(test)]
#[path = "transition_tests.rs"]
mod tests;
