//! Scripted dolly controller
//!
//! Plays a camera move over a fixed duration. The eye either holds a fixed
//! position or follows a NURBS curve; the view aims at a fixed point, a unit,
//! or a second curve. Progress is measured on the wall clock and can be
//! paused and resumed.

use glam::{Vec2, Vec3};
use crate::config::CameraConfig;
use crate::utils::{self, NurbsCurve};
use super::base::{self, ControllerBase};
use super::{ControllerContext, StateMap, SwitchSource};

const LOG_SOURCE: &str = "galaxy3d::DollyController";

/// Length of the move started when the mode is entered
const DEFAULT_RUN_MS: f32 = 10_000.0;

/// Where the eye comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DollyPositionMode {
    /// Fixed position set by script
    Position,
    /// Point on the position curve
    Curve,
}

/// What the eye looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DollyLookMode {
    Position,
    Unit,
    Curve,
}

#[derive(Debug, Clone)]
pub struct DollyController {
    pub(crate) base: ControllerBase,
    rotation: Vec3,
    position_mode: DollyPositionMode,
    look_mode: DollyLookMode,
    /// Eye position in `DollyPositionMode::Position`
    fixed_position: Vec3,
    curve: NurbsCurve,
    look_target: Vec3,
    look_unit: i32,
    look_curve: NurbsCurve,
    /// Eye offset by the look target instead of absolute
    relative: bool,
    start_ms: f32,
    end_ms: f32,
    /// Frozen clock while paused
    paused_at: Option<f32>,
}

impl DollyController {
    pub fn new(config: &CameraConfig, map_size: Vec2) -> Self {
        let rotation = Vec3::new(2.677, 0.0, 0.0);
        let mut base = ControllerBase::new(map_size);
        base.direction = utils::forward_from_rotation(rotation);

        let mut controller = Self {
            base,
            rotation,
            position_mode: DollyPositionMode::Position,
            look_mode: DollyLookMode::Position,
            fixed_position: Vec3::splat(400.0),
            curve: NurbsCurve::default(),
            look_target: Vec3::ZERO,
            look_unit: -1,
            look_curve: NurbsCurve::default(),
            relative: false,
            start_ms: 0.0,
            end_ms: 0.0,
            paused_at: None,
        };
        controller.config_update(config);
        controller
    }

    pub fn config_update(&mut self, config: &CameraConfig) {
        self.base.fov = config.get_float("CamDollyFOV");
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    // ===== PLAYBACK =====

    /// Start a move of `duration_ms` at `now_ms`
    pub fn run(&mut self, now_ms: f32, duration_ms: f32) {
        self.start_ms = now_ms;
        self.end_ms = now_ms + duration_ms;
        self.paused_at = None;
    }

    /// Freeze the move, at `fraction` of its length when given in `[0, 1]`,
    /// otherwise at `now_ms`
    pub fn pause(&mut self, now_ms: f32, fraction: Option<f32>) {
        self.paused_at = match fraction {
            Some(f) if (0.0..=1.0).contains(&f) => Some(self.start_ms + f * (self.end_ms - self.start_ms)),
            _ => Some(now_ms),
        };
    }

    /// Continue from the paused point
    pub fn resume(&mut self, now_ms: f32) {
        let Some(paused_at) = self.paused_at.take() else {
            return;
        };

        let duration = self.end_ms - self.start_ms;
        self.start_ms = now_ms - (paused_at - self.start_ms);
        self.end_ms = self.start_ms + duration;
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Progress in `[0, 1]`; `0` before any run
    pub fn fraction(&self, now_ms: f32) -> f32 {
        if self.end_ms == self.start_ms {
            return 0.0;
        }
        let current = self.paused_at.unwrap_or(now_ms);
        (1.0 - (self.end_ms - current) / (self.end_ms - self.start_ms)).clamp(0.0, 1.0)
    }

    // ===== SCRIPT SETUP =====

    pub fn position_mode(&self) -> DollyPositionMode {
        self.position_mode
    }

    pub fn set_position_mode(&mut self, mode: DollyPositionMode) {
        self.position_mode = mode;
    }

    pub fn look_mode(&self) -> DollyLookMode {
        self.look_mode
    }

    pub fn set_look_mode(&mut self, mode: DollyLookMode) {
        self.look_mode = mode;
    }

    pub fn set_curve(&mut self, curve: NurbsCurve) {
        self.curve = curve;
    }

    pub fn set_look_curve(&mut self, curve: NurbsCurve) {
        self.look_curve = curve;
    }

    pub fn set_look_position(&mut self, target: Vec3) {
        self.look_target = target;
    }

    pub fn set_look_unit(&mut self, unit_id: i32) {
        self.look_unit = unit_id;
    }

    pub fn set_relative(&mut self, relative: bool) {
        self.relative = relative;
    }

    // ===== INPUT =====

    pub fn key_move(&mut self, _mv: Vec3, _ctx: &mut ControllerContext) {}

    pub fn mouse_move(&mut self, _mv: Vec3, _ctx: &mut ControllerContext) {}

    pub fn screen_edge_move(&mut self, _mv: Vec3, _ctx: &mut ControllerContext) {}

    pub fn mouse_wheel_move(&mut self, _delta: f32, _ref_dir: Vec3, _ctx: &mut ControllerContext) {}

    /// Place the eye and aim it for the current progress
    pub fn update(&mut self, ctx: &mut ControllerContext) {
        let t = self.fraction(ctx.env.now_ms());

        let eye = match self.position_mode {
            DollyPositionMode::Position => Some(self.fixed_position),
            DollyPositionMode::Curve => match self.curve.point_at_fraction(t) {
                Ok(point) => Some(point),
                Err(err) => {
                    crate::engine_warn!(LOG_SOURCE, "Position curve: {}", err);
                    None
                }
            },
        };

        let target = match self.look_mode {
            DollyLookMode::Position => Some(self.look_target),
            DollyLookMode::Curve => match self.look_curve.point_at_fraction(t) {
                Ok(point) => Some(point),
                Err(err) => {
                    crate::engine_warn!(LOG_SOURCE, "Look curve: {}", err);
                    None
                }
            },
            DollyLookMode::Unit => ctx.env.units.and_then(|units| units.unit_position(self.look_unit)),
        };

        // no curve point: hold the last pose
        if let Some(eye) = eye {
            self.base.position = match (self.relative, target) {
                (true, Some(target)) => eye + target,
                _ => eye,
            };
        }

        if let Some(target) = target {
            let dir = (target - self.base.position).normalize_or_zero();
            if dir != Vec3::ZERO {
                self.base.direction = dir;
            }
        }

        let new_rotation = utils::rotation_from_direction(self.base.direction);
        self.rotation = Vec3::new(
            new_rotation.x,
            utils::unwrap_near(new_rotation.y, self.rotation.y),
            new_rotation.z,
        );

        // any smoothing would lag behind the curve
        ctx.request_transition(0.0);
    }

    // ===== POSE =====

    pub fn set_position(&mut self, position: Vec3, _ctx: &mut ControllerContext) {
        self.fixed_position = position;
        self.base.position = position;
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        self.base.direction = utils::forward_from_rotation(rotation);
    }

    pub fn set_direction(&mut self, direction: Vec3) {
        self.base.direction = direction;
        self.rotation = utils::rotation_from_direction(direction);
    }

    pub fn switch_from(&self) -> Vec3 {
        self.base.position
    }

    pub fn switch_to(&mut self, source: &SwitchSource, announce: bool, ctx: &mut ControllerContext) {
        if announce {
            crate::engine_info!(LOG_SOURCE, "Switching to Dolly style camera");
        }

        self.rotation = source.rotation;
        self.base.direction = utils::forward_from_rotation(source.rotation);
        self.run(ctx.env.now_ms(), DEFAULT_RUN_MS);
    }

    // ===== STATE =====

    pub fn get_state(&self, sm: &mut StateMap) {
        self.base.get_state(sm);
        sm.insert("rx".to_string(), self.rotation.x);
        sm.insert("ry".to_string(), self.rotation.y);
        sm.insert("rz".to_string(), self.rotation.z);
    }

    pub fn set_state(&mut self, sm: &StateMap) -> bool {
        self.base.set_state(sm);
        self.fixed_position = self.base.position;
        base::read_float(sm, "rx", &mut self.rotation.x);
        base::read_float(sm, "ry", &mut self.rotation.y);
        base::read_float(sm, "rz", &mut self.rotation.z);
        true
    }
}

#[cfg(test)]
#[path = "dolly_tests.rs"]
mod tests;
