//! Tactical overhead controller
//!
//! Looks at a ground focus point from a fixed tilt. The "flipped" bit turns
//! the view around so south is up.

use std::f32::consts::{FRAC_PI_2, PI};
use glam::{Vec2, Vec3};
use crate::camera::MoveState;
use crate::config::CameraConfig;
use super::base::{self, ControllerBase};
use super::{ControllerContext, ControllerMode, StateMap, SwitchSource};

const LOG_SOURCE: &str = "galaxy3d::OverheadController";

const DEFAULT_ANGLE: f32 = 0.464;
const MIN_HEIGHT: f32 = 10.0;
const MIN_ANGLE: f32 = 0.01;
const MAX_ANGLE: f32 = FRAC_PI_2 * 0.99;

#[derive(Debug, Clone)]
pub struct OverheadController {
    pub(crate) base: ControllerBase,
    focus: Vec3,
    height: f32,
    /// Tilt away from straight down, in radians
    angle: f32,
    flipped: bool,
    max_height: f32,
    tilt_speed: f32,
    map_size: Vec2,
}

impl OverheadController {
    pub fn new(config: &CameraConfig, map_size: Vec2) -> Self {
        let base = ControllerBase::new(map_size);
        let focus = Vec3::new(base.position.x, 0.0, base.position.z);

        let mut controller = Self {
            base,
            focus,
            height: 500.0,
            angle: DEFAULT_ANGLE,
            flipped: false,
            max_height: 0.0,
            tilt_speed: 0.0,
            map_size,
        };
        controller.config_update(config);
        controller.refresh_pose();
        controller
    }

    pub fn config_update(&mut self, config: &CameraConfig) {
        self.base.scroll_speed = config.get_int("OverheadScrollSpeed") as f32 * 0.1;
        self.base.enabled = config.get_bool("OverheadEnabled");
        self.base.fov = config.get_float("OverheadFOV");
        self.tilt_speed = config.get_float("OverheadTiltSpeed");
        self.max_height = self.map_size.max_element()
            * 1.25
            * config.get_float("OverheadMaxHeightFactor");
    }

    pub fn focus(&self) -> Vec3 {
        self.focus
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn flipped(&self) -> bool {
        self.flipped
    }

    pub fn set_flipped(&mut self, flipped: bool) {
        self.flipped = flipped;
        self.refresh_pose();
    }

    fn flip_sign(&self) -> f32 {
        if self.flipped { -1.0 } else { 1.0 }
    }

    pub fn rotation(&self) -> Vec3 {
        self.base.rotation()
    }

    pub fn key_move(&mut self, mv: Vec3, ctx: &mut ControllerContext) {
        let mv = mv * (mv.z.sqrt() * 200.0);
        let step = self.base.pixel_size * 2.0 * self.base.scroll_speed * self.flip_sign();

        self.focus.x += mv.x * step;
        self.focus.z -= mv.y * step;
        self.update(ctx);
    }

    pub fn mouse_move(&mut self, mv: Vec3, ctx: &mut ControllerContext) {
        let fast = ctx.camera.move_state().contains(MoveState::FAST);
        let speed = if fast { ctx.camera.move_fast_mult() } else { 1.0 };
        let step = self.base.pixel_size * speed * self.base.scroll_speed * self.flip_sign();

        self.focus.x += mv.x * mv.z * step;
        self.focus.z += mv.y * mv.z * step;
        self.update(ctx);
    }

    pub fn screen_edge_move(&mut self, mv: Vec3, ctx: &mut ControllerContext) {
        self.key_move(mv, ctx);
    }

    /// Zoom by scaling the height, or tilt while the tilt key is held
    pub fn mouse_wheel_move(&mut self, delta: f32, _ref_dir: Vec3, ctx: &mut ControllerContext) {
        let state = ctx.camera.move_state();
        let speed = if state.contains(MoveState::FAST) { ctx.camera.move_fast_mult() } else { 1.0 };

        if state.contains(MoveState::TILT) {
            self.angle = (self.angle + delta * self.tilt_speed * speed * 0.001)
                .clamp(MIN_ANGLE, MAX_ANGLE);
        } else {
            self.height *= 1.0 + delta * speed * 0.007;
            ctx.request_transition(0.25);
        }

        self.update(ctx);
    }

    pub fn update(&mut self, ctx: &mut ControllerContext) {
        self.map_size = ctx.map_size();
        base::clamp_to_map(&mut self.focus, self.map_size);
        self.focus.y = ctx.env.terrain.height_above_water(self.focus.x, self.focus.z);
        self.height = self.height.clamp(MIN_HEIGHT, self.max_height.max(MIN_HEIGHT));
        self.base.pixel_size = ctx.pixel_scale() * self.height * 2.0;
        self.refresh_pose();
    }

    fn refresh_pose(&mut self) {
        let (sin, cos) = self.angle.sin_cos();
        self.base.direction = Vec3::new(0.0, -cos, -sin * self.flip_sign());
        self.base.position = self.focus - self.base.direction * self.height;
    }

    pub fn set_position(&mut self, position: Vec3, ctx: &mut ControllerContext) {
        self.focus.x = position.x;
        self.focus.z = position.z;
        self.update(ctx);
    }

    /// Tilt from the inclination, flip from the azimuth
    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.angle = (PI - rotation.x).clamp(MIN_ANGLE, MAX_ANGLE);
        self.flipped = rotation.y.cos() < 0.0;
        self.refresh_pose();
    }

    pub fn set_direction(&mut self, direction: Vec3) {
        self.set_rotation(crate::utils::rotation_from_direction(direction));
    }

    pub fn switch_from(&self) -> Vec3 {
        self.focus
    }

    pub fn switch_to(&mut self, source: &SwitchSource, announce: bool, ctx: &mut ControllerContext) {
        if announce {
            crate::engine_info!(LOG_SOURCE, "Switching to Overhead (TA) style camera");
        }

        self.focus.x = source.position.x;
        self.focus.z = source.position.z;

        if source.mode != ControllerMode::Overview {
            let ground = ctx.env.terrain.height_above_water(source.position.x, source.position.z);
            self.height = source.eye.y - ground;
        }

        self.update(ctx);
    }

    /// px/py/pz hold the focus, not the eye
    pub fn get_state(&self, sm: &mut StateMap) {
        self.base.get_state_around(self.focus, sm);
        sm.insert("height".to_string(), self.height);
        sm.insert("angle".to_string(), self.angle);
        base::write_bool(sm, "flipped", self.flipped);
    }

    pub fn set_state(&mut self, sm: &StateMap) -> bool {
        let mut focus = self.focus;
        self.base.set_state_around(&mut focus, sm);
        self.focus = focus;

        base::read_float(sm, "height", &mut self.height);
        base::read_float(sm, "angle", &mut self.angle);
        base::read_bool(sm, "flipped", &mut self.flipped);
        self.angle = self.angle.clamp(MIN_ANGLE, MAX_ANGLE);

        self.refresh_pose();
        true
    }
}

#[cfg(test)]
#[path = "overhead_tests.rs"]
mod tests;
