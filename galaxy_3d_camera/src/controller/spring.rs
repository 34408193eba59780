//! Orbit ("spring") controller
//!
//! The camera orbits a ground focus point at `cur_dist`. Keys pan the focus
//! along camera-relative flat axes, the wheel zooms (optionally toward the
//! cursor), and the yaw can snap to cardinal directions.

use std::f32::consts::{FRAC_PI_2, PI};
use glam::{Vec2, Vec3};
use crate::camera::MoveState;
use crate::config::CameraConfig;
use crate::environment::Terrain;
use crate::utils;
use super::base::{self, ControllerBase, GROUND_RAY_LENGTH};
use super::{ControllerContext, ControllerMode, StateMap, SwitchSource};

const LOG_SOURCE: &str = "galaxy3d::SpringController";

const DEFAULT_INCLINATION: f32 = 2.677;
const MIN_INCLINATION: f32 = PI * 0.51;
const MAX_INCLINATION: f32 = PI * 0.99;

/// How the orbit follows the terrain while panning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightTracking {
    /// Eye height frozen; focus and distance re-derived from a ground ray
    Disabled,
    /// Focus sits on the ground, distance unchanged
    Terrain,
    /// Like `Disabled`, with the smoothed-mesh height change folded into the distance
    Smooth,
}

impl HeightTracking {
    pub fn from_config(value: i32) -> Self {
        match value {
            0 => HeightTracking::Disabled,
            2 => HeightTracking::Smooth,
            _ => HeightTracking::Terrain,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpringController {
    /// `position` is the eye
    pub(crate) base: ControllerBase,
    /// Ground point the camera orbits
    focus: Vec3,
    rotation: Vec3,
    cur_dist: f32,
    max_dist: f32,
    min_dist: f32,
    /// Distance to return to after a reset zoom-out
    old_dist: f32,
    zoom_back: bool,
    cursor_zoom_in: bool,
    cursor_zoom_out: bool,
    fast_scale_move: f32,
    fast_scale_wheel: f32,
    edge_rotate: bool,
    lock_cardinal: bool,
    cardinal_lock_width: f32,
    height_tracking: HeightTracking,
    map_size: Vec2,
}

impl SpringController {
    pub fn new(config: &CameraConfig, map_size: Vec2) -> Self {
        let base = ControllerBase::new(map_size);
        let focus = Vec3::new(base.position.x, 0.0, base.position.z);

        let mut controller = Self {
            base,
            focus,
            rotation: Vec3::new(DEFAULT_INCLINATION, 0.0, 0.0),
            cur_dist: Self::overview_distance(map_size),
            max_dist: map_size.max_element() * 1.333,
            min_dist: 20.0,
            old_dist: 0.0,
            zoom_back: false,
            cursor_zoom_in: true,
            cursor_zoom_out: false,
            fast_scale_move: 0.0,
            fast_scale_wheel: 0.0,
            edge_rotate: false,
            lock_cardinal: true,
            cardinal_lock_width: 0.2,
            height_tracking: HeightTracking::Terrain,
            map_size,
        };
        controller.config_update(config);
        controller
    }

    fn overview_distance(map_size: Vec2) -> f32 {
        Vec2::new(map_size.x * 0.5, map_size.y * 0.55).length() * 1.5
    }

    pub fn config_update(&mut self, config: &CameraConfig) {
        self.base.enabled = config.get_bool("CamSpringEnabled");
        self.base.scroll_speed = config.get_float("CamSpringScrollSpeed") * 0.1;
        self.base.fov = config.get_float("CamSpringFOV");
        self.min_dist = config.get_float("CamSpringMinZoomDistance");
        self.cursor_zoom_in = config.get_bool("CamSpringZoomInToMousePos");
        self.cursor_zoom_out = config.get_bool("CamSpringZoomOutFromMousePos");
        self.fast_scale_move = config.get_float("CamSpringFastScaleMouseMove");
        self.fast_scale_wheel = config.get_float("CamSpringFastScaleMousewheelMove");
        self.edge_rotate = config.get_bool("CamSpringEdgeRotate");
        self.lock_cardinal = config.get_bool("CamSpringLockCardinalDirections");
        self.cardinal_lock_width = config.get_float("CamSpringCardinalLockWidth");
        self.height_tracking = HeightTracking::from_config(config.get_int("CamSpringTrackMapHeightMode"));
    }

    pub fn cur_dist(&self) -> f32 {
        self.cur_dist
    }

    pub fn max_dist(&self) -> f32 {
        self.max_dist
    }

    pub fn focus(&self) -> Vec3 {
        self.focus
    }

    pub fn height_tracking(&self) -> HeightTracking {
        self.height_tracking
    }

    /// Azimuth as seen by the camera, after the cardinal lock
    pub fn azimuth(&self) -> f32 {
        if self.lock_cardinal {
            rotation_with_cardinal_lock(self.rotation.y, self.cardinal_lock_width)
        } else {
            self.rotation.y
        }
    }

    pub fn rotation(&self) -> Vec3 {
        Vec3::new(self.rotation.x, self.azimuth(), self.rotation.z)
    }

    /// Eye position: back from the focus along the view direction, kept above ground
    fn eye_position(&self, terrain: &dyn Terrain) -> Vec3 {
        let eye = self.focus - self.base.direction * self.cur_dist;
        let floor = terrain.height_above_water(eye.x, eye.z) + 5.0;
        Vec3::new(eye.x, eye.y.max(floor), eye.z)
    }

    fn move_azimuth(&mut self, amount: f32, ctx: &ControllerContext) {
        let min_rot = (self.rotation.y / FRAC_PI_2).floor() * FRAC_PI_2;
        let max_rot = (self.rotation.y / FRAC_PI_2).ceil() * FRAC_PI_2;

        self.rotation.y -= amount;

        if !self.lock_cardinal && ctx.camera.move_state().contains(MoveState::TILT) {
            self.rotation.y = self.rotation.y.clamp(min_rot + 0.02, max_rot - 0.02);
        }
    }

    // ===== INPUT =====

    pub fn key_move(&mut self, mv: Vec3, ctx: &mut ControllerContext) {
        let mv = mv * mv.z.sqrt();

        if ctx.camera.move_state().contains(MoveState::ROTATE) {
            self.rotation.x = (self.rotation.x + mv.y).clamp(MIN_INCLINATION, MAX_INCLINATION);
            self.move_azimuth(mv.x, ctx);
            self.update(ctx);
            return;
        }

        let prev_focus = self.focus;
        let mv = mv * 200.0;
        let flat_forward = (self.base.direction * Vec3::new(1.0, 0.0, 1.0)).normalize_or_zero();
        let step = self.base.pixel_size * 2.0 * self.base.scroll_speed;

        self.focus += (ctx.camera.right() * mv.x + flat_forward * mv.y) * step;

        match self.height_tracking {
            HeightTracking::Terrain => {}
            HeightTracking::Disabled | HeightTracking::Smooth => self.track_height(prev_focus, ctx),
        }

        self.update(ctx);
    }

    pub fn mouse_move(&mut self, mv: Vec3, ctx: &mut ControllerContext) {
        let fast = ctx.camera.move_state().axis(MoveState::FAST);
        let scale = 0.005 * (1.0 + fast * ctx.camera.move_fast_mult() * self.fast_scale_move);

        let scaled = Vec3::new(mv.x * mv.z * scale, -(mv.y * mv.z * scale), 1.0);
        self.key_move(scaled, ctx);
    }

    pub fn screen_edge_move(&mut self, mut mv: Vec3, ctx: &mut ControllerContext) {
        let view_height = ctx.env.frame.viewport.height;
        let mouse_y = ctx.env.frame.mouse_position.y;
        let in_rotate_band = mouse_y > view_height / 10.0 && mouse_y < view_height / 3.0;

        if self.edge_rotate && in_rotate_band {
            let fast = ctx.camera.move_state().axis(MoveState::FAST);
            mv *= 1.0 + fast * ctx.camera.move_fast_mult() * self.fast_scale_move;
            self.move_azimuth(mv.x * 0.75, ctx);
            mv.x = 0.0;
        }

        self.key_move(mv, ctx);
    }

    /// Negative `delta` zooms in, positive zooms out. Tilts instead while the
    /// tilt key is held.
    pub fn mouse_wheel_move(&mut self, delta: f32, ref_dir: Vec3, ctx: &mut ControllerContext) {
        let state = ctx.camera.move_state();
        let shift_speed = if state.contains(MoveState::FAST) {
            ctx.camera.move_fast_mult() * self.fast_scale_wheel
        } else {
            1.0
        };
        let scaled_move = 1.0 + delta * shift_speed * 0.007;
        let dist_before = self.cur_dist;

        if state.contains(MoveState::TILT) {
            self.rotation.x -= delta * shift_speed * 0.005;
        } else {
            let eye = self.eye_position(ctx.env.terrain);

            self.cur_dist = (self.cur_dist * scaled_move).clamp(self.min_dist, self.max_dist);

            let seconds = if delta < 0.0 {
                self.zoom_in(eye, ref_dir, dist_before, scaled_move, ctx)
            } else {
                self.zoom_out(eye, ref_dir, dist_before, scaled_move, ctx)
            };
            ctx.request_transition(seconds);
        }

        self.update(ctx);
    }

    /// Move toward the cursor's ground point. Returns the transition time.
    fn zoom_in(
        &mut self,
        eye: Vec3,
        ref_dir: Vec3,
        dist_before: f32,
        scaled_move: f32,
        ctx: &ControllerContext,
    ) -> f32 {
        if ctx.camera.move_state().contains(MoveState::RESET) && self.zoom_back {
            self.cur_dist = self.old_dist;
            self.zoom_back = false;
            return 0.5;
        }

        if !self.cursor_zoom_in {
            return 0.25;
        }

        let terrain = ctx.env.terrain;
        let ground_dist = base::distance_to_ground(terrain, eye, ref_dir, self.focus.y);
        if ground_dist <= 0.0 {
            return 0.25;
        }

        // never past the cursor point, never closer than min_dist
        let cursor_vec = ref_dir * ground_dist;
        let zoom_amount = (1.0 - scaled_move).min((dist_before - self.min_dist) / dist_before);
        let wanted = eye + cursor_vec * zoom_amount;

        self.cur_dist = base::distance_to_ground(terrain, wanted, self.base.direction, self.focus.y);
        self.focus = wanted + self.base.direction * self.cur_dist;
        0.25
    }

    /// Move away from the map (or from the cursor point). Returns the
    /// transition time.
    fn zoom_out(
        &mut self,
        eye: Vec3,
        ref_dir: Vec3,
        dist_before: f32,
        scaled_move: f32,
        ctx: &ControllerContext,
    ) -> f32 {
        if ctx.camera.move_state().contains(MoveState::RESET) {
            if !self.zoom_back {
                self.old_dist = dist_before;
                self.zoom_back = true;
            }

            let map = ctx.map_size();
            self.rotation = Vec3::new(DEFAULT_INCLINATION, self.rotation.y, 0.0);
            self.focus.x = map.x * 0.5;
            self.focus.z = map.y * 0.55;
            self.cur_dist = Self::overview_distance(map);
            return 1.0;
        }

        self.zoom_back = false;

        if !self.cursor_zoom_out {
            return 0.25;
        }

        let terrain = ctx.env.terrain;
        let ground_dist = base::distance_to_ground(terrain, eye, ref_dir, self.focus.y);
        if ground_dist <= 0.0 {
            return 0.25;
        }

        let cursor_vec = ref_dir * ground_dist;
        let extrapolate = |scale: f32| {
            let wanted = eye + cursor_vec * (1.0 - scaled_move) * scale;
            let dist = base::distance_to_ground(terrain, wanted, self.base.direction, self.focus.y);
            (wanted, dist)
        };

        // stay under max_dist so the zoom is not trimmed mid-transition
        let (mut wanted, mut new_dist) = extrapolate(1.0);
        if new_dist > self.max_dist {
            (wanted, new_dist) = extrapolate(0.5);
        }

        if new_dist > self.max_dist {
            self.cur_dist = dist_before;
            return 0.25;
        }

        if new_dist > 0.0 {
            self.cur_dist = new_dist;
            self.focus = wanted + self.base.direction * new_dist;
        }

        0.25
    }

    /// Re-derive focus and distance from the eye after a pan
    fn track_height(&mut self, prev_focus: Vec3, ctx: &ControllerContext) {
        let map = ctx.map_size();
        if !base::in_map(self.focus, map) {
            return;
        }

        let terrain = ctx.env.terrain;
        let mut eye = self.focus - self.base.direction * self.cur_dist;
        eye.y = eye.y.max(terrain.height(eye.x, eye.z) + 5.0);

        let dist = terrain.line_ground_intersection(eye, self.base.direction, GROUND_RAY_LENGTH);
        let ground = eye + self.base.direction * dist;
        if dist <= 0.0 || !base::in_map(ground, map) {
            return;
        }

        let height_diff = match self.height_tracking {
            HeightTracking::Smooth => {
                let now = self.focus;
                match (terrain.smooth_height(now.x, now.z), terrain.smooth_height(prev_focus.x, prev_focus.z)) {
                    (Some(a), Some(b)) => a - b,
                    _ => 0.0,
                }
            }
            _ => 0.0,
        };

        self.focus = ground;
        self.cur_dist = dist + height_diff;
    }

    /// Focus on the ground, clamp angles and distance, refresh the eye
    pub fn update(&mut self, ctx: &mut ControllerContext) {
        let terrain = ctx.env.terrain;
        self.map_size = ctx.map_size();

        base::clamp_to_map(&mut self.focus, self.map_size);
        self.focus.y = terrain.height(self.focus.x, self.focus.z);
        self.rotation.x = self.rotation.x.clamp(MIN_INCLINATION, MAX_INCLINATION);

        self.base.direction = utils::forward_from_rotation(self.rotation());

        self.cur_dist = self.cur_dist.clamp(self.min_dist, self.max_dist);
        self.base.pixel_size = ctx.pixel_scale() * self.cur_dist * 2.0;
        self.base.position = self.eye_position(terrain);
    }

    // ===== POSE =====

    /// Moves the focus point
    pub fn set_position(&mut self, position: Vec3, ctx: &mut ControllerContext) {
        self.focus = position;
        self.update(ctx);
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        self.base.direction = utils::forward_from_rotation(self.rotation());
    }

    pub fn set_direction(&mut self, direction: Vec3) {
        let rotation = utils::rotation_from_direction(direction);
        self.set_rotation(Vec3::new(rotation.x, rotation.y, self.rotation.z));
    }

    // ===== HANDOFF =====

    pub fn switch_from(&self) -> Vec3 {
        self.focus
    }

    pub fn switch_to(&mut self, source: &SwitchSource, announce: bool, ctx: &mut ControllerContext) {
        if announce {
            crate::engine_info!(LOG_SOURCE, "Switching to Spring style camera");
        }

        if source.mode == ControllerMode::Overview {
            self.focus = source.position;
            self.rotation = utils::clamp_rad_principal_vec(self.rotation);
            self.update(ctx);
            return;
        }

        self.rotation = source.rotation;
        // looking above the horizon: bring it back down
        if self.rotation.x <= FRAC_PI_2 {
            self.rotation.x = PI * 0.75;
        }

        self.base.direction = utils::forward_from_rotation(self.rotation);
        self.cur_dist = base::distance_to_ground(ctx.env.terrain, source.eye, self.base.direction, 0.0);
        self.focus = source.eye + self.base.direction * self.cur_dist;
        self.update(ctx);
    }

    // ===== STATE =====

    /// px/py/pz hold the focus, not the eye
    pub fn get_state(&self, sm: &mut StateMap) {
        self.base.get_state_around(self.focus, sm);
        sm.insert("dist".to_string(), self.cur_dist);
        sm.insert("rx".to_string(), self.rotation.x);
        sm.insert("ry".to_string(), self.rotation.y);
        sm.insert("rz".to_string(), self.rotation.z);
    }

    pub fn set_state(&mut self, sm: &StateMap) -> bool {
        let mut focus = self.focus;
        self.base.set_state_around(&mut focus, sm);
        self.focus = focus;

        base::read_float(sm, "dist", &mut self.cur_dist);
        base::read_float(sm, "rx", &mut self.rotation.x);
        base::read_float(sm, "ry", &mut self.rotation.y);
        base::read_float(sm, "rz", &mut self.rotation.z);

        self.base.direction = utils::forward_from_rotation(self.rotation());
        self.base.position = self.focus - self.base.direction * self.cur_dist;
        true
    }
}

/// Snap `rot` to the nearest multiple of π/2 when within `width / 2`
/// quarter-turns of it; in between, stretch linearly so the result stays
/// continuous.
pub(crate) fn rotation_with_cardinal_lock(rot: f32, width: f32) -> f32 {
    let quarters = rot / FRAC_PI_2;
    let moved = quarters.abs() + width * 0.5;
    let whole = moved.trunc();
    let fract = moved - whole;

    let b = 1.0 / (1.0 - width);
    let c = 1.0 - b;
    let fx = if fract > width { fract * b + c } else { 0.0 };

    (whole + fx).copysign(quarters) * FRAC_PI_2
}

#[cfg(test)]
#[path = "spring_tests.rs"]
mod tests;
