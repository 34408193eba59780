//! Rotatable overhead controller: free pitch and yaw at a height above ground

use std::f32::consts::PI;
use glam::{Vec2, Vec3};
use crate::config::CameraConfig;
use crate::utils;
use super::base::{self, ControllerBase};
use super::{ControllerContext, ControllerMode, StateMap, SwitchSource};

const LOG_SOURCE: &str = "galaxy3d::RotOverheadController";

const MIN_INCLINATION: f32 = PI * 0.4999;
const MAX_INCLINATION: f32 = PI * 0.9999;
const MAX_HEIGHT: f32 = 9000.0;

#[derive(Debug, Clone)]
pub struct RotOverheadController {
    pub(crate) base: ControllerBase,
    rotation: Vec3,
    old_height: f32,
    mouse_scale: f32,
    /// When off, the eye may leave the map by one map size on each side
    clamp_to_map: bool,
}

impl RotOverheadController {
    pub fn new(config: &CameraConfig, map_size: Vec2) -> Self {
        let rotation = Vec3::new(2.677, 0.0, 0.0);
        let mut base = ControllerBase::new(map_size);
        base.direction = utils::forward_from_rotation(rotation);

        let mut controller = Self {
            base,
            rotation,
            old_height: 500.0,
            mouse_scale: 0.0,
            clamp_to_map: true,
        };
        controller.config_update(config);
        controller
    }

    pub fn config_update(&mut self, config: &CameraConfig) {
        self.mouse_scale = config.get_float("RotOverheadMouseScale");
        self.base.scroll_speed = config.get_int("RotOverheadScrollSpeed") as f32 * 0.1;
        self.base.enabled = config.get_bool("RotOverheadEnabled");
        self.base.fov = config.get_float("RotOverheadFOV");
        self.clamp_to_map = config.get_bool("RotOverheadClampMap");
    }

    pub fn old_height(&self) -> f32 {
        self.old_height
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn key_move(&mut self, mv: Vec3, ctx: &mut ControllerContext) {
        let mv = mv * (mv.z.sqrt() * 400.0);
        let camera = ctx.camera;

        // straight down: forward has no horizontal part, borrow it from up
        let mut flat_forward = camera.forward();
        if flat_forward.y < -0.9 {
            flat_forward += camera.up();
        }
        flat_forward.y = 0.0;
        let flat_forward = flat_forward.normalize_or_zero();

        self.base.position += (flat_forward * mv.y + camera.right() * mv.x) * self.base.scroll_speed;
        self.update(ctx);
    }

    pub fn mouse_move(&mut self, mv: Vec3, ctx: &mut ControllerContext) {
        self.rotation.x = (self.rotation.x + self.mouse_scale * mv.y * mv.z)
            .clamp(MIN_INCLINATION, MAX_INCLINATION);
        self.rotation.y += self.mouse_scale * mv.x;
        self.base.direction = utils::forward_from_rotation(self.rotation);
        self.update(ctx);
    }

    pub fn screen_edge_move(&mut self, mv: Vec3, ctx: &mut ControllerContext) {
        self.key_move(mv, ctx);
    }

    /// Scale the height above ground
    pub fn mouse_wheel_move(&mut self, delta: f32, _ref_dir: Vec3, ctx: &mut ControllerContext) {
        let pos = self.base.position;
        let ground = ctx.env.terrain.height_above_water(pos.x, pos.z);
        let height = (pos.y - ground) * (1.0 + delta * self.mouse_scale);

        self.base.position.y = ground + height;
        self.update(ctx);
    }

    pub fn update(&mut self, ctx: &mut ControllerContext) {
        let map = ctx.map_size();
        let pos = &mut self.base.position;

        if self.clamp_to_map {
            base::clamp_to_map(pos, map);
        } else {
            pos.x = pos.x.clamp(-map.x, 2.0 * map.x - 0.01);
            pos.z = pos.z.clamp(-map.y, 2.0 * map.y - 0.01);
        }

        let ground = ctx.env.terrain.height_above_water(pos.x, pos.z);
        pos.y = pos.y.clamp(ground + 5.0, MAX_HEIGHT);
        self.old_height = pos.y - ground;
    }

    pub fn set_position(&mut self, position: Vec3, ctx: &mut ControllerContext) {
        let ground = ctx.env.terrain.height_above_water(position.x, position.z);
        self.base.position = Vec3::new(position.x, ground + self.old_height, position.z);
        self.update(ctx);
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
            crate::engine_info!(LOG_SOURCE, "Switching to Rotatable overhead camera");
        }

        if source.mode == ControllerMode::Overview {
            self.base.position.x = source.position.x;
            self.base.position.z = source.position.z;
            self.update(ctx);
            return;
        }

        self.base.position = source.position;
        self.set_rotation(source.rotation);
    }

    pub fn get_state(&self, sm: &mut StateMap) {
        self.base.get_state(sm);
        sm.insert("oldHeight".to_string(), self.old_height);
        sm.insert("rx".to_string(), self.rotation.x);
        sm.insert("ry".to_string(), self.rotation.y);
        sm.insert("rz".to_string(), self.rotation.z);
    }

    pub fn set_state(&mut self, sm: &StateMap) -> bool {
        self.base.set_state(sm);
        base::read_float(sm, "oldHeight", &mut self.old_height);
        base::read_float(sm, "rx", &mut self.rotation.x);
        base::read_float(sm, "ry", &mut self.rotation.y);
        base::read_float(sm, "rz", &mut self.rotation.z);
        true
    }
}

#[cfg(test)]
#[path = "rot_overhead_tests.rs"]
mod tests;
