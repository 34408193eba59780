//! First-person controller: free look, terrain-following eye height

use std::f32::consts::PI;
use glam::{Vec2, Vec3};
use crate::config::CameraConfig;
use crate::utils;
use super::base::{self, ControllerBase};
use super::{ControllerContext, ControllerMode, StateMap, SwitchSource};

const LOG_SOURCE: &str = "galaxy3d::FirstPersonController";

/// Lowest eye height above the ground
const MIN_GROUND_CLEARANCE: f32 = 5.0;
const MAX_HEIGHT: f32 = 9000.0;

#[derive(Debug, Clone)]
pub struct FirstPersonController {
    pub(crate) base: ControllerBase,
    rotation: Vec3,
    /// Height above ground kept while moving over uneven terrain
    old_height: f32,
    mouse_scale: f32,
    clamp_position: bool,
}

impl FirstPersonController {
    pub fn new(config: &CameraConfig, map_size: Vec2) -> Self {
        let rotation = Vec3::new(2.677, 0.0, 0.0);
        let mut base = ControllerBase::new(map_size);
        base.direction = utils::forward_from_rotation(rotation);

        let mut controller = Self {
            base,
            rotation,
            old_height: 300.0,
            mouse_scale: 0.0,
            clamp_position: true,
        };
        controller.config_update(config);
        controller
    }

    pub fn config_update(&mut self, config: &CameraConfig) {
        self.base.scroll_speed = config.get_int("FPSScrollSpeed") as f32 * 0.1;
        self.base.enabled = config.get_bool("FPSEnabled");
        self.base.fov = config.get_float("FPSFOV");
        self.mouse_scale = config.get_float("FPSMouseScale");
        self.clamp_position = config.get_bool("FPSClampPos");
    }

    pub fn old_height(&self) -> f32 {
        self.old_height
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn key_move(&mut self, mv: Vec3, ctx: &mut ControllerContext) {
        let mv = mv * (mv.z * 400.0);
        let camera = ctx.camera;

        self.base.position +=
            (camera.forward() * mv.y + camera.right() * mv.x) * self.base.scroll_speed;
        self.update(ctx);
    }

    pub fn mouse_move(&mut self, mv: Vec3, ctx: &mut ControllerContext) {
        self.rotation.y += self.mouse_scale * mv.x;
        self.rotation.x =
            (self.rotation.x + self.mouse_scale * mv.y * mv.z).clamp(0.01, PI * 0.99);
        self.base.direction = utils::forward_from_rotation(self.rotation);
        self.update(ctx);
    }

    pub fn screen_edge_move(&mut self, mv: Vec3, ctx: &mut ControllerContext) {
        self.key_move(mv, ctx);
    }

    pub fn mouse_wheel_move(&mut self, delta: f32, ref_dir: Vec3, ctx: &mut ControllerContext) {
        self.base.position += ref_dir * delta;
        self.update(ctx);
    }

    /// Keep the eye inside the map and above the ground
    pub fn update(&mut self, ctx: &mut ControllerContext) {
        if ctx.locked || !self.clamp_position {
            return;
        }

        let terrain = ctx.env.terrain;
        base::clamp_to_map(&mut self.base.position, ctx.map_size());

        let pos = &mut self.base.position;
        let ground = terrain.height_above_water(pos.x, pos.z);
        pos.y = pos.y.clamp(ground + MIN_GROUND_CLEARANCE, MAX_HEIGHT);
        self.old_height = pos.y - ground;
    }

    /// Move to `position`, re-snapped to the remembered height above ground
    pub fn set_position(&mut self, position: Vec3, ctx: &mut ControllerContext) {
        self.base.position = position;

        if !ctx.locked {
            let ground = ctx.env.terrain.height_above_water(position.x, position.z);
            self.base.position.y = ground + self.old_height;
        }

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
            crate::engine_info!(LOG_SOURCE, "Switching to FPS style camera");
        }

        if source.mode == ControllerMode::Overview {
            self.base.position.x = source.position.x;
            self.base.position.z = source.position.z;
            self.update(ctx);
            return;
        }

        self.set_rotation(source.rotation);
        self.base.position = source.position;
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

        let mut rotation = self.rotation;
        let rx = base::read_float(sm, "rx", &mut rotation.x);
        let ry = base::read_float(sm, "ry", &mut rotation.y);
        let rz = base::read_float(sm, "rz", &mut rotation.z);
        if rx || ry || rz {
            self.set_rotation(rotation);
        }

        true
    }
}

#[cfg(test)]
#[path = "first_person_tests.rs"]
mod tests;
