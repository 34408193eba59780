//! Whole-map overview controller
//!
//! The eye sits above the map center, high enough for the map to fill the
//! view, looking almost straight down. Input is ignored; leaving the mode
//! hands the cursor's ground point to the next controller.

use glam::{Vec2, Vec3};
use crate::config::CameraConfig;
use super::base::{self, ControllerBase};
use super::{ControllerContext, StateMap, SwitchSource};

const LOG_SOURCE: &str = "galaxy3d::OverviewController";

/// Near-vertical view; a pure -Y direction has no azimuth
const VIEW_DIRECTION: Vec3 = Vec3::new(0.0, -1.0, -0.001);

#[derive(Debug, Clone)]
pub struct OverviewController {
    pub(crate) base: ControllerBase,
    /// Ground point under the cursor at the last update
    cursor_target: Vec3,
}

impl OverviewController {
    pub fn new(config: &CameraConfig, map_size: Vec2) -> Self {
        let mut base = ControllerBase::new(map_size);
        base.direction = VIEW_DIRECTION.normalize();

        let mut controller = Self {
            cursor_target: Vec3::new(map_size.x * 0.5, 0.0, map_size.y * 0.5),
            base,
        };
        controller.config_update(config);
        controller
    }

    pub fn config_update(&mut self, config: &CameraConfig) {
        self.base.enabled = config.get_bool("OverviewEnabled");
        self.base.fov = config.get_float("OverviewFOV");
    }

    pub fn rotation(&self) -> Vec3 {
        self.base.rotation()
    }

    pub fn cursor_target(&self) -> Vec3 {
        self.cursor_target
    }

    pub fn key_move(&mut self, _mv: Vec3, _ctx: &mut ControllerContext) {}

    pub fn mouse_move(&mut self, _mv: Vec3, _ctx: &mut ControllerContext) {}

    pub fn screen_edge_move(&mut self, _mv: Vec3, _ctx: &mut ControllerContext) {}

    pub fn mouse_wheel_move(&mut self, _delta: f32, _ref_dir: Vec3, _ctx: &mut ControllerContext) {}

    pub fn update(&mut self, ctx: &mut ControllerContext) {
        let terrain = ctx.env.terrain;
        let center = ctx.map_size() * 0.5;
        let aspect = ctx.env.frame.viewport.aspect_ratio();
        let ground = terrain.height_above_water(center.x, center.y);

        self.base.direction = VIEW_DIRECTION.normalize();
        self.base.position = Vec3::new(
            center.x,
            ground + 2.5 * (center.x / aspect).max(center.y),
            center.y,
        );

        let hit = base::distance_to_ground(terrain, self.base.position, ctx.cursor_dir, ground);
        self.cursor_target = if hit > 0.0 {
            self.base.position + ctx.cursor_dir * hit
        } else {
            Vec3::new(center.x, ground, center.y)
        };
    }

    pub fn set_position(&mut self, _position: Vec3, _ctx: &mut ControllerContext) {}

    pub fn set_rotation(&mut self, _rotation: Vec3) {}

    pub fn set_direction(&mut self, _direction: Vec3) {}

    pub fn switch_from(&self) -> Vec3 {
        self.cursor_target
    }

    pub fn switch_to(&mut self, _source: &SwitchSource, announce: bool, ctx: &mut ControllerContext) {
        if announce {
            crate::engine_info!(LOG_SOURCE, "Switching to Overview style camera");
        }
        self.update(ctx);
    }

    pub fn get_state(&self, sm: &mut StateMap) {
        self.base.get_state(sm);
    }

    pub fn set_state(&mut self, sm: &StateMap) -> bool {
        base::read_float(sm, "fov", &mut self.base.fov);
        true
    }
}

#[cfg(test)]
#[path = "overview_tests.rs"]
mod tests;
