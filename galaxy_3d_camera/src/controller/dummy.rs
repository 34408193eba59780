/// Inert controller used while the handler initializes or shuts down.
/// Never selectable; every input is ignored.

use glam::{Vec2, Vec3};
use crate::config::CameraConfig;
use super::base::ControllerBase;
use super::{ControllerContext, StateMap, SwitchSource};

#[derive(Debug, Clone)]
pub struct DummyController {
    pub(crate) base: ControllerBase,
}

impl DummyController {
    pub fn new(map_size: Vec2) -> Self {
        let mut base = ControllerBase::new(map_size);
        base.enabled = false;
        Self { base }
    }

    pub fn config_update(&mut self, _config: &CameraConfig) {}

    pub fn rotation(&self) -> Vec3 {
        self.base.rotation()
    }

    pub fn key_move(&mut self, _mv: Vec3, _ctx: &mut ControllerContext) {}

    pub fn mouse_move(&mut self, _mv: Vec3, _ctx: &mut ControllerContext) {}

    pub fn screen_edge_move(&mut self, _mv: Vec3, _ctx: &mut ControllerContext) {}

    pub fn mouse_wheel_move(&mut self, _delta: f32, _ref_dir: Vec3, _ctx: &mut ControllerContext) {}

    pub fn update(&mut self, _ctx: &mut ControllerContext) {}

    pub fn set_position(&mut self, position: Vec3, _ctx: &mut ControllerContext) {
        self.base.position = position;
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.base.direction = crate::utils::forward_from_rotation(rotation);
    }

    pub fn set_direction(&mut self, direction: Vec3) {
        self.base.direction = direction;
    }

    pub fn switch_from(&self) -> Vec3 {
        self.base.position
    }

    pub fn switch_to(&mut self, source: &SwitchSource, _announce: bool, _ctx: &mut ControllerContext) {
        self.base.position = source.position;
        self.base.direction = crate::utils::forward_from_rotation(source.rotation);
    }

    pub fn get_state(&self, sm: &mut StateMap) {
        self.base.get_state(sm);
    }

    pub fn set_state(&mut self, sm: &StateMap) -> bool {
        self.base.set_state(sm)
    }
}
