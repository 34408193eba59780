/// Pose and settings shared by every controller, plus the state-map helpers.

use glam::{Vec2, Vec3};
use crate::environment::Terrain;
use crate::utils;
use super::StateMap;

/// Ray length used for ground queries
pub(crate) const GROUND_RAY_LENGTH: f32 = 150_000.0;

#[derive(Debug, Clone)]
pub struct ControllerBase {
    /// Eye position for free cameras, focus point for orbiting ones
    pub position: Vec3,
    pub direction: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub scroll_speed: f32,
    /// World size of one pixel at the focus distance, times two
    pub pixel_size: f32,
    /// Selectable through mode toggling
    pub enabled: bool,
}

impl ControllerBase {
    /// Centered above the map, facing +Z
    pub fn new(map_size: Vec2) -> Self {
        Self {
            position: Vec3::new(map_size.x * 0.5, 1000.0, map_size.y * 0.5),
            direction: Vec3::Z,
            fov: 45.0,
            scroll_speed: 1.0,
            pixel_size: 1.0,
            enabled: true,
        }
    }

    pub fn rotation(&self) -> Vec3 {
        utils::rotation_from_direction(self.direction)
    }

    pub fn get_state(&self, sm: &mut StateMap) {
        self.get_state_around(self.position, sm);
    }

    /// Base state with `position` written as px/py/pz. Orbiting controllers
    /// store their focus there.
    pub fn get_state_around(&self, position: Vec3, sm: &mut StateMap) {
        sm.insert("fov".to_string(), self.fov);

        sm.insert("px".to_string(), position.x);
        sm.insert("py".to_string(), position.y);
        sm.insert("pz".to_string(), position.z);

        sm.insert("dx".to_string(), self.direction.x);
        sm.insert("dy".to_string(), self.direction.y);
        sm.insert("dz".to_string(), self.direction.z);
    }

    pub fn set_state(&mut self, sm: &StateMap) -> bool {
        let mut position = self.position;
        let result = self.set_state_around(&mut position, sm);
        self.position = position;
        result
    }

    /// Read px/py/pz into `position` instead of the eye; missing keys keep
    /// their current value
    pub fn set_state_around(&mut self, position: &mut Vec3, sm: &StateMap) -> bool {
        read_float(sm, "fov", &mut self.fov);

        read_float(sm, "px", &mut position.x);
        read_float(sm, "py", &mut position.y);
        read_float(sm, "pz", &mut position.z);

        read_float(sm, "dx", &mut self.direction.x);
        read_float(sm, "dy", &mut self.direction.y);
        read_float(sm, "dz", &mut self.direction.z);

        true
    }
}

/// Copy `sm[name]` into `var` when present
pub(crate) fn read_float(sm: &StateMap, name: &str, var: &mut f32) -> bool {
    match sm.get(name) {
        Some(value) => {
            *var = *value;
            true
        }
        None => false,
    }
}

/// Copy `sm[name] > 0` into `var` when present
pub(crate) fn read_bool(sm: &StateMap, name: &str, var: &mut bool) -> bool {
    match sm.get(name) {
        Some(value) => {
            *var = *value > 0.0;
            true
        }
        None => false,
    }
}

pub(crate) fn write_bool(sm: &mut StateMap, name: &str, value: bool) {
    sm.insert(name.to_string(), if value { 1.0 } else { 0.0 });
}

/// Ground distance along `dir`. Rays that miss the map fall back to the
/// horizontal plane at `fallback_height`; `<= 0` when both miss.
pub(crate) fn distance_to_ground(
    terrain: &dyn Terrain,
    from: Vec3,
    dir: Vec3,
    fallback_height: f32,
) -> f32 {
    let dist = terrain.line_ground_intersection(from, dir, GROUND_RAY_LENGTH);
    if dist > 0.0 {
        return dist;
    }

    utils::line_plane_distance(from, dir, fallback_height, GROUND_RAY_LENGTH)
}

/// Clamp x/z into the map with a small margin
pub(crate) fn clamp_to_map(position: &mut Vec3, map_size: Vec2) {
    position.x = position.x.clamp(0.01, map_size.x - 0.01);
    position.z = position.z.clamp(0.01, map_size.y - 0.01);
}

pub(crate) fn in_map(position: Vec3, map_size: Vec2) -> bool {
    position.x >= 0.0 && position.z >= 0.0 && position.x <= map_size.x && position.z <= map_size.y
}
