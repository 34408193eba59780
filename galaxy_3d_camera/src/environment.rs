//! Collaborator interfaces of the camera subsystem
//!
//! The camera code never owns terrain, units, windows or clocks. It reads them
//! through the narrow interfaces below, bundled per call into an
//! [`Environment`].

use glam::{Vec2, Vec3};

/// Terrain height service
///
/// All queries are fast, side-effect-free reads against a precomputed height
/// field. Coordinates are world units; the map spans `[0, map_size.x]` on X and
/// `[0, map_size.y]` on Z.
pub trait Terrain {
    /// Ground height at (x, z)
    fn height(&self, x: f32, z: f32) -> f32;

    /// Ground height at (x, z), never below the water plane (y = 0)
    fn height_above_water(&self, x: f32, z: f32) -> f32 {
        self.height(x, z).max(0.0)
    }

    /// Height of the lower resolution smoothed mesh, when one exists
    fn smooth_height(&self, _x: f32, _z: f32) -> Option<f32> {
        None
    }

    /// Distance along the unit `dir` from `origin` to the ground, within
    /// `max_dist`. A value `<= 0` means no hit.
    fn line_ground_intersection(&self, origin: Vec3, dir: Vec3, max_dist: f32) -> f32;

    /// Lowest height of the map
    fn min_height(&self) -> f32;

    /// Map extent in world units (x = width along X, y = depth along Z)
    fn map_size(&self) -> Vec2;
}

/// Source of unit positions for controllers that track a unit
pub trait UnitLocator {
    fn unit_position(&self, unit_id: i32) -> Option<Vec3>;
}

/// Flat map at a constant height
#[derive(Debug, Clone, Copy)]
pub struct FlatTerrain {
    pub size: Vec2,
    pub level: f32,
}

impl FlatTerrain {
    pub fn new(width: f32, depth: f32) -> Self {
        Self { size: Vec2::new(width, depth), level: 0.0 }
    }

    pub fn with_level(mut self, level: f32) -> Self {
        self.level = level;
        self
    }

    fn contains(&self, p: Vec3) -> bool {
        p.x >= 0.0 && p.z >= 0.0 && p.x <= self.size.x && p.z <= self.size.y
    }
}

impl Terrain for FlatTerrain {
    fn height(&self, _x: f32, _z: f32) -> f32 {
        self.level
    }

    fn line_ground_intersection(&self, origin: Vec3, dir: Vec3, max_dist: f32) -> f32 {
        if dir.y == 0.0 {
            return -1.0;
        }

        let dist = (self.level - origin.y) / dir.y;
        if dist <= 0.0 || dist > max_dist {
            return -1.0;
        }
        if !self.contains(origin + dir * dist) {
            return -1.0;
        }

        dist
    }

    fn min_height(&self) -> f32 {
        self.level
    }

    fn map_size(&self) -> Vec2 {
        self.size
    }
}

/// Viewport rectangle in window pixels plus depth range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { x: 0.0, y: 0.0, width, height, min_depth: 0.0, max_depth: 1.0 }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }
}

/// Per-frame facts supplied by the application loop
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    /// Game view rectangle
    pub viewport: Viewport,
    /// Window client size
    pub window_size: Vec2,
    pub fullscreen: bool,
    /// Cursor position in window pixels, origin top-left
    pub mouse_position: Vec2,
    /// Duration of the previous frame
    pub frame_time_ms: f32,
    /// Wall clock
    pub now_ms: f32,
}

impl FrameContext {
    /// Windowed frame with the cursor centered and the view filling the window
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            window_size: Vec2::new(width, height),
            fullscreen: false,
            mouse_position: Vec2::new(width * 0.5, height * 0.5),
            frame_time_ms: 16.0,
            now_ms: 0.0,
        }
    }

    pub fn at_time(mut self, now_ms: f32) -> Self {
        self.now_ms = now_ms;
        self
    }

    pub fn with_mouse(mut self, x: f32, y: f32) -> Self {
        self.mouse_position = Vec2::new(x, y);
        self
    }

    pub fn with_frame_time(mut self, frame_time_ms: f32) -> Self {
        self.frame_time_ms = frame_time_ms;
        self
    }
}

/// Everything a camera call may read from the outside world
#[derive(Clone, Copy)]
pub struct Environment<'a> {
    pub frame: &'a FrameContext,
    pub terrain: &'a dyn Terrain,
    pub units: Option<&'a dyn UnitLocator>,
}

impl<'a> Environment<'a> {
    pub fn new(frame: &'a FrameContext, terrain: &'a dyn Terrain) -> Self {
        Self { frame, terrain, units: None }
    }

    pub fn with_units(mut self, units: &'a dyn UnitLocator) -> Self {
        self.units = Some(units);
        self
    }

    pub fn map_size(&self) -> Vec2 {
        self.terrain.map_size()
    }

    pub fn now_ms(&self) -> f32 {
        self.frame.now_ms
    }
}

#[cfg(test)]
#[path = "environment_tests.rs"]
mod tests;
