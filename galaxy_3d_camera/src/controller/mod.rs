//! Camera controllers
//!
//! Each [`ControllerMode`] has one controller instance, created with the
//! handler and kept while inactive so re-selecting a mode resumes its last
//! pose. [`CameraController`] is a closed enum over the modes; every call
//! dispatches with a `match`.

mod base;
mod dolly;
mod dummy;
mod first_person;
mod overhead;
mod overview;
mod rot_overhead;
mod spring;

pub use base::ControllerBase;
pub use dolly::{DollyController, DollyLookMode, DollyPositionMode};
pub use dummy::DummyController;
pub use first_person::FirstPersonController;
pub use overhead::OverheadController;
pub use overview::OverviewController;
pub use rot_overhead::RotOverheadController;
pub use spring::{HeightTracking, SpringController};

use glam::{Vec2, Vec3};
use rustc_hash::FxHashMap;
use crate::camera::Camera;
use crate::config::CameraConfig;
use crate::environment::Environment;
use crate::error::{Error, Result};

/// Named scalar fields of a controller, used by saved views and scripting
pub type StateMap = FxHashMap<String, f32>;

/// Camera control strategies, in configuration index order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerMode {
    FirstPerson,
    Overhead,
    Spring,
    RotOverhead,
    Overview,
    Dolly,
    /// Inert sentinel used during init and shutdown
    Dummy,
}

impl ControllerMode {
    pub const COUNT: usize = 7;

    pub const ALL: [ControllerMode; Self::COUNT] = [
        ControllerMode::FirstPerson,
        ControllerMode::Overhead,
        ControllerMode::Spring,
        ControllerMode::RotOverhead,
        ControllerMode::Overview,
        ControllerMode::Dolly,
        ControllerMode::Dummy,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Short name used by actions and saved configuration
    pub fn name(self) -> &'static str {
        match self {
            ControllerMode::FirstPerson => "fps",
            ControllerMode::Overhead => "ta",
            ControllerMode::Spring => "spring",
            ControllerMode::RotOverhead => "rot",
            ControllerMode::Overview => "ov",
            ControllerMode::Dolly => "dolly",
            ControllerMode::Dummy => "dummy",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|mode| mode.name() == name)
            .ok_or_else(|| Error::UnknownCameraMode(name.to_string()))
    }
}

/// Everything a controller may read during one call
pub struct ControllerContext<'a> {
    /// Live camera (basis vectors, move state, field of view)
    pub camera: &'a Camera,
    pub env: Environment<'a>,
    /// Unit world ray through the cursor
    pub cursor_dir: Vec3,
    /// External lock (e.g. unit control); position clamps are skipped
    pub locked: bool,
    transition: Option<f32>,
}

impl<'a> ControllerContext<'a> {
    pub fn new(camera: &'a Camera, env: Environment<'a>, locked: bool) -> Self {
        let mouse = env.frame.mouse_position;
        Self {
            camera,
            env,
            cursor_dir: camera.calc_pixel_dir(mouse.x, mouse.y),
            locked,
            transition: None,
        }
    }

    /// Ask the handler to blend from the live camera pose to the controller's
    /// new pose over `seconds`. The last request of a call wins.
    pub fn request_transition(&mut self, seconds: f32) {
        self.transition = Some(seconds);
    }

    /// Pending transition request, clearing it
    pub fn take_transition(&mut self) -> Option<f32> {
        self.transition.take()
    }

    pub fn map_size(&self) -> Vec2 {
        self.env.map_size()
    }

    /// Height of one pixel at unit distance, times two
    pub(crate) fn pixel_scale(&self) -> f32 {
        self.camera.tan_half_fov() * 2.0 / self.env.frame.viewport.height
    }
}

/// Handoff data from the outgoing controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwitchSource {
    pub mode: ControllerMode,
    /// Result of the outgoing controller's `switch_from`
    pub position: Vec3,
    pub rotation: Vec3,
    /// Eye of the outgoing controller
    pub eye: Vec3,
}

/// Closed set of camera controllers
#[derive(Debug, Clone)]
pub enum CameraController {
    FirstPerson(FirstPersonController),
    Overhead(OverheadController),
    Spring(SpringController),
    RotOverhead(RotOverheadController),
    Overview(OverviewController),
    Dolly(DollyController),
    Dummy(DummyController),
}

macro_rules! dispatch {
    ($self:expr, $c:ident => $body:expr) => {
        match $self {
            CameraController::FirstPerson($c) => $body,
            CameraController::Overhead($c) => $body,
            CameraController::Spring($c) => $body,
            CameraController::RotOverhead($c) => $body,
            CameraController::Overview($c) => $body,
            CameraController::Dolly($c) => $body,
            CameraController::Dummy($c) => $body,
        }
    };
}

impl CameraController {
    /// Controller for `mode` over a map of `map_size`
    pub fn new(mode: ControllerMode, config: &CameraConfig, map_size: Vec2) -> Self {
        match mode {
            ControllerMode::FirstPerson => Self::FirstPerson(FirstPersonController::new(config, map_size)),
            ControllerMode::Overhead => Self::Overhead(OverheadController::new(config, map_size)),
            ControllerMode::Spring => Self::Spring(SpringController::new(config, map_size)),
            ControllerMode::RotOverhead => Self::RotOverhead(RotOverheadController::new(config, map_size)),
            ControllerMode::Overview => Self::Overview(OverviewController::new(config, map_size)),
            ControllerMode::Dolly => Self::Dolly(DollyController::new(config, map_size)),
            ControllerMode::Dummy => Self::Dummy(DummyController::new(map_size)),
        }
    }

    pub fn mode(&self) -> ControllerMode {
        match self {
            CameraController::FirstPerson(_) => ControllerMode::FirstPerson,
            CameraController::Overhead(_) => ControllerMode::Overhead,
            CameraController::Spring(_) => ControllerMode::Spring,
            CameraController::RotOverhead(_) => ControllerMode::RotOverhead,
            CameraController::Overview(_) => ControllerMode::Overview,
            CameraController::Dolly(_) => ControllerMode::Dolly,
            CameraController::Dummy(_) => ControllerMode::Dummy,
        }
    }

    pub fn name(&self) -> &'static str {
        self.mode().name()
    }

    fn base(&self) -> &ControllerBase {
        dispatch!(self, c => &c.base)
    }

    pub fn enabled(&self) -> bool {
        self.base().enabled
    }

    /// Eye position this controller wants the camera at
    pub fn position(&self) -> Vec3 {
        self.base().position
    }

    pub fn direction(&self) -> Vec3 {
        self.base().direction
    }

    pub fn fov(&self) -> f32 {
        self.base().fov
    }

    pub fn rotation(&self) -> Vec3 {
        dispatch!(self, c => c.rotation())
    }

    // ===== INPUT =====

    /// Held-key movement; `mv.xy` is the move, `mv.z` the speed multiplier
    pub fn key_move(&mut self, mv: Vec3, ctx: &mut ControllerContext) {
        dispatch!(self, c => c.key_move(mv, ctx))
    }

    /// Mouse drag; `mv.z` carries the invert/speed factor
    pub fn mouse_move(&mut self, mv: Vec3, ctx: &mut ControllerContext) {
        dispatch!(self, c => c.mouse_move(mv, ctx))
    }

    pub fn screen_edge_move(&mut self, mv: Vec3, ctx: &mut ControllerContext) {
        dispatch!(self, c => c.screen_edge_move(mv, ctx))
    }

    /// Zoom; negative `delta` zooms in. `ref_dir` is usually the cursor ray.
    pub fn mouse_wheel_move(&mut self, delta: f32, ref_dir: Vec3, ctx: &mut ControllerContext) {
        dispatch!(self, c => c.mouse_wheel_move(delta, ref_dir, ctx))
    }

    /// Settle the pose after input or external changes
    pub fn update(&mut self, ctx: &mut ControllerContext) {
        dispatch!(self, c => c.update(ctx))
    }

    // ===== POSE =====

    pub fn set_position(&mut self, position: Vec3, ctx: &mut ControllerContext) {
        dispatch!(self, c => c.set_position(position, ctx))
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        dispatch!(self, c => c.set_rotation(rotation))
    }

    pub fn set_direction(&mut self, direction: Vec3) {
        dispatch!(self, c => c.set_direction(direction))
    }

    // ===== HANDOFF =====

    /// Position handed to the next controller
    pub fn switch_from(&self) -> Vec3 {
        dispatch!(self, c => c.switch_from())
    }

    /// Handoff record of this controller
    pub fn switch_source(&self) -> SwitchSource {
        SwitchSource {
            mode: self.mode(),
            position: self.switch_from(),
            rotation: self.rotation(),
            eye: self.position(),
        }
    }

    pub fn switch_to(&mut self, source: &SwitchSource, announce: bool, ctx: &mut ControllerContext) {
        dispatch!(self, c => c.switch_to(source, announce, ctx))
    }

    // ===== STATE =====

    pub fn get_state(&self, sm: &mut StateMap) {
        dispatch!(self, c => c.get_state(sm))
    }

    pub fn set_state(&mut self, sm: &StateMap) -> bool {
        dispatch!(self, c => c.set_state(sm))
    }

    pub fn config_update(&mut self, config: &CameraConfig) {
        dispatch!(self, c => c.config_update(config))
    }

    // ===== DOWNCASTS =====

    pub fn as_overhead(&self) -> Option<&OverheadController> {
        match self {
            CameraController::Overhead(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_overhead_mut(&mut self) -> Option<&mut OverheadController> {
        match self {
            CameraController::Overhead(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_spring(&self) -> Option<&SpringController> {
        match self {
            CameraController::Spring(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_dolly(&self) -> Option<&DollyController> {
        match self {
            CameraController::Dolly(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_dolly_mut(&mut self) -> Option<&mut DollyController> {
        match self {
            CameraController::Dolly(c) => Some(c),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
