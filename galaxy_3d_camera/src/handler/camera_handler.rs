/// Camera handler: owns the camera slots, one controller per mode, the mode
/// stack, saved views and the transition blend.
///
/// Every frame the application calls [`CameraHandler::update`]: pending
/// input is forwarded to the current controller, the controller settles its
/// pose, and the live camera is blended toward that pose.

use glam::{Vec2, Vec3};
use rustc_hash::FxHashMap;
use crate::camera::{Camera, CameraSet, MoveState, UpdateFlags};
use crate::config::CameraConfig;
use crate::controller::{CameraController, ControllerContext, ControllerMode, StateMap};
use crate::environment::Environment;
use crate::error::Error;
use crate::utils;
use super::transition::{CameraTransition, Pose};

const LOG_SOURCE: &str = "galaxy3d::CameraHandler";

/// View slot written before every named view load, so loading the same view
/// twice returns to where the camera was
pub const OLD_VIEW: &str = "__old_view";

/// Duration of mode switches, in seconds before the time factor
const MODE_SWITCH_SECONDS: f32 = 1.0;

/// Relative tolerance when comparing a saved view against the live state
const VIEW_MATCH_TOLERANCE: f32 = 1e-3;

pub struct CameraHandler {
    config: CameraConfig,
    cameras: CameraSet,
    /// Indexed by `ControllerMode::index`
    controllers: Vec<CameraController>,
    current: ControllerMode,
    mode_stack: Vec<ControllerMode>,
    transition: CameraTransition,
    views: FxHashMap<String, StateMap>,
    windowed_edge_move: bool,
    fullscreen_edge_move: bool,
}

impl CameraHandler {
    /// Create the cameras and every controller. The handler starts in the
    /// dummy mode until [`init`](Self::init).
    pub fn new(config: CameraConfig, map_size: Vec2) -> Self {
        let cameras = CameraSet::new(&config);
        let controllers = ControllerMode::ALL
            .iter()
            .map(|&mode| CameraController::new(mode, &config, map_size))
            .collect();
        let transition = CameraTransition::new(
            config.get_float("CamTimeFactor"),
            config.get_float("CamTimeExponent"),
        );

        let mut handler = Self {
            config,
            cameras,
            controllers,
            current: ControllerMode::Dummy,
            mode_stack: Vec::new(),
            transition,
            views: FxHashMap::default(),
            windowed_edge_move: true,
            fullscreen_edge_move: true,
        };
        handler.read_config();
        handler
    }

    /// Select the configured start mode and place the camera on it
    pub fn init(&mut self, env: Environment) {
        let index = self.config.get_int("CamMode").max(0) as usize;
        let mode = ControllerMode::from_index(index)
            .filter(|&mode| mode != ControllerMode::Dummy)
            .unwrap_or(ControllerMode::Spring);

        self.set_mode(mode, env);

        for mode in ControllerMode::ALL {
            self.with_controller(mode, env, false, |controller, ctx| controller.update(ctx));
        }

        let pose = self.controller_pose(self.current);
        self.apply_pose(pose, env);

        crate::engine_info!(LOG_SOURCE, "Camera handler initialized in \"{}\" mode", self.current.name());
    }

    /// Park on the dummy controller; the camera keeps its last pose
    pub fn shutdown(&mut self) {
        self.mode_stack.clear();
        self.current = ControllerMode::Dummy;

        crate::engine_info!(LOG_SOURCE, "Camera handler shut down");
    }

    // ===== ACCESSORS =====

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn cameras(&self) -> &CameraSet {
        &self.cameras
    }

    pub fn cameras_mut(&mut self) -> &mut CameraSet {
        &mut self.cameras
    }

    /// Live camera driven by the controllers
    pub fn camera(&self) -> &Camera {
        self.cameras.active()
    }

    pub fn current_mode(&self) -> ControllerMode {
        self.current
    }

    pub fn controller(&self, mode: ControllerMode) -> &CameraController {
        &self.controllers[mode.index()]
    }

    pub fn controller_mut(&mut self, mode: ControllerMode) -> &mut CameraController {
        &mut self.controllers[mode.index()]
    }

    pub fn current_controller(&self) -> &CameraController {
        self.controller(self.current)
    }

    pub fn mode_stack(&self) -> &[ControllerMode] {
        &self.mode_stack
    }

    pub fn transition(&self) -> &CameraTransition {
        &self.transition
    }

    pub fn set_transition_params(&mut self, time_factor: f32, time_exponent: f32) {
        self.transition.set_time_factor(time_factor);
        self.transition.set_time_exponent(time_exponent);
    }

    pub fn has_view(&self, name: &str) -> bool {
        self.views.contains_key(name)
    }

    pub fn view(&self, name: &str) -> Option<&StateMap> {
        self.views.get(name)
    }

    // ===== FRAME =====

    /// Per-frame step: blend, forward held input, settle the controller,
    /// blend again so zero-second requests land this frame. Held input is
    /// dropped while `locked`.
    pub fn update(&mut self, env: Environment, locked: bool) {
        self.update_transition(env);

        let frame = env.frame;
        let camera = self.cameras.active();
        let key_move = camera.move_vector_from_state(true, frame);
        let edge_move = if self.edge_move_enabled(env) {
            Some(camera.move_vector_from_state(false, frame))
        } else {
            None
        };
        let state = camera.move_state();
        let wheel = (state.axis(MoveState::UP) - state.axis(MoveState::DOWN))
            * 0.2
            * frame.frame_time_ms;

        self.with_controller(self.current, env, locked, |controller, ctx| {
            if !locked {
                if key_move.x != 0.0 || key_move.y != 0.0 {
                    controller.key_move(key_move, ctx);
                }
                if let Some(edge_move) = edge_move {
                    if edge_move.x != 0.0 || edge_move.y != 0.0 {
                        controller.screen_edge_move(edge_move, ctx);
                    }
                }
                if wheel != 0.0 {
                    let ref_dir = ctx.cursor_dir;
                    controller.mouse_wheel_move(wheel, ref_dir, ctx);
                }
            }
            controller.update(ctx);
        });

        self.update_transition(env);
    }

    /// Mouse drag; `mv.z` carries the invert/speed factor
    pub fn mouse_move(&mut self, mv: Vec3, env: Environment) {
        self.with_controller(self.current, env, false, |controller, ctx| {
            controller.mouse_move(mv, ctx);
        });
    }

    /// Wheel zoom toward the cursor ray; negative `delta` zooms in
    pub fn mouse_wheel_move(&mut self, delta: f32, env: Environment) {
        self.with_controller(self.current, env, false, |controller, ctx| {
            let ref_dir = ctx.cursor_dir;
            controller.mouse_wheel_move(delta, ref_dir, ctx);
        });
    }

    pub fn move_state(&self) -> MoveState {
        self.cameras.active().move_state()
    }

    pub fn set_move_state(&mut self, state: MoveState) {
        self.cameras.active_mut().set_move_state(state);
    }

    // ===== MODES =====

    /// Switch controllers. Returns false when `mode` is already current.
    pub fn set_mode(&mut self, mode: ControllerMode, env: Environment) -> bool {
        let old = self.current;
        if mode == old {
            return false;
        }

        if old == ControllerMode::Dummy || mode == ControllerMode::Dummy {
            self.current = mode;
            return true;
        }

        let camera = self.cameras.active_mut();
        let rotation = utils::clamp_rad_principal_vec(camera.rotation());
        camera.set_rotation(rotation);

        let old_controller = &mut self.controllers[old.index()];
        let rotation = utils::clamp_rad_principal_vec(old_controller.rotation());
        old_controller.set_rotation(rotation);

        let from = self.camera_pose();
        self.transition.begin(from, MODE_SWITCH_SECONDS, env.now_ms());

        let source = self.controllers[old.index()].switch_source();
        self.current = mode;
        self.with_controller(mode, env, false, |controller, ctx| {
            controller.switch_to(&source, true, ctx);
            controller.update(ctx);
        });

        crate::engine_debug!(LOG_SOURCE, "Camera mode \"{}\" -> \"{}\"", old.name(), mode.name());
        true
    }

    pub fn set_mode_index(&mut self, index: usize, env: Environment) -> bool {
        match ControllerMode::from_index(index) {
            Some(mode) => self.set_mode(mode, env),
            None => false,
        }
    }

    /// Switch by short name (`"fps"`, `"ta"`, ...). The dummy mode is not
    /// selectable by name.
    pub fn set_mode_by_name(&mut self, name: &str, env: Environment) -> bool {
        match ControllerMode::from_name(name) {
            Ok(ControllerMode::Dummy) | Err(_) => {
                crate::engine_warn!(LOG_SOURCE, "Unknown camera mode \"{}\"", name);
                false
            }
            Ok(mode) => self.set_mode(mode, env),
        }
    }

    pub fn push_mode(&mut self) {
        self.mode_stack.push(self.current);
    }

    pub fn pop_mode(&mut self, env: Environment) -> bool {
        match self.mode_stack.pop() {
            Some(mode) => self.set_mode(mode, env),
            None => false,
        }
    }

    /// Enter the overview, or return to the mode that was active before it
    pub fn toggle_overview(&mut self, env: Environment) {
        let from = self.camera_pose();
        self.transition.begin(from, MODE_SWITCH_SECONDS, env.now_ms());

        if self.mode_stack.is_empty() {
            self.push_mode();
            self.set_mode(ControllerMode::Overview, env);
        } else {
            self.pop_mode(env);
        }
    }

    /// Cycle to the next enabled mode
    pub fn toggle_mode(&mut self, env: Environment) -> bool {
        let count = ControllerMode::COUNT;
        let mut next = (self.current.index() + 1) % count;

        for _ in 0..count - 1 {
            if self.controllers[next].enabled() {
                break;
            }
            next = (next + 1) % count;
        }

        self.set_mode_index(next, env)
    }

    // ===== STATE =====

    /// Current mode index under `"mode"` plus the current controller's state
    pub fn get_state(&self, sm: &mut StateMap) {
        sm.clear();
        sm.insert("mode".to_string(), self.current.index() as f32);
        self.controllers[self.current.index()].get_state(sm);
    }

    pub fn state(&self) -> StateMap {
        let mut sm = StateMap::default();
        self.get_state(&mut sm);
        sm
    }

    /// Apply a state map, switching mode first when it names one. Returns
    /// whether the controller accepted the state.
    pub fn set_state(&mut self, sm: &StateMap, env: Environment) -> bool {
        if let Some(&value) = sm.get("mode") {
            let Some(mode) = selectable_mode(value) else {
                return false;
            };
            if mode != self.current {
                let source = self.controllers[self.current.index()].switch_source();
                self.current = mode;
                self.with_controller(mode, env, false, |controller, ctx| {
                    controller.switch_to(&source, false, ctx);
                });
            }
        }

        self.with_controller(self.current, env, false, |controller, ctx| {
            let result = controller.set_state(sm);
            controller.update(ctx);
            result
        })
    }

    /// Store the current state under `name`. Empty names are ignored.
    pub fn save_view(&mut self, name: &str) {
        if name.is_empty() {
            return;
        }

        let sm = self.state();
        self.views.insert(name.to_string(), sm);
    }

    /// Restore a saved view. Loading a view the camera already shows returns
    /// to the pose it had before that view was loaded.
    pub fn load_view(&mut self, name: &str, env: Environment) -> bool {
        if name.is_empty() {
            return false;
        }

        let Some(saved) = self.views.get(name).cloned() else {
            crate::engine_warn!(LOG_SOURCE, "{}", Error::UnknownView(name.to_string()));
            return false;
        };

        if states_match(&saved, &self.state()) {
            if name == OLD_VIEW {
                return false;
            }
            if !self.views.contains_key(OLD_VIEW) {
                self.save_view(OLD_VIEW);
                return false;
            }
            return self.load_view(OLD_VIEW, env);
        }

        if name != OLD_VIEW {
            self.save_view(OLD_VIEW);
        }

        self.load_view_data(&saved, env)
    }

    /// Apply view data without touching the saved slots. A mode change blends
    /// over one second.
    pub fn load_view_data(&mut self, vd: &StateMap, env: Environment) -> bool {
        if vd.is_empty() {
            return false;
        }

        if let Some(&value) = vd.get("mode") {
            let Some(mode) = selectable_mode(value) else {
                return false;
            };
            if mode != self.current {
                let from = self.camera_pose();
                self.transition.begin(from, MODE_SWITCH_SECONDS, env.now_ms());

                let source = self.controllers[self.current.index()].switch_source();
                self.current = mode;
                self.with_controller(mode, env, false, |controller, ctx| {
                    controller.switch_to(&source, true, ctx);
                });
            }
        }

        self.controllers[self.current.index()].set_state(vd)
    }

    // ===== ACTIONS =====

    /// Run a named camera action. Returns false for names the handler does
    /// not know.
    pub fn push_action(&mut self, name: &str, args: &str, env: Environment) -> bool {
        let args = args.trim();

        match name {
            "viewfps" => {
                self.set_mode(ControllerMode::FirstPerson, env);
            }
            "viewta" => {
                self.set_mode(ControllerMode::Overhead, env);
            }
            "viewspring" => {
                self.set_mode(ControllerMode::Spring, env);
            }
            "viewrot" => {
                self.set_mode(ControllerMode::RotOverhead, env);
            }
            "viewov" => {
                self.set_mode(ControllerMode::Overview, env);
            }
            "viewdolly" => {
                self.set_mode(ControllerMode::Dolly, env);
            }
            "viewtaflip" => {
                self.with_controller(ControllerMode::Overhead, env, false, |controller, ctx| {
                    if let Some(overhead) = controller.as_overhead_mut() {
                        let flipped = if args.is_empty() {
                            !overhead.flipped()
                        } else {
                            args.parse::<i32>().unwrap_or(0) != 0
                        };
                        overhead.set_flipped(flipped);
                    }
                    controller.update(ctx);
                });
            }
            "viewsave" => {
                if !args.is_empty() {
                    self.save_view(args);
                    crate::engine_info!(LOG_SOURCE, "Saved view \"{}\"", args);
                }
            }
            "viewload" => {
                if self.load_view(args, env) {
                    crate::engine_info!(LOG_SOURCE, "Loaded view \"{}\"", args);
                }
            }
            "toggleoverview" => self.toggle_overview(env),
            "togglecammode" => {
                self.toggle_mode(env);
            }
            "camtimefactor" => {
                if !args.is_empty() {
                    self.transition.set_time_factor(args.parse().unwrap_or(0.0));
                }
                crate::engine_info!(
                    LOG_SOURCE,
                    "Set transition-time factor to {}",
                    self.transition.time_factor()
                );
            }
            "camtimeexponent" => {
                if !args.is_empty() {
                    self.transition.set_time_exponent(args.parse().unwrap_or(0.0));
                }
                crate::engine_info!(
                    LOG_SOURCE,
                    "Set transition-time exponent to {}",
                    self.transition.time_exponent()
                );
            }
            _ => return false,
        }

        true
    }

    /// Store a new configuration value and push it to the cameras and every
    /// controller. Unknown keys and unparsable values are rejected.
    pub fn config_changed(&mut self, key: &str, value: &str) -> bool {
        if let Err(err) = self.config.set_str(key, value) {
            crate::engine_warn!(LOG_SOURCE, "Ignoring camera setting {} = \"{}\": {}", key, value, err);
            return false;
        }

        self.read_config();
        self.cameras.config_update(&self.config);
        for controller in &mut self.controllers {
            controller.config_update(&self.config);
        }

        true
    }

    // ===== INTERNALS =====

    fn read_config(&mut self) {
        self.windowed_edge_move = self.config.get_bool("WindowedEdgeMove");
        self.fullscreen_edge_move = self.config.get_bool("FullscreenEdgeMove");
        self.transition.set_time_factor(self.config.get_float("CamTimeFactor"));
        self.transition.set_time_exponent(self.config.get_float("CamTimeExponent"));
    }

    fn edge_move_enabled(&self, env: Environment) -> bool {
        if env.frame.fullscreen {
            self.fullscreen_edge_move
        } else {
            self.windowed_edge_move
        }
    }

    /// Run `f` on one controller with a context over the live camera, then
    /// start the transition it requested. Requests from inactive controllers
    /// are dropped.
    fn with_controller<R>(
        &mut self,
        mode: ControllerMode,
        env: Environment,
        locked: bool,
        f: impl FnOnce(&mut CameraController, &mut ControllerContext) -> R,
    ) -> R {
        let mut ctx = ControllerContext::new(self.cameras.active(), env, locked);
        let result = f(&mut self.controllers[mode.index()], &mut ctx);
        let request = ctx.take_transition();

        if let Some(seconds) = request {
            if mode == self.current {
                let from = self.camera_pose();
                self.transition.begin(from, seconds, env.now_ms());
            }
        }

        result
    }

    fn controller_pose(&self, mode: ControllerMode) -> Pose {
        let controller = &self.controllers[mode.index()];
        Pose::new(controller.position(), controller.rotation(), controller.fov())
    }

    fn camera_pose(&self) -> Pose {
        let camera = self.cameras.active();
        Pose::new(camera.position(), camera.rotation(), camera.vfov())
    }

    fn apply_pose(&mut self, pose: Pose, env: Environment) {
        let camera = self.cameras.active_mut();
        camera.set_position(pose.position);
        camera.set_rotation(pose.rotation);
        camera.set_vfov(pose.fov);

        let kind = self.cameras.active_kind();
        self.cameras.update(kind, UpdateFlags::all(), env.frame, env.terrain);
    }

    fn update_transition(&mut self, env: Environment) {
        if self.current == ControllerMode::Dummy {
            return;
        }

        let target = self.controller_pose(self.current);
        if let Some(pose) = self.transition.evaluate(&target, env.now_ms()) {
            self.apply_pose(pose, env);
        }
    }
}

/// Mode named by a state map's `"mode"` value; the dummy is not selectable
fn selectable_mode(value: f32) -> Option<ControllerMode> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    ControllerMode::from_index(value as usize).filter(|&mode| mode != ControllerMode::Dummy)
}

/// Same keys, values equal within a relative tolerance
fn states_match(a: &StateMap, b: &StateMap) -> bool {
    a.len() == b.len()
        && a.iter().all(|(key, &value)| {
            b.get(key).is_some_and(|&other| {
                (value - other).abs() <= VIEW_MATCH_TOLERANCE * value.abs().max(1.0)
            })
        })
}

#[cfg(test)]
#[path = "camera_handler_tests.rs"]
mod tests;
