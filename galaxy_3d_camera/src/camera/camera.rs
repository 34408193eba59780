/// Camera: pose, projection and derived view volume of one viewpoint.
///
/// The camera owns its rotation and derives everything else from it: the
/// orthonormal basis, the view and projection matrices with their inverses,
/// and the frustum. Recomputation is explicit through [`Camera::update`] and
/// [`UpdateFlags`]; nothing is recomputed lazily on read.

use bitflags::bitflags;
use glam::{Mat4, Vec2, Vec3, Vec4};
use crate::config::CameraConfig;
use crate::environment::{FrameContext, Terrain, Viewport};
use crate::utils::{self, AABB};
use super::camera_uniform::CameraUniform;
use super::frustum::{Frustum, FrustumShape, FrustumTest, PlaneMask};
use super::frustum_lines::FrustumLines;

/// Default vertical field of view, in degrees
pub const DEFAULT_VFOV: f32 = 45.0;

/// Fixed camera slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraKind {
    /// Main player view
    Player,
    /// Mirror of the player view below the water plane
    UnderwaterReflection,
    /// Shadow caster (orthographic)
    Shadow,
    /// Environment map capture
    EnvironmentMap,
    /// Mirror used by visibility culling, copied from the frustum authority
    VisibilityCulling,
}

impl CameraKind {
    pub const COUNT: usize = 5;

    pub const ALL: [CameraKind; Self::COUNT] = [
        CameraKind::Player,
        CameraKind::UnderwaterReflection,
        CameraKind::Shadow,
        CameraKind::EnvironmentMap,
        CameraKind::VisibilityCulling,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn projection(self) -> ProjectionKind {
        match self {
            CameraKind::Shadow => ProjectionKind::Orthographic,
            _ => ProjectionKind::Perspective,
        }
    }

    /// Planes checked by visibility tests. Shadow cameras fit their depth
    /// range separately and skip near/far.
    pub fn plane_mask(self) -> PlaneMask {
        match self {
            CameraKind::Shadow => PlaneMask::SIDES,
            _ => PlaneMask::ALL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionKind {
    Perspective,
    Orthographic,
}

bitflags! {
    /// Recompute steps of [`Camera::update`], applied in declaration order
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct UpdateFlags: u8 {
        /// Adaptive near/far distances
        const VIEW_RANGE = 1 << 0;
        /// Basis vectors from rotation
        const DIRS = 1 << 1;
        /// Projection, view, combined, inverses, billboard
        const MATRICES = 1 << 2;
        /// Viewport rectangle from the frame
        const VIEWPORT = 1 << 3;
        /// Frustum vertices, planes and edges
        const FRUSTUM = 1 << 4;
    }
}

bitflags! {
    /// Held movement keys
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MoveState: u16 {
        const FORWARD = 1 << 0;
        const BACK = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        const UP = 1 << 4;
        const DOWN = 1 << 5;
        const FAST = 1 << 6;
        const SLOW = 1 << 7;
        const TILT = 1 << 8;
        const RESET = 1 << 9;
        const ROTATE = 1 << 10;
    }
}

impl MoveState {
    /// `1.0` when `key` is held, else `0.0`
    pub fn axis(self, key: MoveState) -> f32 {
        if self.contains(key) { 1.0 } else { 0.0 }
    }
}

/// Input scaling read from the configuration
#[derive(Debug, Clone, Copy)]
struct MoveSettings {
    edge_move_width: f32,
    edge_move_dynamic: bool,
    fast_mult: f32,
    slow_mult: f32,
}

impl MoveSettings {
    fn from_config(config: &CameraConfig) -> Self {
        Self {
            edge_move_width: config.get_float("EdgeMoveWidth"),
            edge_move_dynamic: config.get_bool("EdgeMoveDynamic"),
            fast_mult: config.get_float("CameraMoveFastMult"),
            slow_mult: config.get_float("CameraMoveSlowMult"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Camera {
    kind: CameraKind,
    projection: ProjectionKind,
    plane_mask: PlaneMask,

    position: Vec3,
    rotation: Vec3,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    position_offset: Vec3,
    tilt_offset: Vec3,

    fov: f32,
    half_fov: f32,
    tan_half_fov: f32,
    aspect_ratio: f32,
    lpp_scale: f32,
    min_near: f32,
    max_view_range: f32,

    view_matrix: Mat4,
    projection_matrix: Mat4,
    view_projection_matrix: Mat4,
    view_matrix_inverse: Mat4,
    projection_matrix_inverse: Mat4,
    view_projection_matrix_inverse: Mat4,
    billboard_matrix: Mat4,

    frustum: Frustum,
    frustum_lines: FrustumLines,
    viewport: Viewport,

    move_state: MoveState,
    move_settings: MoveSettings,
}

impl Camera {
    /// Camera for slot `kind`, facing +Z with the default field of view
    pub fn new(kind: CameraKind, config: &CameraConfig) -> Self {
        let min_near = config.get_float("CamMinNearDistance");
        let max_view_range = config.get_float("CamMaxViewRange");

        let mut camera = Self {
            kind,
            projection: kind.projection(),
            plane_mask: kind.plane_mask(),
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            forward: Vec3::Z,
            right: Vec3::X,
            up: Vec3::Y,
            position_offset: Vec3::ZERO,
            tilt_offset: Vec3::ZERO,
            fov: 0.0,
            half_fov: 0.0,
            tan_half_fov: 0.0,
            aspect_ratio: 1.0,
            lpp_scale: 0.0,
            min_near,
            max_view_range,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            view_projection_matrix: Mat4::IDENTITY,
            view_matrix_inverse: Mat4::IDENTITY,
            projection_matrix_inverse: Mat4::IDENTITY,
            view_projection_matrix_inverse: Mat4::IDENTITY,
            billboard_matrix: Mat4::IDENTITY,
            frustum: Frustum::new(min_near, max_view_range),
            frustum_lines: FrustumLines::default(),
            viewport: Viewport::new(1.0, 1.0),
            move_state: MoveState::empty(),
            move_settings: MoveSettings::from_config(config),
        };

        camera.set_vfov(DEFAULT_VFOV);
        camera.set_direction(Vec3::Z);
        camera
    }

    /// Re-read movement and view range settings
    pub fn config_update(&mut self, config: &CameraConfig) {
        self.move_settings = MoveSettings::from_config(config);
        self.min_near = config.get_float("CamMinNearDistance");
        self.max_view_range = config.get_float("CamMaxViewRange");
    }

    // ===== GETTERS =====

    pub fn kind(&self) -> CameraKind {
        self.kind
    }

    pub fn projection(&self) -> ProjectionKind {
        self.projection
    }

    pub fn plane_mask(&self) -> PlaneMask {
        self.plane_mask
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// (inclination, azimuth, roll)
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn position_offset(&self) -> Vec3 {
        self.position_offset
    }

    pub fn tilt_offset(&self) -> Vec3 {
        self.tilt_offset
    }

    /// Vertical field of view in degrees
    pub fn vfov(&self) -> f32 {
        self.fov
    }

    /// Horizontal field of view in degrees
    pub fn hfov(&self) -> f32 {
        2.0 * (self.tan_half_fov * self.aspect_ratio).atan().to_degrees()
    }

    /// Half the vertical field of view, in radians
    pub fn half_fov(&self) -> f32 {
        self.half_fov
    }

    pub fn tan_half_fov(&self) -> f32 {
        self.tan_half_fov
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// World length covered by one pixel at unit distance
    pub fn lpp_scale(&self) -> f32 {
        self.lpp_scale
    }

    pub fn near(&self) -> f32 {
        self.frustum.near()
    }

    pub fn far(&self) -> f32 {
        self.frustum.far()
    }

    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// projection * view
    pub fn view_projection_matrix(&self) -> &Mat4 {
        &self.view_projection_matrix
    }

    pub fn view_matrix_inverse(&self) -> &Mat4 {
        &self.view_matrix_inverse
    }

    pub fn projection_matrix_inverse(&self) -> &Mat4 {
        &self.projection_matrix_inverse
    }

    pub fn view_projection_matrix_inverse(&self) -> &Mat4 {
        &self.view_projection_matrix_inverse
    }

    /// Rotation-only inverse view, for camera-facing sprites
    pub fn billboard_matrix(&self) -> &Mat4 {
        &self.billboard_matrix
    }

    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    pub fn frustum_lines(&self) -> &FrustumLines {
        &self.frustum_lines
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn move_state(&self) -> MoveState {
        self.move_state
    }

    pub fn move_fast_mult(&self) -> f32 {
        self.move_settings.fast_mult
    }

    // ===== SETTERS =====

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Store `rotation` and re-derive the basis
    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        self.update_directions();
    }

    /// Solve inclination and azimuth from a unit direction, keeping the roll
    pub fn set_direction(&mut self, dir: Vec3) {
        debug_assert!(dir.length_squared() > 0.0, "degenerate camera direction");

        let roll = self.rotation.z;
        let rotation = utils::rotation_from_direction(dir);
        self.set_rotation(Vec3::new(rotation.x, rotation.y, roll));
    }

    /// Vertical field of view in degrees
    pub fn set_vfov(&mut self, fov: f32) {
        self.fov = fov;
        self.half_fov = (fov * 0.5).to_radians();
        self.tan_half_fov = self.half_fov.tan();
    }

    /// Eye displacement applied at matrix build time only
    pub fn set_position_offset(&mut self, offset: Vec3) {
        self.position_offset = offset;
    }

    /// Look-direction displacement (right, up, forward) applied at matrix build time only
    pub fn set_tilt_offset(&mut self, offset: Vec3) {
        self.tilt_offset = offset;
    }

    /// Orthographic half extents (x, y) and near/far (z, w)
    pub fn set_frustum_scales(&mut self, scales: Vec4) {
        self.frustum.scales = scales;
    }

    pub fn set_move_state(&mut self, state: MoveState) {
        self.move_state = state;
    }

    // ===== UPDATE =====

    /// Recompute the steps selected by `flags`, in order: view range,
    /// directions, matrices, viewport, frustum.
    pub fn update(&mut self, flags: UpdateFlags, frame: &FrameContext, terrain: &dyn Terrain) {
        let viewport = frame.viewport;
        debug_assert!(viewport.width > 0.0 && viewport.height > 0.0, "zero-size viewport");

        self.lpp_scale = 2.0 * self.tan_half_fov / viewport.height;
        self.aspect_ratio = viewport.aspect_ratio();

        if flags.contains(UpdateFlags::VIEW_RANGE) {
            self.update_view_range(terrain);
        }
        if flags.contains(UpdateFlags::DIRS) {
            self.update_directions();
        }
        if flags.contains(UpdateFlags::MATRICES) {
            self.update_matrices();
        }
        if flags.contains(UpdateFlags::VIEWPORT) {
            self.viewport = viewport;
        }
        if flags.contains(UpdateFlags::FRUSTUM) {
            self.update_frustum();
        }
    }

    fn update_directions(&mut self) {
        self.forward = utils::forward_from_rotation(self.rotation);

        let raw_right = utils::right_from_rotation(self.rotation);
        self.up = raw_right.cross(self.forward).try_normalize().unwrap_or(self.up);
        self.right = self.forward.cross(self.up).try_normalize().unwrap_or(raw_right);
    }

    /// Fit near/far to the camera height and how far the map reaches from it
    fn update_view_range(&mut self, terrain: &dyn Terrain) {
        let map = terrain.map_size();
        let max_x = self.position.x.max(map.x - self.position.x);
        let max_z = self.position.z.max(map.y - self.position.z);
        let max_edge_dist = (max_x * max_x + max_z * max_z).sqrt();

        let height = self.position.y - terrain.min_height().max(0.0);
        let wanted = (height * 2.0).max((1.0 - self.forward.dot(Vec3::Y).min(0.0)) * max_edge_dist);

        let near = (wanted * 0.001).max(self.min_near);
        let far = wanted.min(self.max_view_range).max(near * 2.0);

        self.frustum.scales.z = near;
        self.frustum.scales.w = far;
    }

    fn update_matrices(&mut self) {
        let near = self.frustum.near();
        let far = self.frustum.far();

        self.projection_matrix = match self.projection {
            ProjectionKind::Perspective => {
                Mat4::perspective_rh(self.half_fov * 2.0, self.aspect_ratio, near, far)
            }
            ProjectionKind::Orthographic => {
                let sx = self.frustum.scales.x;
                let sy = self.frustum.scales.y;
                Mat4::orthographic_rh(-sx, sx, -sy, sy, near, far)
            }
        };

        let eye = self.position + self.position_offset;
        let look = (self.forward * (1.0 + self.tilt_offset.z)
            + self.right * self.tilt_offset.x
            + self.up * self.tilt_offset.y)
            .try_normalize()
            .unwrap_or(self.forward);

        self.view_matrix = Mat4::look_at_rh(eye, eye + look, self.up);
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;

        self.view_matrix_inverse = self.view_matrix.inverse();
        self.projection_matrix_inverse = self.projection_matrix.inverse();
        self.view_projection_matrix_inverse = self.view_projection_matrix.inverse();

        let mut rotation_only = self.view_matrix;
        rotation_only.w_axis = Vec4::W;
        self.billboard_matrix = rotation_only.transpose();
    }

    fn update_frustum(&mut self) {
        let shape = match self.projection {
            ProjectionKind::Perspective => FrustumShape::Perspective {
                tan_half_fov: self.tan_half_fov,
                aspect: self.aspect_ratio,
            },
            ProjectionKind::Orthographic => FrustumShape::Orthographic,
        };

        self.frustum.rebuild(self.position, self.forward, self.right, self.up, shape);
    }

    // ===== STATE COPIES =====

    /// Copy pose, basis, field of view and frustum from `other`. The slot
    /// kind is kept.
    pub fn copy_state(&mut self, other: &Camera) {
        self.frustum = other.frustum;
        self.forward = other.forward;
        self.right = other.right;
        self.up = other.up;
        self.position = other.position;
        self.rotation = other.rotation;
        self.fov = other.fov;
        self.half_fov = other.half_fov;
        self.tan_half_fov = other.tan_half_fov;
        self.lpp_scale = other.lpp_scale;
        self.aspect_ratio = other.aspect_ratio;
    }

    /// Copy `other` mirrored through the water plane (y = 0). Matrices and
    /// frustum must be rebuilt afterwards.
    pub fn copy_state_reflect(&mut self, other: &Camera) {
        self.copy_state(other);

        let dir = other.forward * Vec3::new(1.0, -1.0, 1.0);
        self.rotation.z = -other.rotation.z;
        self.set_direction(dir);
        self.position = other.position * Vec3::new(1.0, -1.0, 1.0);
    }

    // ===== VISIBILITY =====

    /// Sphere visibility against the planes enabled for this slot
    pub fn in_view(&self, point: Vec3, radius: f32) -> bool {
        self.frustum.intersects_sphere(point, radius, self.plane_mask)
    }

    /// Bounding-sphere test followed by the positive-vertex box test
    pub fn in_view_aabb(&self, aabb: &AABB) -> bool {
        self.in_view(aabb.center(), aabb.radius())
            && self.frustum.intersects_aabb(aabb, self.plane_mask)
    }

    pub fn classify_aabb(&self, aabb: &AABB) -> FrustumTest {
        self.frustum.classify_aabb(aabb, self.plane_mask)
    }

    /// Distance of `point` along the view direction
    pub fn projected_distance(&self, point: Vec3) -> f32 {
        self.forward.dot(point - self.position)
    }

    // ===== FRUSTUM LINES =====

    /// Rebuild the ground-plane lines of the side planes.
    /// See [`FrustumLines::calc`].
    pub fn calc_frustum_lines(
        &mut self,
        terrain: &dyn Terrain,
        min_y: f32,
        max_y: f32,
        scale: f32,
        neg: bool,
    ) {
        let map_depth = terrain.map_size().y;
        self.frustum_lines
            .calc(&self.frustum.planes, min_y, max_y, scale, neg, map_depth);
    }

    /// See [`FrustumLines::clip`]
    pub fn clip_frustum_lines(&mut self, z_min: f32, z_max: f32, neg: bool) {
        self.frustum_lines.clip(z_min, z_max, neg);
    }

    // ===== SCREEN SPACE =====

    /// Unit world direction through window pixel (x, y), origin top-left
    pub fn calc_pixel_dir(&self, x: f32, y: f32) -> Vec3 {
        let vp = &self.viewport;
        let width = vp.width.max(1.0);
        let height = vp.height.max(1.0);

        let dx = ((x - vp.x) - width * 0.5) / width * 2.0 * self.tan_half_fov * self.aspect_ratio;
        let dy = ((y - vp.y) - height * 0.5) / height * 2.0 * self.tan_half_fov;

        (self.forward - self.up * dy + self.right * dx).normalize()
    }

    /// Window pixel of a world point, origin top-left. `None` behind the eye.
    pub fn calc_viewport_coordinates(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.view_projection_matrix * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }

        let ndc = clip.truncate() / clip.w;
        let vp = &self.viewport;
        Some(Vec2::new(
            vp.x + (ndc.x * 0.5 + 0.5) * vp.width,
            vp.y + (0.5 - ndc.y * 0.5) * vp.height,
        ))
    }

    // ===== INPUT =====

    /// Movement request from the held keys (`from_keys`) or from the cursor's
    /// distance to the screen edges.
    ///
    /// `x` is sideways, `y` forward, both already scaled by the frame time.
    /// `z` carries the slow/fast speed multiplier.
    pub fn move_vector_from_state(&self, from_keys: bool, frame: &FrameContext) -> Vec3 {
        let settings = &self.move_settings;
        let state = self.move_state;
        let step = frame.frame_time_ms * 0.001;

        let mut speed = 1.0;
        if state.contains(MoveState::SLOW) {
            speed *= settings.slow_mult;
        }
        if state.contains(MoveState::FAST) {
            speed *= settings.fast_mult;
        }

        let mut v = Vec3::new(0.0, 0.0, speed);

        if from_keys {
            v.y += step * (state.axis(MoveState::FORWARD) - state.axis(MoveState::BACK));
            v.x += step * (state.axis(MoveState::RIGHT) - state.axis(MoveState::LEFT));
            return v;
        }

        let width = frame.window_size.x;
        let height = frame.viewport.height;
        let border_x = ((width * settings.edge_move_width) as i32).max(1) as f32;
        let border_y = ((height * settings.edge_move_width) as i32).max(1) as f32;

        let mut dist = Vec2::new(
            frame.mouse_position.x.clamp(0.0, width),
            frame.mouse_position.y.clamp(0.0, height),
        );
        if (width - 1.0) - dist.x < dist.x {
            dist.x = -((width - 1.0) - dist.x);
        }
        if (height - 1.0) - dist.y < dist.y {
            dist.y = -((height - 1.0) - dist.y);
        }

        let mut mv = if settings.edge_move_dynamic {
            Vec2::new(
                ((border_x - dist.x.abs()) / border_x).clamp(0.0, 1.0),
                ((border_y - dist.y.abs()) / border_y).clamp(0.0, 1.0),
            )
        } else {
            Vec2::new(
                if dist.x.abs() < border_x { 1.0 } else { 0.0 },
                if dist.y.abs() < border_y { 1.0 } else { 0.0 },
            )
        };

        mv.x = mv.x.copysign(-dist.x);
        mv.y = mv.y.copysign(dist.y);

        v.x = step * mv.x;
        v.y = step * mv.y;
        v
    }

    // ===== RENDERER HAND-OFF =====

    /// GPU-ready snapshot of the matrices and view parameters
    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view: self.view_matrix,
            projection: self.projection_matrix,
            view_projection: self.view_projection_matrix,
            inverse_view: self.view_matrix_inverse,
            inverse_projection: self.projection_matrix_inverse,
            inverse_view_projection: self.view_projection_matrix_inverse,
            position: (self.position + self.position_offset).extend(1.0),
            forward: self.forward.extend(0.0),
            params: Vec4::new(self.near(), self.far(), self.fov, self.aspect_ratio),
        }
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
