//! Camera slots, frustum geometry and frustum lines
//!
//! A [`Camera`] derives its basis, matrices and [`Frustum`] from a pose when
//! told to through [`UpdateFlags`]. [`CameraSet`] owns the fixed slots.

mod camera;
mod camera_set;
mod camera_uniform;
mod frustum;
mod frustum_lines;

pub use camera::{
    Camera, CameraKind, MoveState, ProjectionKind, UpdateFlags, DEFAULT_VFOV,
};
pub use camera_set::CameraSet;
pub use camera_uniform::CameraUniform;
pub use frustum::{
    Frustum, FrustumShape, FrustumTest, PlaneMask,
    PLANE_LEFT, PLANE_RIGHT, PLANE_BOTTOM, PLANE_TOP, PLANE_NEAR, PLANE_FAR,
    POINT_NBL, POINT_NBR, POINT_NTR, POINT_NTL, POINT_FBL, POINT_FBR, POINT_FTR, POINT_FTL,
    EDGE_NEAR_TOP, EDGE_NEAR_LEFT, EDGE_TOP_LEFT, EDGE_TOP_RIGHT, EDGE_BOTTOM_RIGHT, EDGE_BOTTOM_LEFT,
};
pub use frustum_lines::{FrustumLine, FrustumLines, FRUSTUM_SIDE_NEG, FRUSTUM_SIDE_POS};
