//! Math helpers shared by cameras, controllers and the handler

pub mod angles;
pub mod geometry;
pub mod nurbs;

pub use angles::*;
pub use geometry::{AABB, intersect_planes, line_plane_distance, plane_from_points};
pub use nurbs::NurbsCurve;
