/// Frustum: corner points, bounding planes and edges of a camera's view volume.
///
/// Each plane is a Vec4 (A, B, C, D):
/// - (A, B, C) is the unit normal, facing the enclosed volume
/// - D is the offset, so the signed distance of P is `dot(ABC, P) + D`
/// - A point is outside a plane when its signed distance is negative
///
/// Vertices, planes and edges are always rebuilt together from the camera
/// basis by [`Frustum::rebuild`].

use bitflags::bitflags;
use glam::{Vec3, Vec4, Vec4Swizzles};
use crate::utils::{AABB, plane_from_points};

/// Result of a 3-way frustum classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrustumTest {
    /// Entirely outside at least one enabled plane
    Outside,
    /// Entirely inside every enabled plane
    Inside,
    /// Straddles at least one enabled plane
    Partial,
}

/// Frustum plane indices
pub const PLANE_LEFT: usize = 0;
pub const PLANE_RIGHT: usize = 1;
pub const PLANE_BOTTOM: usize = 2;
pub const PLANE_TOP: usize = 3;
pub const PLANE_NEAR: usize = 4;
pub const PLANE_FAR: usize = 5;

/// Frustum corner indices (near/far, bottom/top, left/right)
pub const POINT_NBL: usize = 0;
pub const POINT_NBR: usize = 1;
pub const POINT_NTR: usize = 2;
pub const POINT_NTL: usize = 3;
pub const POINT_FBL: usize = 4;
pub const POINT_FBR: usize = 5;
pub const POINT_FTR: usize = 6;
pub const POINT_FTL: usize = 7;

/// Frustum edge indices
pub const EDGE_NEAR_TOP: usize = 0;
pub const EDGE_NEAR_LEFT: usize = 1;
pub const EDGE_TOP_LEFT: usize = 2;
pub const EDGE_TOP_RIGHT: usize = 3;
pub const EDGE_BOTTOM_RIGHT: usize = 4;
pub const EDGE_BOTTOM_LEFT: usize = 5;

bitflags! {
    /// Subset of planes a visibility test considers
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PlaneMask: u8 {
        const LEFT = 1 << PLANE_LEFT;
        const RIGHT = 1 << PLANE_RIGHT;
        const BOTTOM = 1 << PLANE_BOTTOM;
        const TOP = 1 << PLANE_TOP;
        const NEAR = 1 << PLANE_NEAR;
        const FAR = 1 << PLANE_FAR;

        const SIDES = Self::LEFT.bits() | Self::RIGHT.bits() | Self::BOTTOM.bits() | Self::TOP.bits();
        const ALL = Self::SIDES.bits() | Self::NEAR.bits() | Self::FAR.bits();
    }
}

/// Volume shape used when placing the corner points
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrustumShape {
    /// Half extents grow with distance: `d·tan_half_fov·aspect` by `d·tan_half_fov`
    Perspective { tan_half_fov: f32, aspect: f32 },
    /// Constant half extents taken from `scales.xy`
    Orthographic,
}

/// View volume of one camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub vertices: [Vec3; 8],
    /// left, right, bottom, top, near, far
    pub planes: [Vec4; 6],
    pub edges: [Vec3; 6],
    /// x, y: orthographic half extents; z: near distance; w: far distance
    pub scales: Vec4,
}

impl Frustum {
    pub fn new(near: f32, far: f32) -> Self {
        Self {
            vertices: [Vec3::ZERO; 8],
            planes: [Vec4::ZERO; 6],
            edges: [Vec3::ZERO; 6],
            scales: Vec4::new(1.0, 1.0, near, far),
        }
    }

    pub fn near(&self) -> f32 {
        self.scales.z
    }

    pub fn far(&self) -> f32 {
        self.scales.w
    }

    /// Recompute vertices, planes and edges from an orthonormal basis
    pub fn rebuild(
        &mut self,
        position: Vec3,
        forward: Vec3,
        right: Vec3,
        up: Vec3,
        shape: FrustumShape,
    ) {
        let scales = self.scales;
        let extents = |dist: f32| -> (f32, f32) {
            match shape {
                FrustumShape::Perspective { tan_half_fov, aspect } => {
                    (dist * tan_half_fov * aspect, dist * tan_half_fov)
                }
                FrustumShape::Orthographic => (scales.x, scales.y),
            }
        };

        for (base, dist) in [(0, scales.z), (4, scales.w)] {
            let (sx, sy) = extents(dist);
            let center = position + forward * dist;

            self.vertices[base] = center - right * sx - up * sy;
            self.vertices[base + 1] = center + right * sx - up * sy;
            self.vertices[base + 2] = center + right * sx + up * sy;
            self.vertices[base + 3] = center - right * sx + up * sy;
        }

        let v = &self.vertices;
        self.planes[PLANE_LEFT] = plane_from_points(v[POINT_NTL], v[POINT_NBL], v[POINT_FBL]);
        self.planes[PLANE_RIGHT] = plane_from_points(v[POINT_NBR], v[POINT_NTR], v[POINT_FBR]);
        self.planes[PLANE_BOTTOM] = plane_from_points(v[POINT_NBL], v[POINT_NBR], v[POINT_FBR]);
        self.planes[PLANE_TOP] = plane_from_points(v[POINT_NTR], v[POINT_NTL], v[POINT_FTL]);
        self.planes[PLANE_NEAR] = plane_from_points(v[POINT_NTL], v[POINT_NTR], v[POINT_NBR]);
        self.planes[PLANE_FAR] = plane_from_points(v[POINT_FTR], v[POINT_FTL], v[POINT_FBL]);

        self.edges[EDGE_NEAR_TOP] = (v[POINT_NTR] - v[POINT_NTL]).normalize_or_zero();
        self.edges[EDGE_NEAR_LEFT] = (v[POINT_NTL] - v[POINT_NBL]).normalize_or_zero();
        self.edges[EDGE_TOP_LEFT] = (v[POINT_FTL] - v[POINT_NTL]).normalize_or_zero();
        self.edges[EDGE_TOP_RIGHT] = (v[POINT_FTR] - v[POINT_NTR]).normalize_or_zero();
        self.edges[EDGE_BOTTOM_RIGHT] = (v[POINT_FBR] - v[POINT_NBR]).normalize_or_zero();
        self.edges[EDGE_BOTTOM_LEFT] = (v[POINT_FBL] - v[POINT_NBL]).normalize_or_zero();
    }

    /// Signed distance of `point` to plane `index`
    pub fn distance(&self, index: usize, point: Vec3) -> f32 {
        let plane = self.planes[index];
        plane.xyz().dot(point) + plane.w
    }

    fn enabled_planes(&self, mask: PlaneMask) -> impl Iterator<Item = &Vec4> {
        self.planes
            .iter()
            .enumerate()
            .filter(move |(i, _)| mask.bits() & (1 << i) != 0)
            .map(|(_, plane)| plane)
    }

    /// Sphere test: outside as soon as the center lies deeper than `radius`
    /// behind an enabled plane.
    pub fn intersects_sphere(&self, center: Vec3, radius: f32, mask: PlaneMask) -> bool {
        self.enabled_planes(mask)
            .all(|plane| plane.xyz().dot(center) + plane.w >= -radius)
    }

    /// Positive-vertex AABB test against the enabled planes.
    ///
    /// Conservative: may accept boxes near the frustum corners, never
    /// rejects a visible box.
    pub fn intersects_aabb(&self, aabb: &AABB, mask: PlaneMask) -> bool {
        self.enabled_planes(mask).all(|plane| {
            let normal = plane.xyz();
            normal.dot(aabb.positive_vertex(normal)) + plane.w >= 0.0
        })
    }

    /// 3-way AABB classification against the enabled planes
    pub fn classify_aabb(&self, aabb: &AABB, mask: PlaneMask) -> FrustumTest {
        let mut all_inside = true;

        for plane in self.enabled_planes(mask) {
            let normal = plane.xyz();

            if normal.dot(aabb.positive_vertex(normal)) + plane.w < 0.0 {
                return FrustumTest::Outside;
            }
            if normal.dot(aabb.negative_vertex(normal)) + plane.w < 0.0 {
                all_inside = false;
            }
        }

        if all_inside { FrustumTest::Inside } else { FrustumTest::Partial }
    }
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
