//! Plane, ray and bounding-box helpers

use glam::{Vec3, Vec4, Vec4Swizzles};

/// Squared-length threshold below which two planes count as parallel
const PARALLEL_EPSILON: f32 = 1e-8;

// ===== AABB =====

/// Axis-aligned bounding box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

impl AABB {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box of half-size `half_extents` around `center`
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self { min: center - half_extents, max: center + half_extents }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Radius of the bounding sphere around [`AABB::center`]
    pub fn radius(&self) -> f32 {
        (self.max - self.min).length() * 0.5
    }

    /// Corner furthest along `normal`
    pub fn positive_vertex(&self, normal: Vec3) -> Vec3 {
        Vec3::new(
            if normal.x >= 0.0 { self.max.x } else { self.min.x },
            if normal.y >= 0.0 { self.max.y } else { self.min.y },
            if normal.z >= 0.0 { self.max.z } else { self.min.z },
        )
    }

    /// Corner furthest against `normal`
    pub fn negative_vertex(&self, normal: Vec3) -> Vec3 {
        Vec3::new(
            if normal.x >= 0.0 { self.min.x } else { self.max.x },
            if normal.y >= 0.0 { self.min.y } else { self.max.y },
            if normal.z >= 0.0 { self.min.z } else { self.max.z },
        )
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

// ===== PLANES =====

/// Signed distance of `p` to `plane` (normal in xyz, offset in w)
pub fn plane_distance(plane: Vec4, p: Vec3) -> f32 {
    plane.xyz().dot(p) + plane.w
}

/// Plane through three points, normal `normalize((v3 - v2) × (v1 - v2))`
pub fn plane_from_points(v1: Vec3, v2: Vec3, v3: Vec3) -> Vec4 {
    let u = v1 - v2;
    let v = v3 - v2;
    let n = v.cross(u).normalize_or_zero();
    n.extend(-n.dot(v2))
}

/// Line shared by two planes, as `(unit direction, point on the line)`.
///
/// `None` when the planes are parallel. The point is found by fixing the
/// coordinate along the direction's dominant axis to zero.
pub fn intersect_planes(a: Vec4, b: Vec4) -> Option<(Vec3, Vec3)> {
    let na = a.xyz();
    let nb = b.xyz();
    let dir = na.cross(nb);

    if dir.length_squared() <= PARALLEL_EPSILON {
        return None;
    }

    let abs = dir.abs();
    let (k, i, j) = if abs.x >= abs.y && abs.x >= abs.z {
        (0, 1, 2)
    } else if abs.y >= abs.z {
        (1, 2, 0)
    } else {
        (2, 0, 1)
    };

    // a_i x + a_j y = -a.w
    // b_i x + b_j y = -b.w
    let det = na[i] * nb[j] - na[j] * nb[i];
    let x = (-a.w * nb[j] + b.w * na[j]) / det;
    let y = (-b.w * na[i] + a.w * nb[i]) / det;

    let mut point = Vec3::ZERO;
    point[i] = x;
    point[j] = y;
    point[k] = 0.0;

    Some((dir.normalize(), point))
}

/// Distance along unit `dir` from `origin` to the horizontal plane `y = height`.
/// `-1.0` when the plane is not reached within `(0, max_dist]`.
pub fn line_plane_distance(origin: Vec3, dir: Vec3, height: f32, max_dist: f32) -> f32 {
    if dir.y == 0.0 {
        return -1.0;
    }

    let dist = (height - origin.y) / dir.y;
    if dist <= 0.0 || dist > max_dist {
        return -1.0;
    }

    dist
}

#[cfg(test)]
#[path = "geometry_tests.rs"]
mod tests;
