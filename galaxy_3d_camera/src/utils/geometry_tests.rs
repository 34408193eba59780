//! Unit tests for geometry.rs

use glam::{Vec3, Vec4};
use super::*;

// ============================================================================
// AABB
// ============================================================================

#[test]
fn test_aabb_center_and_radius() {
    let aabb = AABB::new(Vec3::new(-1.0, -2.0, -2.0), Vec3::new(1.0, 2.0, 2.0));
    assert_eq!(aabb.center(), Vec3::ZERO);
    assert!((aabb.radius() - 3.0).abs() < 1e-6);
}

#[test]
fn test_aabb_from_center() {
    let aabb = AABB::from_center(Vec3::new(5.0, 0.0, 5.0), Vec3::splat(1.0));
    assert_eq!(aabb.min, Vec3::new(4.0, -1.0, 4.0));
    assert_eq!(aabb.max, Vec3::new(6.0, 1.0, 6.0));
    assert!(aabb.contains_point(Vec3::new(5.5, 0.5, 4.5)));
    assert!(!aabb.contains_point(Vec3::new(7.0, 0.0, 5.0)));
}

#[test]
fn test_aabb_p_and_n_vertex() {
    let aabb = AABB::new(Vec3::ZERO, Vec3::ONE);
    let n = Vec3::new(1.0, -1.0, 0.0);
    assert_eq!(aabb.positive_vertex(n), Vec3::new(1.0, 0.0, 1.0));
    assert_eq!(aabb.negative_vertex(n), Vec3::new(0.0, 1.0, 0.0));
}

// ============================================================================
// PLANES
// ============================================================================

#[test]
fn test_plane_from_points_orientation() {
    let plane = plane_from_points(
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
    );
    // (v3 - v2) x (v1 - v2) = X x Z = -Y
    assert!(plane.truncate().abs_diff_eq(Vec3::NEG_Y, 1e-6));
    assert!(plane.w.abs() < 1e-6);
    assert!((plane_distance(plane, Vec3::new(3.0, -2.0, 1.0)) - 2.0).abs() < 1e-6);
}

#[test]
fn test_intersect_planes_line() {
    // y = 0 and x = 5
    let ground = Vec4::new(0.0, 1.0, 0.0, 0.0);
    let wall = Vec4::new(1.0, 0.0, 0.0, -5.0);

    let (dir, point) = intersect_planes(ground, wall).unwrap();
    assert!((dir.length() - 1.0).abs() < 1e-6);
    assert!(dir.abs_diff_eq(Vec3::NEG_Z, 1e-6) || dir.abs_diff_eq(Vec3::Z, 1e-6));
    assert!(plane_distance(ground, point).abs() < 1e-5);
    assert!(plane_distance(wall, point).abs() < 1e-5);
}

#[test]
fn test_intersect_planes_oblique() {
    let a = Vec4::new(0.0, 1.0, 0.0, -10.0);
    let n = Vec3::new(0.3, 0.5, -0.8).normalize();
    let b = n.extend(4.0);

    let (dir, point) = intersect_planes(a, b).unwrap();
    assert!(plane_distance(a, point).abs() < 1e-4);
    assert!(plane_distance(b, point).abs() < 1e-4);
    assert!(dir.dot(a.truncate()).abs() < 1e-5);
    assert!(dir.dot(n).abs() < 1e-5);
}

#[test]
fn test_intersect_parallel_planes_is_none() {
    let a = Vec4::new(0.0, 1.0, 0.0, 0.0);
    let b = Vec4::new(0.0, 1.0, 0.0, -3.0);
    assert!(intersect_planes(a, b).is_none());
}

// ============================================================================
// RAYS
// ============================================================================

#[test]
fn test_line_plane_distance() {
    let origin = Vec3::new(0.0, 50.0, 0.0);
    let dir = Vec3::new(0.0, -1.0, 1.0).normalize();
    let d = line_plane_distance(origin, dir, 0.0, 1000.0);
    assert!((d - 50.0 * 2f32.sqrt()).abs() < 1e-3);

    assert!(line_plane_distance(origin, Vec3::Y, 0.0, 1000.0) < 0.0);
    assert!(line_plane_distance(origin, dir, 0.0, 10.0) < 0.0);
    assert!(line_plane_distance(origin, Vec3::X, 0.0, 1000.0) < 0.0);
}
