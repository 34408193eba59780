//! Unit tests for camera_set.rs

use std::f32::consts::PI;
use glam::Vec3;
use crate::config::CameraConfig;
use crate::environment::{FlatTerrain, FrameContext};
use super::*;

fn create_test_set() -> CameraSet {
    CameraSet::new(&CameraConfig::new())
}

// ============================================================================
// Slots
// ============================================================================

#[test]
fn test_new_creates_one_camera_per_kind() {
    let set = create_test_set();

    assert_eq!(set.iter().count(), CameraKind::COUNT);
    for kind in CameraKind::ALL {
        assert_eq!(set.get(kind).kind(), kind);
    }
    assert_eq!(set.active_kind(), CameraKind::Player);
}

#[test]
fn test_set_active() {
    let mut set = create_test_set();
    set.set_active(CameraKind::Shadow);

    assert_eq!(set.active_kind(), CameraKind::Shadow);
    assert_eq!(set.active().kind(), CameraKind::Shadow);

    set.active_mut().set_position(Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(set.get(CameraKind::Shadow).position(), Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(set.get(CameraKind::Player).position(), Vec3::ZERO);
}

// ============================================================================
// Culling mirror
// ============================================================================

#[test]
fn test_frustum_update_mirrors_into_culling_slot() {
    let mut set = create_test_set();
    let frame = FrameContext::new(800.0, 600.0);
    let terrain = FlatTerrain::new(1024.0, 1024.0);

    let player = set.get_mut(CameraKind::Player);
    player.set_position(Vec3::new(300.0, 400.0, 200.0));
    player.set_rotation(Vec3::new(PI * 0.75, 0.4, 0.0));
    set.update(CameraKind::Player, UpdateFlags::all(), &frame, &terrain);

    let player = set.get(CameraKind::Player);
    let mirror = set.get(CameraKind::VisibilityCulling);
    assert_eq!(mirror.kind(), CameraKind::VisibilityCulling);
    assert_eq!(mirror.position(), player.position());
    assert_eq!(mirror.forward(), player.forward());
    assert_eq!(mirror.frustum(), player.frustum());
}

#[test]
fn test_update_without_frustum_leaves_mirror() {
    let mut set = create_test_set();
    let frame = FrameContext::new(800.0, 600.0);
    let terrain = FlatTerrain::new(1024.0, 1024.0);

    set.get_mut(CameraKind::Player).set_position(Vec3::new(5.0, 6.0, 7.0));
    set.update(CameraKind::Player, UpdateFlags::DIRS | UpdateFlags::MATRICES, &frame, &terrain);

    assert_eq!(set.get(CameraKind::VisibilityCulling).position(), Vec3::ZERO);
}

#[test]
fn test_reflection_slot_mirrors_player() {
    let mut set = create_test_set();
    let frame = FrameContext::new(800.0, 600.0);
    let terrain = FlatTerrain::new(1024.0, 1024.0);

    let player = set.get_mut(CameraKind::Player);
    player.set_position(Vec3::new(100.0, 80.0, 100.0));
    player.set_direction(Vec3::new(0.0, -0.6, -0.8));
    set.update(CameraKind::Player, UpdateFlags::all(), &frame, &terrain);
    set.update_reflection(&frame, &terrain);

    let reflection = set.get(CameraKind::UnderwaterReflection);
    assert!(reflection.position().abs_diff_eq(Vec3::new(100.0, -80.0, 100.0), 1e-4));
    assert!(reflection.forward().abs_diff_eq(Vec3::new(0.0, 0.6, -0.8), 1e-4));
    assert_eq!(set.get(CameraKind::VisibilityCulling).position(), reflection.position());
}

#[test]
fn test_config_update_reaches_all_slots() {
    let mut set = create_test_set();
    let mut config = CameraConfig::new();
    config.set("CameraMoveFastMult", 4.0).unwrap();

    set.config_update(&config);
    for camera in set.iter() {
        assert_eq!(camera.move_fast_mult(), 4.0);
    }
}
