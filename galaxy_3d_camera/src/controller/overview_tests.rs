//! Unit tests for overview.rs

use glam::Vec3;
use crate::camera::{Camera, CameraKind, UpdateFlags};
use crate::config::CameraConfig;
use crate::environment::{Environment, FlatTerrain, FrameContext, Terrain};
use crate::controller::{ControllerContext, StateMap};
use super::*;

const EPS: f32 = 1e-3;

fn create_test_frame() -> FrameContext {
    FrameContext::new(1024.0, 768.0)
}

fn create_test_terrain() -> FlatTerrain {
    FlatTerrain::new(1024.0, 1024.0)
}

/// Overview controller after one update, with the camera at its pose
fn create_settled_overview(frame: &FrameContext, terrain: &FlatTerrain) -> (OverviewController, Camera) {
    let mut camera = Camera::new(CameraKind::Player, &CameraConfig::new());
    camera.update(UpdateFlags::all(), frame, terrain);

    let mut ov = OverviewController::new(&CameraConfig::new(), terrain.map_size());
    {
        let mut ctx = ControllerContext::new(&camera, Environment::new(frame, terrain), false);
        ov.update(&mut ctx);
    }

    camera.set_position(ov.base.position);
    camera.set_direction(ov.base.direction);
    camera.update(UpdateFlags::all(), frame, terrain);
    (ov, camera)
}

#[test]
fn test_overview_frames_whole_map() {
    let frame = create_test_frame();
    let terrain = create_test_terrain();
    let (ov, _camera) = create_settled_overview(&frame, &terrain);

    // 512 / (1024 / 768) < 512, so the map depth decides
    assert!((ov.base.position - Vec3::new(512.0, 1280.0, 512.0)).length() < EPS);
    assert!(ov.base.direction.y < -0.999);
    assert!(ov.rotation().x > 3.1);
}

#[test]
fn test_overview_height_follows_wide_maps() {
    let frame = FrameContext::new(400.0, 800.0);
    let terrain = FlatTerrain::new(2048.0, 512.0);
    let (ov, _camera) = create_settled_overview(&frame, &terrain);

    // aspect 0.5: 1024 / 0.5 = 2048
    assert!((ov.base.position.y - 2.5 * 2048.0).abs() < EPS);
}

#[test]
fn test_overview_hands_off_cursor_ground_point() {
    let frame = create_test_frame();
    let terrain = create_test_terrain();
    let (mut ov, camera) = create_settled_overview(&frame, &terrain);

    let frame = frame.with_mouse(1024.0 * 0.75, 768.0 * 0.5);
    let mut ctx = ControllerContext::new(&camera, Environment::new(&frame, &terrain), false);
    ov.update(&mut ctx);

    let target = ov.switch_from();
    assert!(target.y.abs() < EPS);
    assert!(target.x > 512.0 + 100.0);
    assert!((target - ov.cursor_target()).length() < 1e-6);
}

#[test]
fn test_overview_ignores_input() {
    let frame = create_test_frame();
    let terrain = create_test_terrain();
    let (mut ov, camera) = create_settled_overview(&frame, &terrain);
    let position = ov.base.position;

    let mut ctx = ControllerContext::new(&camera, Environment::new(&frame, &terrain), false);
    ov.key_move(Vec3::new(1.0, 1.0, 1.0), &mut ctx);
    ov.mouse_move(Vec3::new(10.0, 10.0, 1.0), &mut ctx);
    ov.mouse_wheel_move(-10.0, ctx.cursor_dir, &mut ctx);
    ov.set_position(Vec3::ZERO, &mut ctx);

    assert_eq!(ov.base.position, position);
    assert_eq!(ctx.take_transition(), None);
}

#[test]
fn test_overview_state_only_restores_fov() {
    let frame = create_test_frame();
    let terrain = create_test_terrain();
    let (mut ov, _camera) = create_settled_overview(&frame, &terrain);
    let position = ov.base.position;

    let mut sm = StateMap::default();
    sm.insert("fov".to_string(), 60.0);
    sm.insert("px".to_string(), 1.0);
    assert!(ov.set_state(&sm));

    assert_eq!(ov.base.fov, 60.0);
    assert_eq!(ov.base.position, position);
}
