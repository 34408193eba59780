//! Unit tests for first_person.rs

use std::f32::consts::PI;
use glam::Vec3;
use crate::camera::{Camera, CameraKind, UpdateFlags};
use crate::config::CameraConfig;
use crate::environment::{Environment, FlatTerrain, FrameContext, Terrain};
use crate::controller::{ControllerContext, ControllerMode, StateMap, SwitchSource};
use super::*;

const EPS: f32 = 1e-4;

fn create_test_frame() -> FrameContext {
    FrameContext::new(1024.0, 768.0)
}

fn create_test_terrain() -> FlatTerrain {
    FlatTerrain::new(1024.0, 1024.0)
}

/// Default camera: facing +Z
fn create_test_camera(frame: &FrameContext, terrain: &FlatTerrain) -> Camera {
    let mut camera = Camera::new(CameraKind::Player, &CameraConfig::new());
    camera.update(UpdateFlags::all(), frame, terrain);
    camera
}

fn create_test_controller(terrain: &FlatTerrain) -> FirstPersonController {
    FirstPersonController::new(&CameraConfig::new(), terrain.map_size())
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_fps_new_defaults() {
    let fps = create_test_controller(&create_test_terrain());

    assert_eq!(fps.rotation(), Vec3::new(2.677, 0.0, 0.0));
    assert_eq!(fps.old_height(), 300.0);
    assert_eq!(fps.base.fov, 45.0);
    assert!((fps.base.scroll_speed - 1.0).abs() < EPS);
    assert!(fps.base.enabled);
}

// ============================================================================
// Input
// ============================================================================

#[test]
fn test_fps_key_move_follows_camera_forward() {
    let frame = create_test_frame();
    let terrain = create_test_terrain();
    let camera = create_test_camera(&frame, &terrain);
    let mut fps = create_test_controller(&terrain);
    let start = fps.base.position;

    let mut ctx = ControllerContext::new(&camera, Environment::new(&frame, &terrain), false);
    fps.key_move(Vec3::new(0.0, 0.01, 1.0), &mut ctx);

    assert!((fps.base.position - (start + Vec3::new(0.0, 0.0, 4.0))).length() < EPS);
    assert_eq!(fps.old_height(), 1000.0);
}

#[test]
fn test_fps_mouse_move_clamps_inclination() {
    let frame = create_test_frame();
    let terrain = create_test_terrain();
    let camera = create_test_camera(&frame, &terrain);
    let mut fps = create_test_controller(&terrain);

    let mut ctx = ControllerContext::new(&camera, Environment::new(&frame, &terrain), false);
    fps.mouse_move(Vec3::new(10.0, 20.0, 1.0), &mut ctx);
    assert!((fps.rotation().x - 2.877).abs() < 1e-5);
    assert!((fps.rotation().y - 0.1).abs() < 1e-6);

    fps.mouse_move(Vec3::new(0.0, 1000.0, 1.0), &mut ctx);
    assert!((fps.rotation().x - PI * 0.99).abs() < 1e-6);

    fps.mouse_move(Vec3::new(0.0, -1000.0, 1.0), &mut ctx);
    assert!((fps.rotation().x - 0.01).abs() < 1e-6);
    assert!((fps.base.direction - crate::utils::forward_from_rotation(fps.rotation())).length() < EPS);
}

#[test]
fn test_fps_update_keeps_eye_above_ground() {
    let frame = create_test_frame();
    let terrain = create_test_terrain();
    let camera = create_test_camera(&frame, &terrain);
    let mut fps = create_test_controller(&terrain);

    let mut ctx = ControllerContext::new(&camera, Environment::new(&frame, &terrain), false);
    fps.mouse_wheel_move(5000.0, Vec3::NEG_Y, &mut ctx);

    assert_eq!(fps.base.position.y, 5.0);
    assert_eq!(fps.old_height(), 5.0);
}

#[test]
fn test_fps_update_caps_height() {
    let frame = create_test_frame();
    let terrain = create_test_terrain();
    let camera = create_test_camera(&frame, &terrain);
    let mut fps = create_test_controller(&terrain);

    let mut ctx = ControllerContext::new(&camera, Environment::new(&frame, &terrain), false);
    fps.mouse_wheel_move(20000.0, Vec3::Y, &mut ctx);

    assert_eq!(fps.base.position.y, 9000.0);
}

#[test]
fn test_fps_update_clamps_to_map() {
    let frame = create_test_frame();
    let terrain = create_test_terrain();
    let camera = create_test_camera(&frame, &terrain);
    let mut fps = create_test_controller(&terrain);

    let mut ctx = ControllerContext::new(&camera, Environment::new(&frame, &terrain), false);
    fps.mouse_wheel_move(3000.0, Vec3::X, &mut ctx);

    assert!((fps.base.position.x - (1024.0 - 0.01)).abs() < EPS);
}

#[test]
fn test_fps_locked_skips_clamping() {
    let frame = create_test_frame();
    let terrain = create_test_terrain();
    let camera = create_test_camera(&frame, &terrain);
    let mut fps = create_test_controller(&terrain);

    let mut ctx = ControllerContext::new(&camera, Environment::new(&frame, &terrain), true);
    fps.mouse_wheel_move(5000.0, Vec3::NEG_Y, &mut ctx);

    assert_eq!(fps.base.position.y, -4000.0);
}

#[test]
fn test_fps_clamp_disabled_by_config() {
    let mut config = CameraConfig::new();
    config.set("FPSClampPos", 0.0).unwrap();

    let frame = create_test_frame();
    let terrain = create_test_terrain();
    let camera = create_test_camera(&frame, &terrain);
    let mut fps = FirstPersonController::new(&config, terrain.map_size());

    let mut ctx = ControllerContext::new(&camera, Environment::new(&frame, &terrain), false);
    fps.mouse_wheel_move(5000.0, Vec3::NEG_Y, &mut ctx);

    assert_eq!(fps.base.position.y, -4000.0);
}

// ============================================================================
// Pose / handoff
// ============================================================================

#[test]
fn test_fps_set_position_keeps_height_above_ground() {
    let frame = create_test_frame();
    let terrain = create_test_terrain().with_level(40.0);
    let camera = create_test_camera(&frame, &terrain);
    let mut fps = create_test_controller(&terrain);

    let mut ctx = ControllerContext::new(&camera, Environment::new(&frame, &terrain), false);
    fps.set_position(Vec3::new(100.0, 5.0, 200.0), &mut ctx);

    assert_eq!(fps.base.position, Vec3::new(100.0, 340.0, 200.0));
    assert!((fps.old_height() - 300.0).abs() < EPS);
}

#[test]
fn test_fps_switch_from_overview_takes_ground_point_only() {
    let frame = create_test_frame();
    let terrain = create_test_terrain();
    let camera = create_test_camera(&frame, &terrain);
    let mut fps = create_test_controller(&terrain);
    let rotation = fps.rotation();

    let source = SwitchSource {
        mode: ControllerMode::Overview,
        position: Vec3::new(100.0, 0.0, 300.0),
        rotation: Vec3::new(3.1, 0.0, 0.0),
        eye: Vec3::new(100.0, 0.0, 300.0),
    };
    let mut ctx = ControllerContext::new(&camera, Environment::new(&frame, &terrain), false);
    fps.switch_to(&source, false, &mut ctx);

    assert_eq!(fps.base.position, Vec3::new(100.0, 1000.0, 300.0));
    assert_eq!(fps.rotation(), rotation);
}

#[test]
fn test_fps_switch_takes_pose() {
    let frame = create_test_frame();
    let terrain = create_test_terrain();
    let camera = create_test_camera(&frame, &terrain);
    let mut fps = create_test_controller(&terrain);

    let source = SwitchSource {
        mode: ControllerMode::Spring,
        position: Vec3::new(100.0, 250.0, 300.0),
        rotation: Vec3::new(2.0, 0.5, 0.0),
        eye: Vec3::new(100.0, 250.0, 300.0),
    };
    let mut ctx = ControllerContext::new(&camera, Environment::new(&frame, &terrain), false);
    fps.switch_to(&source, true, &mut ctx);

    assert_eq!(fps.base.position, source.position);
    assert_eq!(fps.rotation(), source.rotation);
    assert_eq!(fps.switch_from(), source.position);
}

#[test]
fn test_fps_set_direction_round_trip() {
    let mut fps = create_test_controller(&create_test_terrain());
    let dir = Vec3::new(0.3, -0.5, 0.8).normalize();

    fps.set_direction(dir);
    let back = crate::utils::forward_from_rotation(fps.rotation());
    assert!((back - dir).length() < EPS);
}

// ============================================================================
// State
// ============================================================================

#[test]
fn test_fps_state_round_trip() {
    let terrain = create_test_terrain();
    let mut fps = create_test_controller(&terrain);
    fps.set_rotation(Vec3::new(2.2, 1.1, 0.0));

    let mut sm = StateMap::default();
    fps.get_state(&mut sm);
    assert_eq!(sm["oldHeight"], 300.0);
    assert_eq!(sm["rx"], 2.2);

    let mut other = create_test_controller(&terrain);
    assert!(other.set_state(&sm));
    assert_eq!(other.rotation(), fps.rotation());
    assert_eq!(other.base.position, fps.base.position);
    assert_eq!(other.base.direction, fps.base.direction);
}

#[test]
fn test_fps_state_missing_keys_keep_values() {
    let mut fps = create_test_controller(&create_test_terrain());
    let rotation = fps.rotation();

    let mut sm = StateMap::default();
    sm.insert("oldHeight".to_string(), 42.0);
    sm.insert("unknown".to_string(), 1.0);
    assert!(fps.set_state(&sm));

    assert_eq!(fps.old_height(), 42.0);
    assert_eq!(fps.rotation(), rotation);
}
