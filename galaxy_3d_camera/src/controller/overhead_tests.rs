//! Unit tests for overhead.rs

use std::f32::consts::PI;
use glam::Vec3;
use crate::camera::{Camera, CameraKind, MoveState, UpdateFlags};
use crate::config::CameraConfig;
use crate::environment::{Environment, FlatTerrain, FrameContext, Terrain};
use crate::controller::{ControllerContext, ControllerMode, StateMap, SwitchSource};
use super::*;

const EPS: f32 = 1e-3;

fn create_test_frame() -> FrameContext {
    FrameContext::new(1024.0, 768.0)
}

fn create_test_terrain() -> FlatTerrain {
    FlatTerrain::new(1024.0, 1024.0)
}

fn create_test_camera(frame: &FrameContext, terrain: &FlatTerrain) -> Camera {
    let mut camera = Camera::new(CameraKind::Player, &CameraConfig::new());
    camera.update(UpdateFlags::all(), frame, terrain);
    camera
}

fn create_test_controller(terrain: &FlatTerrain) -> OverheadController {
    OverheadController::new(&CameraConfig::new(), terrain.map_size())
}

// ============================================================================
// Pose
// ============================================================================

#[test]
fn test_overhead_new_pose() {
    let ta = create_test_controller(&create_test_terrain());

    assert_eq!(ta.height(), 500.0);
    assert_eq!(ta.angle(), 0.464);
    assert!(!ta.flipped());

    let (sin, cos) = 0.464f32.sin_cos();
    assert!((ta.base.direction - Vec3::new(0.0, -cos, -sin)).length() < 1e-6);
    assert!((ta.base.position - (ta.focus() - ta.base.direction * 500.0)).length() < EPS);
}

#[test]
fn test_overhead_update_focus_on_ground() {
    let frame = create_test_frame();
    let terrain = create_test_terrain().with_level(25.0);
    let camera = create_test_camera(&frame, &terrain);
    let mut ta = create_test_controller(&terrain);

    let mut ctx = ControllerContext::new(&camera, Environment::new(&frame, &terrain), false);
    ta.update(&mut ctx);

    assert_eq!(ta.focus().y, 25.0);
    assert!((ta.base.position.y - (25.0 + 500.0 * 0.464f32.cos())).abs() < EPS);
    assert!(ta.base.pixel_size > 0.0);
}

#[test]
fn test_overhead_flipped_looks_south() {
    let mut ta = create_test_controller(&create_test_terrain());

    ta.set_flipped(true);
    assert!(ta.base.direction.z > 0.0);
    assert!(ta.base.position.z < ta.focus().z);
}

#[test]
fn test_overhead_set_rotation() {
    let mut ta = create_test_controller(&create_test_terrain());

    ta.set_rotation(Vec3::new(PI - 0.3, PI, 0.0));
    assert!((ta.angle() - 0.3).abs() < 1e-5);
    assert!(ta.flipped());

    ta.set_rotation(Vec3::new(0.2, 0.0, 0.0));
    assert!((ta.angle() - PI * 0.5 * 0.99).abs() < 1e-5);
    assert!(!ta.flipped());
}

// ============================================================================
// Input
// ============================================================================

#[test]
fn test_overhead_wheel_zooms_height() {
    let frame = create_test_frame();
    let terrain = create_test_terrain();
    let camera = create_test_camera(&frame, &terrain);
    let mut ta = create_test_controller(&terrain);

    let mut ctx = ControllerContext::new(&camera, Environment::new(&frame, &terrain), false);
    ta.mouse_wheel_move(10.0, ctx.cursor_dir, &mut ctx);

    assert!((ta.height() - 535.0).abs() < EPS);
    assert_eq!(ctx.take_transition(), Some(0.25));
}

#[test]
fn test_overhead_height_limits() {
    let frame = create_test_frame();
    let terrain = create_test_terrain();
    let camera = create_test_camera(&frame, &terrain);
    let mut ta = create_test_controller(&terrain);

    let mut ctx = ControllerContext::new(&camera, Environment::new(&frame, &terrain), false);
    ta.mouse_wheel_move(1000.0, ctx.cursor_dir, &mut ctx);
    assert!((ta.height() - 1024.0 * 1.25).abs() < EPS);

    ta.mouse_wheel_move(-1000.0, ctx.cursor_dir, &mut ctx);
    assert_eq!(ta.height(), 10.0);
}

#[test]
fn test_overhead_tilt_wheel() {
    let frame = create_test_frame();
    let terrain = create_test_terrain();
    let mut camera = create_test_camera(&frame, &terrain);
    camera.set_move_state(MoveState::TILT);
    let mut ta = create_test_controller(&terrain);

    let mut ctx = ControllerContext::new(&camera, Environment::new(&frame, &terrain), false);
    ta.mouse_wheel_move(100.0, ctx.cursor_dir, &mut ctx);
    assert!((ta.angle() - 0.564).abs() < 1e-5);
    assert_eq!(ta.height(), 500.0);
    assert_eq!(ctx.take_transition(), None);

    ta.mouse_wheel_move(100_000.0, ctx.cursor_dir, &mut ctx);
    assert!((ta.angle() - PI * 0.5 * 0.99).abs() < 1e-5);
}

#[test]
fn test_overhead_key_move_pans_focus() {
    let frame = create_test_frame();
    let terrain = create_test_terrain();
    let camera = create_test_camera(&frame, &terrain);
    let mut ta = create_test_controller(&terrain);

    let mut ctx = ControllerContext::new(&camera, Environment::new(&frame, &terrain), false);
    ta.update(&mut ctx);
    let start = ta.focus();

    ta.key_move(Vec3::new(0.01, 0.01, 1.0), &mut ctx);
    let moved = ta.focus() - start;
    assert!(moved.x > 0.0);
    assert!(moved.z < 0.0);

    ta.set_flipped(true);
    let start = ta.focus();
    ta.key_move(Vec3::new(0.01, 0.01, 1.0), &mut ctx);
    let moved = ta.focus() - start;
    assert!(moved.x < 0.0);
    assert!(moved.z > 0.0);
}

// ============================================================================
// Handoff / state
// ============================================================================

#[test]
fn test_overhead_switch_keeps_height() {
    let frame = create_test_frame();
    let terrain = create_test_terrain();
    let camera = create_test_camera(&frame, &terrain);
    let mut ta = create_test_controller(&terrain);

    let source = SwitchSource {
        mode: ControllerMode::FirstPerson,
        position: Vec3::new(300.0, 400.0, 600.0),
        rotation: Vec3::new(2.0, 0.0, 0.0),
        eye: Vec3::new(300.0, 400.0, 600.0),
    };
    let mut ctx = ControllerContext::new(&camera, Environment::new(&frame, &terrain), false);
    ta.switch_to(&source, false, &mut ctx);

    assert_eq!(ta.height(), 400.0);
    assert_eq!(ta.focus(), Vec3::new(300.0, 0.0, 600.0));
    assert_eq!(ta.switch_from(), ta.focus());
}

#[test]
fn test_overhead_switch_from_overview_keeps_zoom() {
    let frame = create_test_frame();
    let terrain = create_test_terrain();
    let camera = create_test_camera(&frame, &terrain);
    let mut ta = create_test_controller(&terrain);

    let source = SwitchSource {
        mode: ControllerMode::Overview,
        position: Vec3::new(300.0, 0.0, 600.0),
        rotation: Vec3::new(3.1, 0.0, 0.0),
        eye: Vec3::new(300.0, 0.0, 600.0),
    };
    let mut ctx = ControllerContext::new(&camera, Environment::new(&frame, &terrain), false);
    ta.switch_to(&source, false, &mut ctx);

    assert_eq!(ta.height(), 500.0);
    assert_eq!(ta.focus().x, 300.0);
}

#[test]
fn test_overhead_state_round_trip() {
    let terrain = create_test_terrain();
    let mut ta = create_test_controller(&terrain);
    ta.set_rotation(Vec3::new(PI - 0.7, PI, 0.0));

    let mut sm = StateMap::default();
    ta.get_state(&mut sm);
    assert_eq!(sm["flipped"], 1.0);
    assert_eq!(sm["height"], 500.0);

    let mut other = create_test_controller(&terrain);
    assert!(other.set_state(&sm));

    assert!(other.flipped());
    assert!((other.angle() - ta.angle()).abs() < 1e-6);
    assert!((other.focus().x - ta.focus().x).abs() < EPS);
    assert!((other.focus().z - ta.focus().z).abs() < EPS);
    assert!((other.base.position - ta.base.position).length() < EPS);
}

#[test]
fn test_overhead_switch_from_spring_takes_eye_height() {
    let frame = create_test_frame();
    let terrain = create_test_terrain();
    let camera = create_test_camera(&frame, &terrain);
    let mut ta = create_test_controller(&terrain);

    // spring hands over its ground focus, the eye sits above it
    let source = SwitchSource {
        mode: ControllerMode::Spring,
        position: Vec3::new(400.0, 0.0, 500.0),
        rotation: Vec3::new(2.5, 0.0, 0.0),
        eye: Vec3::new(400.0, 350.0, 780.0),
    };
    let mut ctx = ControllerContext::new(&camera, Environment::new(&frame, &terrain), false);
    ta.switch_to(&source, false, &mut ctx);

    assert!((ta.height() - 350.0).abs() < EPS);
    assert_eq!(ta.focus().x, 400.0);
    assert_eq!(ta.focus().z, 500.0);
}

#[test]
fn test_overhead_partial_state_keeps_focus() {
    let terrain = create_test_terrain();
    let mut ta = create_test_controller(&terrain);
    let focus = ta.focus();

    let mut sm = StateMap::default();
    sm.insert("height".to_string(), 100.0);
    assert!(ta.set_state(&sm));

    assert_eq!(ta.focus(), focus);
    assert_eq!(ta.height(), 100.0);
    assert!((ta.switch_from() - focus).length() < EPS);
    assert!((ta.base.position - (focus - ta.base.direction * 100.0)).length() < EPS);
}

#[test]
fn test_overhead_state_stores_focus() {
    let terrain = create_test_terrain();
    let ta = create_test_controller(&terrain);

    let mut sm = StateMap::default();
    ta.get_state(&mut sm);
    assert_eq!(sm["px"], ta.focus().x);
    assert_eq!(sm["py"], ta.focus().y);
    assert_eq!(sm["pz"], ta.focus().z);
}
