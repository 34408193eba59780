//! Unit tests for controller/mod.rs

use glam::{Vec2, Vec3};
use crate::camera::{Camera, CameraKind, UpdateFlags};
use crate::config::CameraConfig;
use crate::environment::{Environment, FlatTerrain, FrameContext};
use crate::error::Error;
use super::*;

const MAP: Vec2 = Vec2::new(1024.0, 1024.0);

fn create_test_camera(frame: &FrameContext, terrain: &FlatTerrain) -> Camera {
    let mut camera = Camera::new(CameraKind::Player, &CameraConfig::new());
    camera.update(UpdateFlags::all(), frame, terrain);
    camera
}

// ============================================================================
// ControllerMode
// ============================================================================

#[test]
fn test_mode_indices() {
    assert_eq!(ControllerMode::ALL.len(), ControllerMode::COUNT);
    for (i, mode) in ControllerMode::ALL.iter().enumerate() {
        assert_eq!(mode.index(), i);
        assert_eq!(ControllerMode::from_index(i), Some(*mode));
    }
    assert_eq!(ControllerMode::from_index(ControllerMode::COUNT), None);
}

#[test]
fn test_mode_names() {
    assert_eq!(ControllerMode::FirstPerson.name(), "fps");
    assert_eq!(ControllerMode::Overhead.name(), "ta");
    assert_eq!(ControllerMode::Spring.name(), "spring");
    assert_eq!(ControllerMode::RotOverhead.name(), "rot");
    assert_eq!(ControllerMode::Overview.name(), "ov");
    assert_eq!(ControllerMode::Dolly.name(), "dolly");

    for mode in ControllerMode::ALL {
        assert_eq!(ControllerMode::from_name(mode.name()).unwrap(), mode);
    }
}

#[test]
fn test_mode_unknown_name() {
    match ControllerMode::from_name("free") {
        Err(Error::UnknownCameraMode(name)) => assert_eq!(name, "free"),
        other => panic!("unexpected result: {:?}", other),
    }
}

// ============================================================================
// CameraController
// ============================================================================

#[test]
fn test_controller_new_matches_mode() {
    let config = CameraConfig::new();
    for mode in ControllerMode::ALL {
        let controller = CameraController::new(mode, &config, MAP);
        assert_eq!(controller.mode(), mode);
        assert_eq!(controller.name(), mode.name());
        assert_eq!(controller.enabled(), mode != ControllerMode::Dummy);
    }
}

#[test]
fn test_controller_fov_from_config() {
    let mut config = CameraConfig::new();
    config.set("CamSpringFOV", 60.0).unwrap();
    config.set("OverheadEnabled", 0.0).unwrap();

    let spring = CameraController::new(ControllerMode::Spring, &config, MAP);
    assert_eq!(spring.fov(), 60.0);

    let mut overhead = CameraController::new(ControllerMode::Overhead, &CameraConfig::new(), MAP);
    assert!(overhead.enabled());
    overhead.config_update(&config);
    assert!(!overhead.enabled());
}

#[test]
fn test_controller_switch_source() {
    let controller = CameraController::new(ControllerMode::FirstPerson, &CameraConfig::new(), MAP);
    let source = controller.switch_source();

    assert_eq!(source.mode, ControllerMode::FirstPerson);
    assert_eq!(source.position, controller.position());
    assert_eq!(source.rotation, controller.rotation());
}

#[test]
fn test_controller_downcasts() {
    let config = CameraConfig::new();
    let mut spring = CameraController::new(ControllerMode::Spring, &config, MAP);
    let mut dolly = CameraController::new(ControllerMode::Dolly, &config, MAP);

    assert!(spring.as_spring().is_some());
    assert!(spring.as_dolly().is_none());
    assert!(spring.as_overhead_mut().is_none());
    assert!(dolly.as_dolly_mut().is_some());
    assert!(dolly.as_spring().is_none());
}

#[test]
fn test_controller_state_through_enum() {
    let config = CameraConfig::new();
    let mut controller = CameraController::new(ControllerMode::Spring, &config, MAP);

    let mut sm = StateMap::default();
    controller.get_state(&mut sm);
    assert!(sm.contains_key("dist"));

    sm.insert("rx".to_string(), 2.0);
    assert!(controller.set_state(&sm));
    assert_eq!(controller.rotation().x, 2.0);
}

#[test]
fn test_dummy_ignores_input() {
    let frame = FrameContext::new(1024.0, 768.0);
    let terrain = FlatTerrain::new(1024.0, 1024.0);
    let camera = create_test_camera(&frame, &terrain);
    let mut dummy = CameraController::new(ControllerMode::Dummy, &CameraConfig::new(), MAP);
    let position = dummy.position();

    let mut ctx = ControllerContext::new(&camera, Environment::new(&frame, &terrain), false);
    dummy.key_move(Vec3::new(1.0, 1.0, 1.0), &mut ctx);
    dummy.mouse_move(Vec3::new(5.0, 5.0, 1.0), &mut ctx);
    dummy.screen_edge_move(Vec3::new(1.0, 0.0, 1.0), &mut ctx);
    dummy.mouse_wheel_move(-10.0, Vec3::NEG_Y, &mut ctx);
    dummy.update(&mut ctx);

    assert_eq!(dummy.position(), position);
    assert_eq!(ctx.take_transition(), None);
}

// ============================================================================
// ControllerContext
// ============================================================================

#[test]
fn test_context_cursor_ray() {
    let frame = FrameContext::new(1024.0, 768.0);
    let terrain = FlatTerrain::new(1024.0, 1024.0);
    let camera = create_test_camera(&frame, &terrain);

    let ctx = ControllerContext::new(&camera, Environment::new(&frame, &terrain), false);
    assert!((ctx.cursor_dir - camera.forward()).length() < 1e-5);
    assert_eq!(ctx.map_size(), MAP);

    let expected = (22.5f32).to_radians().tan() * 2.0 / 768.0;
    assert!((ctx.pixel_scale() - expected).abs() < 1e-9);
}

#[test]
fn test_context_transition_request() {
    let frame = FrameContext::new(1024.0, 768.0);
    let terrain = FlatTerrain::new(1024.0, 1024.0);
    let camera = create_test_camera(&frame, &terrain);

    let mut ctx = ControllerContext::new(&camera, Environment::new(&frame, &terrain), false);
    assert_eq!(ctx.take_transition(), None);

    ctx.request_transition(0.25);
    ctx.request_transition(1.0);
    assert_eq!(ctx.take_transition(), Some(1.0));
    assert_eq!(ctx.take_transition(), None);
}
