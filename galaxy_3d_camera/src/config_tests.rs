//! Unit tests for config.rs

use crate::config::{CameraConfig, CONFIG_KEYS};
use crate::error::Error;

// ============================================================================
// DEFAULTS
// ============================================================================

#[test]
fn test_defaults_loaded() {
    let config = CameraConfig::new();
    assert_eq!(config.get_float("EdgeMoveWidth"), 0.02);
    assert!(config.get_bool("EdgeMoveDynamic"));
    assert_eq!(config.get_float("CameraMoveFastMult"), 10.0);
    assert_eq!(config.get_float("CameraMoveSlowMult"), 0.1);
    assert_eq!(config.get_float("CamTimeFactor"), 1.0);
    assert_eq!(config.get_float("CamTimeExponent"), 4.0);
    assert_eq!(config.get_int("CamMode"), 2);
    assert!(!config.get_bool("CamSpringZoomOutFromMousePos"));
}

#[test]
fn test_defaults_within_range() {
    for k in CONFIG_KEYS {
        assert!(k.default >= k.min && k.default <= k.max, "{} default out of range", k.name);
    }
}

#[test]
fn test_unknown_key_reads_zero() {
    let config = CameraConfig::new();
    assert_eq!(config.get_float("NoSuchKey"), 0.0);
    assert!(!config.get_bool("NoSuchKey"));
}

// ============================================================================
// SET
// ============================================================================

#[test]
fn test_set_clamps_into_range() {
    let mut config = CameraConfig::new();
    assert_eq!(config.set("CamSpringTrackMapHeightMode", 7.0), Ok(2.0));
    assert_eq!(config.get_int("CamSpringTrackMapHeightMode"), 2);
    assert_eq!(config.set("CameraMoveFastMult", 0.2), Ok(1.0));
}

#[test]
fn test_set_unknown_key_fails() {
    let mut config = CameraConfig::new();
    assert_eq!(
        config.set("Bogus", 1.0),
        Err(Error::UnknownConfigKey("Bogus".to_string()))
    );
}

#[test]
fn test_set_nan_rejected() {
    let mut config = CameraConfig::new();
    assert!(config.set("CamTimeFactor", f32::NAN).is_err());
    assert_eq!(config.get_float("CamTimeFactor"), 1.0);
}

#[test]
fn test_set_str_parses_numbers_and_flags() {
    let mut config = CameraConfig::new();
    assert_eq!(config.set_str("CamTimeFactor", " 2.5 "), Ok(2.5));
    assert_eq!(config.set_str("EdgeMoveDynamic", "false"), Ok(0.0));
    assert!(!config.get_bool("EdgeMoveDynamic"));
    assert_eq!(config.set_str("FPSClampPos", "ON"), Ok(1.0));
}

#[test]
fn test_set_str_rejects_garbage() {
    let mut config = CameraConfig::new();
    let err = config.set_str("CamTimeFactor", "quick").unwrap_err();
    assert!(matches!(err, Error::InvalidConfigValue { .. }));
    assert_eq!(config.get_float("CamTimeFactor"), 1.0);
}

#[test]
fn test_reset_restores_default() {
    let mut config = CameraConfig::new();
    config.set("CamSpringFOV", 90.0).unwrap();
    assert_eq!(config.reset("CamSpringFOV"), Ok(45.0));
    assert_eq!(config.get_float("CamSpringFOV"), 45.0);
}
