//! Camera configuration store
//!
//! A name→scalar table with a fixed set of known keys. Every key has a default
//! and an allowed range; booleans and integers are stored as `f32` (`0`/`1` for
//! booleans). Controllers read the store at construction and again when the
//! handler forwards a "config changed" notification.

use rustc_hash::FxHashMap;
use crate::error::{Error, Result};

/// Description of one configuration key
#[derive(Debug, Clone, Copy)]
pub struct ConfigKey {
    pub name: &'static str,
    pub default: f32,
    pub min: f32,
    pub max: f32,
}

const fn key(name: &'static str, default: f32, min: f32, max: f32) -> ConfigKey {
    ConfigKey { name, default, min, max }
}

const fn flag(name: &'static str, default: bool) -> ConfigKey {
    ConfigKey { name, default: if default { 1.0 } else { 0.0 }, min: 0.0, max: 1.0 }
}

const UNBOUNDED: f32 = f32::MAX;

/// Every key understood by the camera subsystem
pub const CONFIG_KEYS: &[ConfigKey] = &[
    // camera movement input
    key("EdgeMoveWidth", 0.02, 0.0, 1.0),
    flag("EdgeMoveDynamic", true),
    key("CameraMoveFastMult", 10.0, 1.0, UNBOUNDED),
    key("CameraMoveSlowMult", 0.1, -UNBOUNDED, 1.0),
    flag("WindowedEdgeMove", true),
    flag("FullscreenEdgeMove", true),
    // handler
    key("CamMode", 2.0, 0.0, 5.0),
    key("CamTimeFactor", 1.0, 0.0, UNBOUNDED),
    key("CamTimeExponent", 4.0, 0.0, UNBOUNDED),
    // view range
    key("CamMinNearDistance", 0.5, 0.001, UNBOUNDED),
    key("CamMaxViewRange", 65536.0, 1.0, UNBOUNDED),
    // first person
    key("FPSScrollSpeed", 10.0, -UNBOUNDED, UNBOUNDED),
    key("FPSMouseScale", 0.01, -UNBOUNDED, UNBOUNDED),
    flag("FPSEnabled", true),
    key("FPSFOV", 45.0, 1.0, 179.0),
    flag("FPSClampPos", true),
    // overhead
    key("OverheadScrollSpeed", 10.0, -UNBOUNDED, UNBOUNDED),
    key("OverheadTiltSpeed", 1.0, -UNBOUNDED, UNBOUNDED),
    flag("OverheadEnabled", true),
    key("OverheadFOV", 45.0, 1.0, 179.0),
    key("OverheadMaxHeightFactor", 1.0, 0.1, 10.0),
    // spring
    flag("CamSpringEnabled", true),
    key("CamSpringScrollSpeed", 10.0, -UNBOUNDED, UNBOUNDED),
    key("CamSpringFOV", 45.0, 1.0, 179.0),
    key("CamSpringMinZoomDistance", 20.0, 0.0, UNBOUNDED),
    flag("CamSpringLockCardinalDirections", true),
    key("CamSpringCardinalLockWidth", 0.2, 0.0, 0.99),
    flag("CamSpringZoomInToMousePos", true),
    flag("CamSpringZoomOutFromMousePos", false),
    flag("CamSpringEdgeRotate", false),
    key("CamSpringFastScaleMouseMove", 0.3, 0.0, UNBOUNDED),
    key("CamSpringFastScaleMousewheelMove", 0.2, 0.0, UNBOUNDED),
    key("CamSpringTrackMapHeightMode", 1.0, 0.0, 2.0),
    // rotatable overhead
    key("RotOverheadMouseScale", 0.01, -UNBOUNDED, UNBOUNDED),
    key("RotOverheadScrollSpeed", 10.0, -UNBOUNDED, UNBOUNDED),
    flag("RotOverheadEnabled", true),
    key("RotOverheadFOV", 45.0, 1.0, 179.0),
    flag("RotOverheadClampMap", true),
    // overview
    flag("OverviewEnabled", true),
    key("OverviewFOV", 45.0, 1.0, 179.0),
    // dolly
    key("CamDollyFOV", 45.0, 1.0, 179.0),
];

/// Name→scalar configuration store
#[derive(Debug, Clone)]
pub struct CameraConfig {
    values: FxHashMap<&'static str, f32>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraConfig {
    /// Store populated with every key's default
    pub fn new() -> Self {
        let values = CONFIG_KEYS.iter().map(|k| (k.name, k.default)).collect();
        Self { values }
    }

    /// Definition of `name`, if known
    pub fn describe(name: &str) -> Option<&'static ConfigKey> {
        CONFIG_KEYS.iter().find(|k| k.name == name)
    }

    /// Value of a known key. Unknown keys read as `0.0`.
    pub fn get_float(&self, name: &str) -> f32 {
        self.values.get(name).copied().unwrap_or(0.0)
    }

    pub fn get_int(&self, name: &str) -> i32 {
        self.get_float(name) as i32
    }

    pub fn get_bool(&self, name: &str) -> bool {
        self.get_float(name) > 0.0
    }

    /// Set a key, clamping into its range. Returns the stored value.
    pub fn set(&mut self, name: &str, value: f32) -> Result<f32> {
        let desc = Self::describe(name)
            .ok_or_else(|| Error::UnknownConfigKey(name.to_string()))?;

        if value.is_nan() {
            return Err(Error::InvalidConfigValue {
                key: name.to_string(),
                value: value.to_string(),
            });
        }

        let clamped = value.clamp(desc.min, desc.max);
        self.values.insert(desc.name, clamped);
        Ok(clamped)
    }

    /// Set a key from its textual form (`"0.5"`, `"3"`, `"true"`, `"off"`...)
    pub fn set_str(&mut self, name: &str, text: &str) -> Result<f32> {
        let value = parse_value(text).ok_or_else(|| Error::InvalidConfigValue {
            key: name.to_string(),
            value: text.to_string(),
        })?;
        self.set(name, value)
    }

    /// Restore one key's default
    pub fn reset(&mut self, name: &str) -> Result<f32> {
        let desc = Self::describe(name)
            .ok_or_else(|| Error::UnknownConfigKey(name.to_string()))?;
        self.values.insert(desc.name, desc.default);
        Ok(desc.default)
    }
}

fn parse_value(text: &str) -> Option<f32> {
    let text = text.trim();
    match text.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" => return Some(1.0),
        "false" | "off" | "no" => return Some(0.0),
        _ => {}
    }
    text.parse::<f32>().ok().filter(|v| !v.is_nan())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
