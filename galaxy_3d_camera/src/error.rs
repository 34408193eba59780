//! Error types for the Galaxy3D camera subsystem
//!
//! The camera path never panics on user or script input. Validation helpers
//! (configuration parsing, curve validation, mode lookup) return these errors,
//! and the handler turns them into boolean failures at its boundary.

use std::fmt;

/// Result type for camera operations
pub type Result<T> = std::result::Result<T, Error>;

/// Camera subsystem errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration key not present in the camera configuration table
    UnknownConfigKey(String),

    /// Configuration value could not be parsed for the given key
    InvalidConfigValue { key: String, value: String },

    /// Camera mode name or index does not name a controller
    UnknownCameraMode(String),

    /// NURBS curve definition rejected (degree, knots, control points)
    InvalidCurve(String),

    /// No saved view under this name
    UnknownView(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownConfigKey(key) => write!(f, "Unknown config key: {}", key),
            Error::InvalidConfigValue { key, value } => {
                write!(f, "Invalid value '{}' for config key {}", value, key)
            }
            Error::UnknownCameraMode(mode) => write!(f, "Unknown camera mode: {}", mode),
            Error::InvalidCurve(msg) => write!(f, "Invalid curve: {}", msg),
            Error::UnknownView(name) => write!(f, "Unknown view: {}", name),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
