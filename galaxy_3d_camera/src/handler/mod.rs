//! Camera handler and transition blending

mod camera_handler;
mod transition;

pub use camera_handler::{CameraHandler, OLD_VIEW};
pub use transition::{CameraTransition, Pose};
