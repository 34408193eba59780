/*!
# Galaxy 3D Camera

Camera and view-frustum subsystem for the Galaxy 3D engine.

The crate keeps a fixed set of cameras, derives their view/projection
transforms and frustums, and lets interchangeable controllers drive the live
camera with time-based blending between them.

## Architecture

- **Camera**: pose, basis, matrices, frustum and frustum lines of one slot
- **CameraSet**: the fixed camera slots, with the culling mirror
- **CameraController**: closed set of control strategies (first-person,
  overhead, orbit, rotatable overhead, overview, dolly)
- **CameraHandler**: owns cameras and controllers, switches modes, blends
  transitions, saves and restores views
- **CameraConfig**: name→value settings read by all of the above

The application supplies terrain queries and per-frame facts through
[`galaxy3d::Environment`].
*/

// Internal modules
mod error;
pub mod log;
pub mod config;
pub mod environment;
pub mod utils;
pub mod camera;
pub mod controller;
pub mod handler;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Global logger hub
    pub use crate::log::Log;

    // Handler context object
    pub use crate::handler::{CameraHandler, CameraTransition, Pose, OLD_VIEW};

    // Settings and the outside world
    pub use crate::config::{CameraConfig, ConfigKey, CONFIG_KEYS};
    pub use crate::environment::{
        Environment, FlatTerrain, FrameContext, Terrain, UnitLocator, Viewport,
    };

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Camera sub-module
    pub mod camera {
        pub use crate::camera::*;
    }

    // Controller sub-module
    pub mod controller {
        pub use crate::controller::*;
    }

    // Math helpers
    pub mod utils {
        pub use crate::utils::{AABB, NurbsCurve};
        pub use crate::utils::angles;
    }
}

// Re-export math library at crate root
pub use glam;
