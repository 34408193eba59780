//! Fixed set of camera slots
//!
//! One [`Camera`] per [`CameraKind`], created once and mutated in place.
//! Exactly one slot is active at a time. The visibility-culling slot is never
//! rebuilt on its own: every frustum rebuild of another slot is mirrored into it.

use crate::config::CameraConfig;
use crate::environment::{FrameContext, Terrain};
use super::camera::{Camera, CameraKind, UpdateFlags};

#[derive(Debug, Clone)]
pub struct CameraSet {
    cameras: [Camera; CameraKind::COUNT],
    active: CameraKind,
}

impl CameraSet {
    /// All slots, with the player camera active
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            cameras: CameraKind::ALL.map(|kind| Camera::new(kind, config)),
            active: CameraKind::Player,
        }
    }

    pub fn get(&self, kind: CameraKind) -> &Camera {
        &self.cameras[kind.index()]
    }

    pub fn get_mut(&mut self, kind: CameraKind) -> &mut Camera {
        &mut self.cameras[kind.index()]
    }

    pub fn active_kind(&self) -> CameraKind {
        self.active
    }

    pub fn active(&self) -> &Camera {
        self.get(self.active)
    }

    pub fn active_mut(&mut self) -> &mut Camera {
        self.get_mut(self.active)
    }

    pub fn set_active(&mut self, kind: CameraKind) {
        self.active = kind;
    }

    pub fn iter(&self) -> impl Iterator<Item = &Camera> {
        self.cameras.iter()
    }

    /// Update one slot, then refresh the culling mirror when its frustum
    /// was rebuilt.
    pub fn update(
        &mut self,
        kind: CameraKind,
        flags: UpdateFlags,
        frame: &FrameContext,
        terrain: &dyn Terrain,
    ) {
        self.cameras[kind.index()].update(flags, frame, terrain);

        if flags.contains(UpdateFlags::FRUSTUM) && kind != CameraKind::VisibilityCulling {
            let (sources, mirror) = self
                .cameras
                .split_at_mut(CameraKind::VisibilityCulling.index());
            mirror[0].copy_state(&sources[kind.index()]);
        }
    }

    /// Mirror the player camera below the water plane into the reflection slot
    pub fn update_reflection(&mut self, frame: &FrameContext, terrain: &dyn Terrain) {
        let (head, tail) = self
            .cameras
            .split_at_mut(CameraKind::UnderwaterReflection.index());
        tail[0].copy_state_reflect(&head[CameraKind::Player.index()]);

        self.update(
            CameraKind::UnderwaterReflection,
            UpdateFlags::MATRICES | UpdateFlags::VIEWPORT | UpdateFlags::FRUSTUM,
            frame,
            terrain,
        );
    }

    /// Forward new configuration values to every slot
    pub fn config_update(&mut self, config: &CameraConfig) {
        for camera in &mut self.cameras {
            camera.config_update(config);
        }
    }
}

#[cfg(test)]
#[path = "camera_set_tests.rs"]
mod tests;
