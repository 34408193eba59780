//! GPU layout of the per-camera uniform block

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

/// Snapshot of one camera in std140-compatible layout.
///
/// Built by [`super::Camera::uniform`]; upload with `bytemuck::bytes_of`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view: Mat4,
    pub projection: Mat4,
    pub view_projection: Mat4,
    pub inverse_view: Mat4,
    pub inverse_projection: Mat4,
    pub inverse_view_projection: Mat4,
    /// Eye position (offset included), w = 1
    pub position: Vec4,
    /// View direction, w = 0
    pub forward: Vec4,
    /// near, far, vertical fov (degrees), aspect ratio
    pub params: Vec4,
}

impl CameraUniform {
    /// Size of the block in bytes
    pub const SIZE: usize = std::mem::size_of::<Self>();

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
