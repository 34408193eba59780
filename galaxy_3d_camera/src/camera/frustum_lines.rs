//! Ground-plane projections of the frustum side planes.
//!
//! Each side plane is cut by a horizontal plane at the map's minimum or
//! maximum height. The cut is stored as `x = base + dir·z` in world X/Z,
//! together with the Z range over which it bounds the visible area. The
//! shadow pass uses the clipped lines to fit its orthographic frustum to
//! what the main view can actually see.

use glam::Vec4;
use crate::utils::intersect_planes;
use super::frustum::{PLANE_BOTTOM, PLANE_LEFT, PLANE_RIGHT, PLANE_TOP};

/// Group of lines running right-to-left (`sign == -1`)
pub const FRUSTUM_SIDE_POS: usize = 0;
/// Group of lines running left-to-right (`sign == 1`), or every line when requested
pub const FRUSTUM_SIDE_NEG: usize = 1;

/// Lower bound on `|direction.z|` before computing the slope
const MIN_DIR_Z: f32 = 0.0001;

/// One side-plane cut
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrustumLine {
    /// `1` when the cut runs toward -Z, `-1` otherwise
    pub sign: i32,
    /// X at z = 0, divided by the caller's scale
    pub base: f32,
    /// dX / dZ
    pub dir: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl FrustumLine {
    /// X coordinate (in scaled units) at `z`
    pub fn x_at(&self, z: f32) -> f32 {
        self.base + self.dir * z
    }
}

/// Frustum lines split into the positive and negative groups
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrustumLines {
    lines: [[FrustumLine; 4]; 2],
    counts: [usize; 2],
}

impl FrustumLines {
    /// Lines stored in `side` ([`FRUSTUM_SIDE_POS`] or [`FRUSTUM_SIDE_NEG`])
    pub fn lines(&self, side: usize) -> &[FrustumLine] {
        &self.lines[side][..self.counts[side]]
    }

    pub fn count(&self, side: usize) -> usize {
        self.counts[side]
    }

    /// Rebuild from the four side planes.
    ///
    /// `min_y`/`max_y` are the map height range, `scale` divides the stored
    /// `base`, `map_depth` is the world Z extent of the map. With `neg` every
    /// line lands in the negative group.
    pub fn calc(
        &mut self,
        planes: &[Vec4; 6],
        min_y: f32,
        max_y: f32,
        scale: f32,
        neg: bool,
        map_depth: f32,
    ) {
        self.counts = [0; 2];

        for face in [PLANE_LEFT, PLANE_RIGHT, PLANE_BOTTOM, PLANE_TOP] {
            self.calc_line(planes[face], min_y, max_y, scale, neg, map_depth);
        }

        debug_assert!(!neg || self.counts[FRUSTUM_SIDE_NEG] <= 4);
    }

    fn calc_line(&mut self, face: Vec4, min_y: f32, max_y: f32, scale: f32, neg: bool, map_depth: f32) {
        let height = if face.y > 0.0 { max_y } else { min_y };
        let xz_plane = Vec4::new(0.0, 1.0, 0.0, -height);

        let Some((mut xdir, point)) = intersect_planes(xz_plane, face) else {
            return;
        };

        if xdir.z.abs() <= MIN_DIR_Z {
            xdir.z = MIN_DIR_Z.copysign(xdir.z);
        }

        let margin = map_depth / 8.0;
        let dir = xdir.x / xdir.z;
        let line = FrustumLine {
            sign: if xdir.z <= 0.0 { 1 } else { -1 },
            dir,
            base: (point.x - point.z * dir) / scale,
            min_z: -margin,
            max_z: map_depth + margin,
        };

        let side = if line.sign == 1 || neg { FRUSTUM_SIDE_NEG } else { FRUSTUM_SIDE_POS };
        let count = &mut self.counts[side];
        if *count < 4 {
            self.lines[side][*count] = line;
            *count += 1;
        }
    }

    /// Narrow each line's Z range to where the other lines of the same group
    /// cross it. Parallel lines are skipped.
    pub fn clip(&mut self, z_min: f32, z_max: f32, neg: bool) {
        let side = if neg { FRUSTUM_SIDE_NEG } else { FRUSTUM_SIDE_POS };
        let count = self.counts[side];
        let lines = &mut self.lines[side];

        for i in 0..count {
            for j in 0..count {
                if i == j {
                    continue;
                }

                let other = lines[j];
                let line = &mut lines[i];

                let ddir = line.dir - other.dir;
                if ddir == 0.0 {
                    continue;
                }

                let colz = -((line.base - other.base) / ddir);

                if (other.sign as f32) * ddir > 0.0 {
                    if colz > line.min_z && colz < z_max {
                        line.min_z = colz;
                    }
                } else if colz > z_min && colz < line.max_z {
                    line.max_z = colz;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "frustum_lines_tests.rs"]
mod tests;
