//! Pixel grid utilities for per-fragment evaluation.
//!
//! [`PixelGrid`] maps integer pixel indices to the [`Fragment`] inputs a pass sees.
//! Row `0` is the bottom row, matching the bottom-left `uv` origin.
use glam::Vec2;

use crate::shaders::{Fragment, FrameUniforms};

/// Output geometry of a rendered pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelGrid {
    /// Number of pixels in X.
    pub width: u32,
    /// Number of pixels in Y.
    pub height: u32,
}

impl PixelGrid {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total number of pixels.
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Resolution as a float vector, as passes receive it.
    pub fn resolution(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Size of one texel in normalized coordinates.
    pub fn texel_size(&self) -> Vec2 {
        Vec2::ONE / self.resolution()
    }

    /// Frame uniforms for this grid at the given time.
    pub fn uniforms(&self, time: f32) -> FrameUniforms {
        FrameUniforms::new(self.resolution(), time)
    }

    /// Fragment inputs at the center of pixel `(ix, iy)`.
    pub fn fragment(&self, ix: u32, iy: u32) -> Fragment {
        let frag_coord = Vec2::new(ix as f32 + 0.5, iy as f32 + 0.5);
        Fragment {
            uv: frag_coord / self.resolution(),
            frag_coord,
        }
    }

    /// Row-major index of pixel `(ix, iy)`.
    #[inline]
    pub fn index(&self, ix: u32, iy: u32) -> usize {
        iy as usize * self.width as usize + ix as usize
    }
}
