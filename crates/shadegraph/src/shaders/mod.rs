//! Fragment passes evaluated once per pixel.
//!
//! Every pass is a pure function of a [`Fragment`], the per-frame [`FrameUniforms`],
//! its own parameters and, for textured passes, a bound [`crate::passgraph::Texture`].
//! Nothing here keeps state between invocations.
use glam::{Vec2, Vec4};

pub mod animated_radial;
pub mod box_blur;
pub mod circle_field;
pub mod gradient;
pub mod radial_field;

pub use animated_radial::animated_radial;
pub use box_blur::{box_blur, sample_radius};
pub use circle_field::circle_field;
pub use gradient::gradient;
pub use radial_field::radial_field;

/// Interpolated per-pixel inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fragment {
    /// Normalized surface coordinate in `[0, 1]`, origin at the bottom-left.
    pub uv: Vec2,
    /// Pixel-space position of the fragment center.
    pub frag_coord: Vec2,
}

impl Fragment {
    /// Builds a fragment from a normalized coordinate and the frame resolution.
    pub fn from_uv(uv: Vec2, resolution: Vec2) -> Self {
        Self {
            uv,
            frag_coord: uv * resolution,
        }
    }
}

/// Uniforms shared by every invocation within one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameUniforms {
    /// Output size in pixels.
    pub resolution: Vec2,
    /// Elapsed time in seconds.
    pub time: f32,
}

impl FrameUniforms {
    pub fn new(resolution: Vec2, time: f32) -> Self {
        Self { resolution, time }
    }

    /// Width over height. Falls back to `1.0` for a degenerate height.
    #[inline]
    pub fn aspect(&self) -> f32 {
        if self.resolution.y != 0.0 {
            self.resolution.x / self.resolution.y
        } else {
            1.0
        }
    }
}

/// Recenters `uv` to `[-0.5, 0.5]` and stretches x by the aspect ratio.
#[inline]
pub(crate) fn centered_aspect(uv: Vec2, frame: &FrameUniforms) -> Vec2 {
    let mut p = uv - Vec2::splat(0.5);
    p.x *= frame.aspect();
    p
}

/// GLSL `step`: `0.0` below `edge`, `1.0` otherwise.
#[inline]
pub(crate) fn step(edge: f32, x: f32) -> f32 {
    if x < edge {
        0.0
    } else {
        1.0
    }
}

/// GLSL `fract`: `x - floor(x)`.
#[inline]
pub(crate) fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Broadcasts a gray value to RGB with full opacity.
#[inline]
pub(crate) fn gray(v: f32) -> Vec4 {
    Vec4::new(v, v, v, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_matches_glsl_edge_semantics() {
        assert_eq!(step(0.4, 0.39), 0.0);
        assert_eq!(step(0.4, 0.4), 1.0);
        assert_eq!(step(0.4, 2.0), 1.0);
    }

    #[test]
    fn fract_is_positive_for_negative_inputs() {
        assert!((fract(-0.25) - 0.75).abs() < 1e-6);
        assert!((fract(1.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn centered_aspect_stretches_x_only() {
        let frame = FrameUniforms::new(Vec2::new(200.0, 100.0), 0.0);
        let p = centered_aspect(Vec2::new(1.0, 1.0), &frame);
        assert_eq!(p, Vec2::new(1.0, 0.5));
    }

    #[test]
    fn aspect_falls_back_for_zero_height() {
        let frame = FrameUniforms::new(Vec2::new(10.0, 0.0), 0.0);
        assert_eq!(frame.aspect(), 1.0);
    }
}
