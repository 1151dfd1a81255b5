//! Centered radial distance disc.
use glam::Vec4;

use crate::shaders::{centered_aspect, gray, Fragment, FrameUniforms};

/// Aspect-corrected distance from the frame center, broadcast to gray.
#[inline]
pub fn radial_field(frag: &Fragment, frame: &FrameUniforms) -> Vec4 {
    gray(centered_aspect(frag.uv, frame).length())
}
