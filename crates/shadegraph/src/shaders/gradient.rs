//! Horizontal gray ramp.
use glam::Vec4;

use crate::shaders::{gray, Fragment, FrameUniforms};

/// Maps the fragment's pixel x position over the frame width to gray intensity.
#[inline]
pub fn gradient(frag: &Fragment, frame: &FrameUniforms) -> Vec4 {
    gray(frag.frag_coord.x / frame.resolution.x)
}
