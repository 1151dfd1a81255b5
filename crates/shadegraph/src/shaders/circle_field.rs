//! Thresholded distance-field rings.
//!
//! The field is the distance to a center that bobs vertically with `sin(time)`,
//! scaled by a repeating horizontal ramp and cut at [`RING_THRESHOLD`]. The result
//! is a hard mask. The pass declares no texture input: multiplying the mask by a
//! sampled texture is left disabled.
use glam::{Vec2, Vec4};

use crate::passgraph::CircleFieldParams;
use crate::shaders::{centered_aspect, fract, gray, step, Fragment, FrameUniforms};

/// Cut-off applied to the ramped distance.
pub const RING_THRESHOLD: f32 = 0.4;

/// Evaluates the ring mask for one fragment.
pub fn circle_field(frag: &Fragment, frame: &FrameUniforms, params: &CircleFieldParams) -> Vec4 {
    let p = centered_aspect(frag.uv, frame);
    let d = Vec2::new(p.x, p.y - params.amplitude * frame.time.sin()).length();
    let ramp = fract(frag.uv.x * params.ramp_frequency);
    gray(step(RING_THRESHOLD, d * ramp))
}
