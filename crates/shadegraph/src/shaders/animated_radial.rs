//! Radial field drifting with time, tinted by a texture.
use glam::{Vec2, Vec4};

use crate::passgraph::Texture;
use crate::shaders::{centered_aspect, Fragment, FrameUniforms};

/// Offsets the aspect-corrected coordinate by `sin(time)` on both axes, takes its length
/// and multiplies it channel-wise with the texture color at `uv`. Alpha is forced to `1.0`.
pub fn animated_radial(frag: &Fragment, frame: &FrameUniforms, texture: &dyn Texture) -> Vec4 {
    let p = centered_aspect(frag.uv, frame) + Vec2::splat(frame.time.sin());
    let d = p.length();
    let tex = texture.sample(frag.uv);
    (tex.truncate() * d).extend(1.0)
}
