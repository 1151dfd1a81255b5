//! Unweighted box filter over a prior pass.
//!
//! The neighborhood radius is `floor(blur_amount * 10)` texels and the filter reads
//! `(2r + 1)^2` samples per fragment, so cost grows quadratically with the amount.
//! Bounding it is the caller's decision; see
//! [`crate::render::RenderConfig::with_max_blur_radius`].
use glam::{Vec2, Vec4};

use crate::passgraph::Texture;
use crate::shaders::{Fragment, FrameUniforms};

/// Texels of radius per unit of blur amount.
pub const RADIUS_PER_AMOUNT: f32 = 10.0;

/// Integer sample radius for a blur amount. Negative and NaN amounts map to `0`.
#[inline]
pub fn sample_radius(blur_amount: f32) -> u32 {
    let r = (blur_amount * RADIUS_PER_AMOUNT).floor();
    if r > 0.0 {
        r as u32
    } else {
        0
    }
}

/// Number of samples read for a given radius.
#[inline]
pub fn sample_count(radius: u32) -> u64 {
    let side = 2 * radius as u64 + 1;
    side * side
}

/// Averages `source` over the square neighborhood of `radius` texels around `frag.uv`,
/// inclusive on both axes, stepping one texel of the frame resolution at a time.
pub fn box_blur(
    frag: &Fragment,
    frame: &FrameUniforms,
    radius: u32,
    source: &dyn Texture,
) -> Vec4 {
    let texel = Vec2::ONE / frame.resolution;
    let r = radius as i64;

    let mut sum = Vec4::ZERO;
    for y in -r..=r {
        for x in -r..=r {
            let offset = Vec2::new(x as f32, y as f32) * texel;
            sum += source.sample(frag.uv + offset);
        }
    }

    sum / sample_count(radius) as f32
}
