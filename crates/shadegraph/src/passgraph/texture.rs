//! Texture traits and registry for pass inputs.
//!
//! This module defines how 2D color sources integrate into the render graph:
//! - Define custom sources by implementing [`Texture`].
//! - Manage instances with [`TextureRegistry`].
//! - Share filtering and wrapping between implementations via [`sample_texels`].
use std::collections::HashMap;
use std::sync::Arc;

use glam::{Vec2, Vec4};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

/// Trait for 2D color textures sampled at normalized coordinates.
/// `uv = (0, 0)` is the bottom-left corner, `(1, 1)` the top-right.
pub trait Texture: Send + Sync {
    fn sample(&self, uv: Vec2) -> Vec4;

    /// Size in texels, if the texture is backed by a grid.
    fn dimensions(&self) -> Option<(u32, u32)> {
        None
    }
}

/// How coordinates outside `[0, 1]` are resolved.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WrapMode {
    #[default]
    ClampToEdge,
    Repeat,
}

impl WrapMode {
    /// Maps a possibly out-of-range texel index into `[0, len)`.
    #[inline]
    pub fn resolve(self, i: i64, len: u32) -> u32 {
        let len = len as i64;
        match self {
            WrapMode::ClampToEdge => i.clamp(0, len - 1) as u32,
            WrapMode::Repeat => i.rem_euclid(len) as u32,
        }
    }
}

/// Texel filtering.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FilterMode {
    Nearest,
    #[default]
    Linear,
}

/// Samples a `width` x `height` texel grid at `uv`, fetching texels through `fetch`.
/// Texel centers sit at `(i + 0.5) / len`. Empty grids sample as transparent black.
pub fn sample_texels<F>(
    width: u32,
    height: u32,
    wrap: WrapMode,
    filter: FilterMode,
    uv: Vec2,
    fetch: F,
) -> Vec4
where
    F: Fn(u32, u32) -> Vec4,
{
    if width == 0 || height == 0 || !uv.is_finite() {
        return Vec4::ZERO;
    }

    // Beyond one period (or past the edge band) every uv samples the same texels,
    // and folding keeps the index casts below far from saturation.
    let uv = match wrap {
        WrapMode::ClampToEdge => uv.clamp(Vec2::splat(-1.0), Vec2::splat(2.0)),
        WrapMode::Repeat => uv.rem_euclid(Vec2::ONE),
    };
    let x = uv.x * width as f32;
    let y = uv.y * height as f32;

    match filter {
        FilterMode::Nearest => fetch(
            wrap.resolve(x.floor() as i64, width),
            wrap.resolve(y.floor() as i64, height),
        ),
        FilterMode::Linear => {
            let x = x - 0.5;
            let y = y - 0.5;
            let x0 = x.floor();
            let y0 = y.floor();
            let tx = x - x0;
            let ty = y - y0;

            let ix0 = wrap.resolve(x0 as i64, width);
            let ix1 = wrap.resolve((x0 as i64).saturating_add(1), width);
            let iy0 = wrap.resolve(y0 as i64, height);
            let iy1 = wrap.resolve((y0 as i64).saturating_add(1), height);

            let bottom = fetch(ix0, iy0).lerp(fetch(ix1, iy0), tx);
            let top = fetch(ix0, iy1).lerp(fetch(ix1, iy1), tx);
            bottom.lerp(top, ty)
        }
    }
}

/// A texture returning the same color everywhere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolidTexture {
    pub color: Vec4,
}

impl SolidTexture {
    pub fn new(color: Vec4) -> Self {
        Self { color }
    }
}

impl Texture for SolidTexture {
    #[inline]
    fn sample(&self, _uv: Vec2) -> Vec4 {
        self.color
    }
}

/// Registry for storing and managing textures by unique string identifiers.
#[non_exhaustive]
pub struct TextureRegistry {
    textures: HashMap<String, Arc<dyn Texture>>,
}

impl TextureRegistry {
    /// Creates a new, empty [`TextureRegistry`].
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
        }
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            textures: HashMap::with_capacity(n),
        }
    }

    /// Returns the number of registered textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Returns `true` if there are no registered textures.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Clears all registered textures.
    pub fn clear(&mut self) {
        self.textures.clear();
    }

    /// Registers a new texture with the given identifier, replacing any previous one.
    pub fn register<T>(&mut self, id: impl Into<String>, texture: T)
    where
        T: Texture + 'static,
    {
        self.textures.insert(id.into(), Arc::new(texture));
    }

    /// Registers a new texture with the given identifier using an [`Arc`].
    pub fn register_arc(&mut self, id: impl Into<String>, texture: Arc<dyn Texture + 'static>) {
        self.textures.insert(id.into(), texture);
    }

    /// Extends the registry with textures from another registry.
    pub fn extend_from(&mut self, other: &TextureRegistry) {
        for (k, v) in other.textures.iter() {
            self.textures.insert(k.clone(), v.clone());
        }
    }

    /// Unregisters a texture by its identifier. Returns `true` if the texture was found and removed.
    pub fn unregister(&mut self, id: &str) -> bool {
        self.textures.remove(id).is_some()
    }

    /// Checks if a texture with the given identifier exists in the registry.
    pub fn contains(&self, id: &str) -> bool {
        self.textures.contains_key(id)
    }

    /// Retrieves a texture by its identifier, returning an [`Arc`] to the texture if found.
    pub fn get(&self, id: &str) -> Option<Arc<dyn Texture>> {
        self.textures.get(id).cloned()
    }

    /// Like [`TextureRegistry::get`], but reports a missing id as [`Error::MissingTexture`].
    pub fn require(&self, id: &str) -> Result<Arc<dyn Texture>> {
        self.get(id)
            .ok_or_else(|| Error::MissingTexture { id: id.to_string() })
    }

    /// Samples the specified texture at `uv`. Unknown ids sample as transparent black.
    #[inline]
    pub fn sample(&self, texture_id: &str, uv: Vec2) -> Vec4 {
        if let Some(tex) = self.textures.get(texture_id) {
            tex.sample(uv)
        } else {
            warn!("Unknown texture id '{}'.", texture_id);
            Vec4::ZERO
        }
    }
}

impl Default for TextureRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_fetch(ix: u32, _iy: u32) -> Vec4 {
        Vec4::splat(ix as f32)
    }

    #[test]
    fn wrap_modes_resolve_out_of_range_indices() {
        assert_eq!(WrapMode::ClampToEdge.resolve(-3, 4), 0);
        assert_eq!(WrapMode::ClampToEdge.resolve(9, 4), 3);
        assert_eq!(WrapMode::Repeat.resolve(-1, 4), 3);
        assert_eq!(WrapMode::Repeat.resolve(9, 4), 1);
    }

    #[test]
    fn linear_filter_hits_texel_centers_exactly() {
        let uv = Vec2::new(2.5 / 4.0, 0.5);
        let v = sample_texels(4, 1, WrapMode::ClampToEdge, FilterMode::Linear, uv, ramp_fetch);
        assert!((v.x - 2.0).abs() < 1e-6);
    }

    #[test]
    fn linear_filter_interpolates_between_centers() {
        let uv = Vec2::new(2.0 / 4.0, 0.5);
        let v = sample_texels(4, 1, WrapMode::ClampToEdge, FilterMode::Linear, uv, ramp_fetch);
        assert!((v.x - 1.5).abs() < 1e-6);
    }

    #[test]
    fn nearest_filter_repeats_outside_unit_square() {
        let uv = Vec2::new(1.0 + 1.5 / 4.0, 0.5);
        let v = sample_texels(4, 1, WrapMode::Repeat, FilterMode::Nearest, uv, ramp_fetch);
        assert_eq!(v.x, 1.0);
    }

    #[test]
    fn huge_coordinates_sample_without_overflow() {
        let uv = Vec2::new(1e30, 0.5);
        for wrap in [WrapMode::ClampToEdge, WrapMode::Repeat] {
            for filter in [FilterMode::Linear, FilterMode::Nearest] {
                let v = sample_texels(4, 4, wrap, filter, uv, ramp_fetch);
                assert!(v.is_finite(), "{wrap:?} {filter:?}: {v}");
            }
        }

        let clamped = sample_texels(4, 1, WrapMode::ClampToEdge, FilterMode::Linear, uv, ramp_fetch);
        assert_eq!(clamped.x, 3.0);
    }

    #[test]
    fn repeat_is_periodic_in_uv() {
        let a = sample_texels(4, 1, WrapMode::Repeat, FilterMode::Linear, Vec2::new(0.3, 0.5), ramp_fetch);
        let b = sample_texels(4, 1, WrapMode::Repeat, FilterMode::Linear, Vec2::new(-2.7, 0.5), ramp_fetch);
        assert!((a - b).abs().max_element() < 1e-5, "{a} != {b}");
    }

    #[test]
    fn empty_grid_samples_transparent_black() {
        let v = sample_texels(0, 4, WrapMode::Repeat, FilterMode::Linear, Vec2::ZERO, ramp_fetch);
        assert_eq!(v, Vec4::ZERO);
    }

    #[test]
    fn registry_tracks_registrations() {
        let mut registry = TextureRegistry::new();
        assert!(registry.is_empty());
        registry.register("white", SolidTexture::new(Vec4::ONE));
        assert!(registry.contains("white"));
        assert_eq!(registry.sample("white", Vec2::ZERO), Vec4::ONE);

        let mut other = TextureRegistry::with_capacity(1);
        other.extend_from(&registry);
        assert_eq!(other.len(), 1);

        assert!(registry.unregister("white"));
        assert!(!registry.unregister("white"));
        assert_eq!(registry.sample("white", Vec2::ZERO), Vec4::ZERO);
    }

    #[test]
    fn require_reports_missing_textures() {
        let registry = TextureRegistry::default();
        let err = registry.require("albedo").err().expect("missing texture");
        assert!(matches!(err, Error::MissingTexture { ref id } if id == "albedo"));
    }
}
