use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use glam::{Vec2, Vec4};
use rand::Rng;
use shadegraph::prelude::*;
use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber honoring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Writes a raster as an 8-bit RGBA PNG, top row first.
pub fn save_png(raster: &ColorRaster, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    let img = image::RgbaImage::from_raw(raster.width, raster.height, raster.to_rgba8_top_down())
        .context("raster size does not match its pixel data")?;
    img.save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!("Wrote {}.", path.display());
    Ok(())
}

/// An image file bound as a texture.
///
/// Rows are flipped on load so `uv.y = 0` samples the bottom of the picture, and
/// sampling is bilinear with repeat wrapping.
pub struct PngTexture {
    raster: ColorRaster,
}

impl PngTexture {
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?
            .to_rgba8();
        let (width, height) = img.dimensions();
        Self::from_rgba8(width, height, img.as_raw())
    }

    /// Builds a texture from tightly packed RGBA rows, top row first.
    pub fn from_rgba8(width: u32, height: u32, pixels: &[u8]) -> anyhow::Result<Self> {
        let mut raster = ColorRaster::from_rgba8_top_down(width, height, pixels)
            .with_context(|| format!("expected {} bytes of RGBA data", width * height * 4))?;
        raster.wrap = WrapMode::Repeat;
        raster.filter = FilterMode::Linear;
        Ok(Self { raster })
    }

    pub fn size(&self) -> (u32, u32) {
        self.raster.size()
    }

    pub fn into_raster(self) -> ColorRaster {
        self.raster
    }
}

impl Texture for PngTexture {
    fn sample(&self, uv: Vec2) -> Vec4 {
        self.raster.sample(uv)
    }

    fn dimensions(&self) -> Option<(u32, u32)> {
        Some(self.raster.size())
    }
}

/// A named set of PNG textures loaded from disk.
#[derive(Default)]
pub struct PngTextures {
    textures: HashMap<String, Arc<PngTexture>>,
}

impl PngTextures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_png(&mut self, id: &str, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let texture = PngTexture::open(path)?;
        let (w, h) = texture.size();
        tracing::info!("Loaded texture '{}' ({}x{}).", id, w, h);
        self.textures.insert(id.to_string(), Arc::new(texture));
        Ok(())
    }

    pub fn register_all_into(&self, registry: &mut TextureRegistry) {
        for (id, texture) in &self.textures {
            registry.register_arc(id.clone(), texture.clone());
        }
    }
}

/// Repeating two-color checkerboard with `cells` squares along each axis.
pub fn checkerboard(size: u32, cells: u32, a: Vec4, b: Vec4) -> ColorRaster {
    let cells = cells.max(1);
    let mut raster = ColorRaster::new(size, size);
    raster.wrap = WrapMode::Repeat;
    raster.filter = FilterMode::Nearest;
    for iy in 0..size {
        for ix in 0..size {
            let cx = ix * cells / size.max(1);
            let cy = iy * cells / size.max(1);
            raster.set(ix, iy, if (cx + cy) % 2 == 0 { a } else { b });
        }
    }
    raster
}

/// Opaque per-texel value noise, smoothed by bilinear sampling.
pub fn noise(size: u32, rng: &mut impl Rng) -> ColorRaster {
    let mut raster = ColorRaster::new(size, size);
    raster.wrap = WrapMode::Repeat;
    for iy in 0..size {
        for ix in 0..size {
            let v = Vec4::new(
                unit(rng.next_u32()),
                unit(rng.next_u32()),
                unit(rng.next_u32()),
                1.0,
            );
            raster.set(ix, iy, v);
        }
    }
    raster
}

/// Maps the top 24 bits of `bits` to `[0, 1)`; wider values round up to `1.0` in f32.
fn unit(bits: u32) -> f32 {
    (bits >> 8) as f32 / (1u32 << 24) as f32
}
