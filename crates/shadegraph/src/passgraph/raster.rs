//! Raster storage for rendered pass outputs.
//!
//! A [`ColorRaster`] holds one RGBA value per pixel, bottom row first. It doubles as a
//! [`Texture`] so a later pass can read it through a render-graph edge.
use glam::{Vec2, Vec4};

use super::grid::PixelGrid;
use super::texture::{sample_texels, FilterMode, Texture, WrapMode};

/// A grid of linear RGBA colors.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorRaster {
    pub width: u32,
    pub height: u32,
    pub data: Vec<Vec4>,
    /// Wrap mode used when sampled as a texture.
    pub wrap: WrapMode,
    /// Filter used when sampled as a texture.
    pub filter: FilterMode,
}

impl ColorRaster {
    /// Create a new raster initialized to transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Vec4::ZERO)
    }

    /// Create a new raster with every pixel set to `color`.
    pub fn filled(width: u32, height: u32, color: Vec4) -> Self {
        Self {
            width,
            height,
            data: vec![color; width as usize * height as usize],
            wrap: WrapMode::ClampToEdge,
            filter: FilterMode::Linear,
        }
    }

    /// Create a raster sized to `grid`.
    pub fn for_grid(grid: &PixelGrid) -> Self {
        Self::new(grid.width, grid.height)
    }

    /// Get the size of the raster as `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Get the color at the given pixel, returning transparent black if out of bounds.
    pub fn get(&self, ix: u32, iy: u32) -> Vec4 {
        if ix >= self.width || iy >= self.height {
            return Vec4::ZERO;
        }
        self.data[iy as usize * self.width as usize + ix as usize]
    }

    /// Set the color at the given pixel. Out-of-bounds writes are ignored.
    pub fn set(&mut self, ix: u32, iy: u32, color: Vec4) {
        if ix >= self.width || iy >= self.height {
            return;
        }
        self.data[iy as usize * self.width as usize + ix as usize] = color;
    }

    /// Build a raster from 8-bit RGBA rows stored top row first, as image files are.
    /// Returns `None` when `pixels` does not hold exactly `width * height * 4` bytes.
    pub fn from_rgba8_top_down(width: u32, height: u32, pixels: &[u8]) -> Option<Self> {
        let row = width as usize * 4;
        if pixels.len() != row * height as usize {
            return None;
        }

        let mut raster = Self::new(width, height);
        for (src_y, src_row) in pixels.chunks_exact(row.max(1)).enumerate() {
            let iy = height - 1 - src_y as u32;
            for (ix, px) in src_row.chunks_exact(4).enumerate() {
                let color = Vec4::new(
                    px[0] as f32 / 255.0,
                    px[1] as f32 / 255.0,
                    px[2] as f32 / 255.0,
                    px[3] as f32 / 255.0,
                );
                raster.set(ix as u32, iy, color);
            }
        }
        Some(raster)
    }

    /// Quantize to 8-bit RGBA, top row first. Values are clamped to `[0, 1]`.
    pub fn to_rgba8_top_down(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() * 4);
        for iy in (0..self.height).rev() {
            for ix in 0..self.width {
                let c = self.get(ix, iy);
                for ch in c.to_array() {
                    out.push(quantize(ch));
                }
            }
        }
        out
    }
}

#[inline]
fn quantize(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl Texture for ColorRaster {
    fn sample(&self, uv: Vec2) -> Vec4 {
        sample_texels(self.width, self.height, self.wrap, self.filter, uv, |ix, iy| {
            self.get(ix, iy)
        })
    }

    fn dimensions(&self) -> Option<(u32, u32)> {
        Some((self.width, self.height))
    }
}
