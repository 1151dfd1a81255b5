//! Render graph subsystem for wiring fragment passes together.
//!
//! This module groups types for authoring a directed acyclic graph of passes, where an
//! edge means one pass samples another pass's output as a texture, compiling it into an
//! executable program, and evaluating it over a pixel grid at runtime.
pub mod cache;
pub mod compiler;
pub mod grid;
pub mod pass;
pub mod program;
pub mod raster;
pub mod runtime;
pub mod spec;
pub mod texture;

pub use grid::PixelGrid;
pub use pass::{BoxBlurParams, CircleFieldParams, PassSpec, TextureSource};
pub use program::{PassMeta, RenderProgram};
pub use raster::ColorRaster;
pub use spec::{RenderGraph, RenderGraphSpec};
pub use texture::{sample_texels, FilterMode, SolidTexture, Texture, TextureRegistry, WrapMode};

pub type PassId = String;
