#![forbid(unsafe_code)]
//! shadegraph: CPU evaluation of procedural fragment passes wired by an explicit render graph.
//!
//! Modules:
//! - shaders: the per-pixel pass functions (gradient, radial field, distance rings, textured radial, box blur)
//! - passgraph: author, compile, cache, and evaluate graphs of passes and texture bindings
//! - render: frame configuration, runners, events, and fixed-rate sequences
//!
//! For examples, see the `shadegraph_examples` crate.
pub mod error;
pub mod passgraph;
pub mod render;
pub mod shaders;

/// Convenient re-exports for common types. Import with `use shadegraph::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::passgraph::cache::RenderProgramCache;
    pub use crate::passgraph::compiler::{CompileOptions, RenderGraphCompiler};
    pub use crate::passgraph::runtime::{BlurRadius, RenderRuntime};
    pub use crate::passgraph::{
        BoxBlurParams, CircleFieldParams, ColorRaster, FilterMode, PassId, PassSpec, PixelGrid,
        RenderGraph, RenderGraphSpec, SolidTexture, Texture, TextureRegistry, TextureSource,
        WrapMode,
    };
    pub use crate::render::{
        render_frame, render_frame_with_events, render_sequence, EventSink, FilterSink, FnSink,
        Frame, MultiSink, RenderConfig, RenderEvent, RenderEventKind, RenderRunner,
        SequenceConfig, VecSink,
    };
    pub use crate::shaders::{Fragment, FrameUniforms};
}
