//! High-level runner for rendering frames of a render graph.
use std::sync::Arc;

use glam::UVec2;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::passgraph::cache::RenderProgramCache;
use crate::passgraph::compiler::CompileOptions;
use crate::passgraph::runtime::RenderRuntime;
use crate::passgraph::{ColorRaster, PassId, PassSpec, PixelGrid, RenderGraph, TextureRegistry};
use crate::render::events::{EventSink, RenderEvent, RenderEventKind};
use crate::render::sequence::{render_sequence, SequenceConfig};

/// Default output width in pixels.
pub const DEFAULT_WIDTH: u32 = 1920;
/// Default output height in pixels.
pub const DEFAULT_HEIGHT: u32 = 1080;

/// Configuration for rendering a frame.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Output size in pixels.
    pub resolution: UVec2,
    /// Time uniform in seconds.
    pub time: f32,
    /// Upper bound for box-blur sample radii. `None` leaves radii unbounded.
    pub max_blur_radius: Option<u32>,
    /// Options forwarded to the graph compiler.
    pub compile_options: CompileOptions,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            resolution: UVec2::new(DEFAULT_WIDTH, DEFAULT_HEIGHT),
            time: 0.0,
            max_blur_radius: None,
            compile_options: CompileOptions::default(),
        }
    }
}

impl RenderConfig {
    /// Creates a new [`RenderConfig`] with the specified output size.
    pub fn new(resolution: impl Into<mint::Vector2<u32>>) -> Self {
        Self {
            resolution: UVec2::from(resolution.into()),
            ..Default::default()
        }
    }

    /// Sets the time uniform.
    pub fn with_time(mut self, time: f32) -> Self {
        self.time = time;
        self
    }

    /// Bounds box-blur sample radii.
    pub fn with_max_blur_radius(mut self, max_blur_radius: Option<u32>) -> Self {
        self.max_blur_radius = max_blur_radius;
        self
    }

    /// Sets the compile options.
    pub fn with_compile_options(mut self, compile_options: CompileOptions) -> Self {
        self.compile_options = compile_options;
        self
    }

    /// Pixel grid the passes are evaluated on.
    pub fn grid(&self) -> PixelGrid {
        PixelGrid::new(self.resolution.x, self.resolution.y)
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.resolution.x == 0 || self.resolution.y == 0 {
            return Err(Error::InvalidConfig(
                "resolution must be > 0 in both components".into(),
            ));
        }
        if !self.time.is_finite() {
            return Err(Error::InvalidConfig("time must be finite".into()));
        }

        Ok(())
    }
}

/// A rendered frame.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct Frame {
    /// Frame index within a sequence; `0` for single frames.
    pub index: u64,
    /// Time uniform the frame was rendered at.
    pub time: f32,
    /// The output pass.
    pub output: PassId,
    /// Output pixels, bottom row first.
    pub raster: Arc<ColorRaster>,
    /// Number of passes evaluated for this frame.
    pub passes_rendered: usize,
}

impl Frame {
    /// Output pixels as 8-bit RGBA, top row first.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.raster.to_rgba8_top_down()
    }
}

pub struct RenderRunner<'a> {
    /// Render configuration applied to this runner.
    pub config: RenderConfig,
    /// Shared texture registry bound to external texture slots.
    pub textures: &'a TextureRegistry,
    /// Program cache used to reuse compiled render graphs.
    pub cache: &'a RenderProgramCache,
}

impl<'a> RenderRunner<'a> {
    pub fn try_new(
        config: RenderConfig,
        textures: &'a TextureRegistry,
        cache: &'a RenderProgramCache,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            textures,
            cache,
        })
    }

    /// Renders one frame of `graph` at the configured time.
    pub fn render(&self, graph: &RenderGraph) -> Result<Frame> {
        render_frame(graph, &self.config, self.textures, self.cache)
    }

    pub fn render_with_events(
        &self,
        graph: &RenderGraph,
        sink: &mut dyn EventSink,
    ) -> Result<Frame> {
        render_frame_with_events(graph, &self.config, self.textures, self.cache, 0, sink)
    }

    /// Renders `seq.frame_count` frames, handing each to `on_frame` in order.
    pub fn render_sequence<F>(
        &self,
        graph: &RenderGraph,
        seq: &SequenceConfig,
        sink: &mut dyn EventSink,
        on_frame: F,
    ) -> Result<u64>
    where
        F: FnMut(Frame) -> Result<()>,
    {
        render_sequence(
            graph,
            &self.config,
            seq,
            self.textures,
            self.cache,
            sink,
            on_frame,
        )
    }
}

pub fn render_frame(
    graph: &RenderGraph,
    config: &RenderConfig,
    textures: &TextureRegistry,
    cache: &RenderProgramCache,
) -> Result<Frame> {
    render_frame_with_events(graph, config, textures, cache, 0, &mut ())
}

/// Renders one frame, reporting progress to `sink`. `index` only labels the frame.
pub fn render_frame_with_events(
    graph: &RenderGraph,
    config: &RenderConfig,
    textures: &TextureRegistry,
    cache: &RenderProgramCache,
    index: u64,
    sink: &mut dyn EventSink,
) -> Result<Frame> {
    config.validate()?;

    let program = cache
        .get_or_compile(graph, &config.compile_options)
        .inspect_err(|e| warn!("Render graph '{}' failed to compile: {}", graph.id, e))?;

    if sink.wants(RenderEventKind::FrameStarted) {
        sink.send(RenderEvent::FrameStarted {
            index,
            time: config.time,
            config: config.clone(),
            pass_count: program.topo.len(),
        });
    }

    let grid = config.grid();
    let mut runtime = RenderRuntime::new(Arc::clone(&program), textures, grid, config.time)
        .with_max_blur_radius(config.max_blur_radius);

    for (order, id) in program.topo.iter().enumerate() {
        let meta = &program.passes[id];

        if sink.wants(RenderEventKind::PassStarted) {
            sink.send(RenderEvent::PassStarted {
                order,
                id: id.clone(),
                kind: meta.spec.kind_name(),
            });
        }

        if let PassSpec::BoxBlur { params, .. } = &meta.spec {
            let radius = runtime.blur_radius(params);
            if radius.is_clamped() {
                if sink.wants(RenderEventKind::BlurRadiusClamped) {
                    sink.send(RenderEvent::BlurRadiusClamped {
                        pass: id.clone(),
                        requested: radius.requested,
                        effective: radius.effective,
                    });
                }
                if sink.wants(RenderEventKind::Warning) {
                    sink.send(RenderEvent::Warning {
                        context: format!("graph:{} pass:{}", graph.id, id),
                        message: format!(
                            "Blur radius clamped from {} to {}",
                            radius.requested, radius.effective
                        ),
                    });
                }
            }
        }

        let raster = runtime.bake(id)?;

        if sink.wants(RenderEventKind::PassFinished) {
            sink.send(RenderEvent::PassFinished {
                order,
                id: id.clone(),
                size_px: raster.size(),
            });
        }
    }

    let raster = runtime.render_output()?;
    let passes_rendered = program.topo.len();

    info!(
        "Frame {} of '{}' | t = {:.3}s | {} passes | {}x{}.",
        index, graph.id, config.time, passes_rendered, grid.width, grid.height
    );

    if sink.wants(RenderEventKind::FrameFinished) {
        sink.send(RenderEvent::FrameFinished {
            index,
            output: program.output.clone(),
            passes_rendered,
        });
    }

    Ok(Frame {
        index,
        time: config.time,
        output: program.output.clone(),
        raster,
        passes_rendered,
    })
}
