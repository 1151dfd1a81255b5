//! Runtime for evaluating render programs and baking pass outputs.
//!
//! This module interprets compiled [`RenderProgram`]s. Single fragments are shaded on
//! demand via [`RenderRuntime::shade`]; whole passes are baked into [`ColorRaster`]s
//! aligned to a [`PixelGrid`] via [`RenderRuntime::bake`]. A pass that another pass
//! samples is always baked first, so every render-graph edge reads a finished image.
//! External texture slots resolve through a [`TextureRegistry`].
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use glam::Vec4;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::passgraph::program::RenderProgram;
use crate::passgraph::{
    BoxBlurParams, CircleFieldParams, ColorRaster, PassId, PassSpec, PixelGrid, Texture,
    TextureRegistry, TextureSource,
};
use crate::shaders::{self, Fragment, FrameUniforms};

/// Requested and applied blur radius for a box-blur pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlurRadius {
    /// Radius derived from the blur amount.
    pub requested: u32,
    /// Radius actually sampled after applying the configured maximum.
    pub effective: u32,
}

impl BlurRadius {
    #[inline]
    pub fn is_clamped(&self) -> bool {
        self.effective < self.requested
    }
}

enum Op {
    CircleField(CircleFieldParams),
    Gradient,
    RadialField,
    AnimatedRadial(Arc<dyn Texture>),
    BoxBlur(u32, Arc<dyn Texture>),
}

impl Op {
    fn eval(&self, frag: &Fragment, frame: &FrameUniforms) -> Vec4 {
        match self {
            Op::CircleField(params) => shaders::circle_field(frag, frame, params),
            Op::Gradient => shaders::gradient(frag, frame),
            Op::RadialField => shaders::radial_field(frag, frame),
            Op::AnimatedRadial(texture) => shaders::animated_radial(frag, frame, texture.as_ref()),
            Op::BoxBlur(radius, source) => shaders::box_blur(frag, frame, *radius, source.as_ref()),
        }
    }
}

/// Runtime for evaluating render programs for one frame, managing textures and baked passes.
pub struct RenderRuntime<'a> {
    pub program: Arc<RenderProgram>,
    pub textures: &'a TextureRegistry,
    pub grid: PixelGrid,
    pub time: f32,
    max_blur_radius: Option<u32>,
    baked: HashMap<PassId, Arc<ColorRaster>>,
    clamp_reported: HashSet<PassId>,
}

impl<'a> RenderRuntime<'a> {
    /// Create a runtime that renders `program` on `grid` at `time` seconds.
    pub fn new(
        program: Arc<RenderProgram>,
        textures: &'a TextureRegistry,
        grid: PixelGrid,
        time: f32,
    ) -> Self {
        Self {
            program,
            textures,
            grid,
            time,
            max_blur_radius: None,
            baked: HashMap::new(),
            clamp_reported: HashSet::new(),
        }
    }

    /// Upper bound for box-blur sample radii. `None` samples the full requested radius.
    pub fn with_max_blur_radius(mut self, max: Option<u32>) -> Self {
        self.max_blur_radius = max;
        self
    }

    /// Uniforms every pass sees in this frame.
    pub fn uniforms(&self) -> FrameUniforms {
        self.grid.uniforms(self.time)
    }

    /// Blur radius a box-blur pass with `params` samples under this runtime's limit.
    pub fn blur_radius(&self, params: &BoxBlurParams) -> BlurRadius {
        let requested = shaders::sample_radius(params.blur_amount);
        let effective = match self.max_blur_radius {
            Some(max) => requested.min(max),
            None => requested,
        };
        BlurRadius {
            requested,
            effective,
        }
    }

    /// Whether `pass` already has a baked raster in this frame.
    pub fn is_baked(&self, pass: &str) -> bool {
        self.baked.contains_key(pass)
    }

    /// Shade a single fragment of `pass`. Passes it samples are baked first.
    /// The fragment is always evaluated, even when `pass` itself is already baked.
    pub fn shade(&mut self, pass: &str, frag: &Fragment) -> Result<Vec4> {
        let op = self.bind(pass)?;
        Ok(op.eval(frag, &self.uniforms()))
    }

    /// Bake `pass` over the whole grid, returning the memoized raster on repeat calls.
    pub fn bake(&mut self, pass: &str) -> Result<Arc<ColorRaster>> {
        if let Some(raster) = self.baked.get(pass) {
            return Ok(Arc::clone(raster));
        }

        let op = self.bind(pass)?;
        let frame = self.uniforms();
        let mut raster = ColorRaster::for_grid(&self.grid);
        for iy in 0..self.grid.height {
            for ix in 0..self.grid.width {
                let frag = self.grid.fragment(ix, iy);
                raster.data[self.grid.index(ix, iy)] = op.eval(&frag, &frame);
            }
        }

        debug!(pass, width = self.grid.width, height = self.grid.height, "baked pass");
        let raster = Arc::new(raster);
        self.baked.insert(pass.to_string(), Arc::clone(&raster));
        Ok(raster)
    }

    /// Bake the program's output pass, and with it everything the output reads.
    pub fn render_output(&mut self) -> Result<Arc<ColorRaster>> {
        let output = self.program.output.clone();
        self.bake(&output)
    }

    fn bind(&mut self, pass: &str) -> Result<Op> {
        let program = Arc::clone(&self.program);
        let Some(meta) = program.passes.get(pass) else {
            return Err(Error::UnknownPass {
                id: pass.to_string(),
            });
        };

        Ok(match &meta.spec {
            PassSpec::CircleField { params } => Op::CircleField(*params),
            PassSpec::Gradient => Op::Gradient,
            PassSpec::RadialField => Op::RadialField,
            PassSpec::AnimatedRadial { texture } => Op::AnimatedRadial(self.resolve(texture)?),
            PassSpec::BoxBlur { source, params } => {
                let radius = self.blur_radius(params);
                if radius.is_clamped() && self.clamp_reported.insert(pass.to_string()) {
                    warn!(
                        "Blur radius for pass '{}' clamped from {} to {}.",
                        pass, radius.requested, radius.effective
                    );
                }
                Op::BoxBlur(radius.effective, self.resolve(source)?)
            }
        })
    }

    fn resolve(&mut self, source: &TextureSource) -> Result<Arc<dyn Texture>> {
        match source {
            TextureSource::External(id) => self.textures.require(id),
            TextureSource::Pass(id) => {
                let raster: Arc<dyn Texture> = self.bake(id)?;
                Ok(raster)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::passgraph::compiler::{CompileOptions, RenderGraphCompiler};
    use crate::passgraph::{RenderGraphSpec, SolidTexture};

    fn program(spec: &RenderGraphSpec) -> Arc<RenderProgram> {
        Arc::new(RenderGraphCompiler::compile(spec, &CompileOptions::default()).unwrap())
    }

    fn approx_eq(a: Vec4, b: Vec4) {
        assert!((a - b).abs().max_element() < 1e-5, "{a} != {b}");
    }

    #[test]
    fn baked_pass_matches_direct_shading() {
        let mut spec = RenderGraphSpec::default();
        spec.add_output("grad", PassSpec::gradient());
        let textures = TextureRegistry::new();
        let grid = PixelGrid::new(8, 4);

        let mut runtime = RenderRuntime::new(program(&spec), &textures, grid, 0.0);
        let raster = runtime.render_output().expect("render succeeds");
        let frame = grid.uniforms(0.0);

        for iy in 0..grid.height {
            for ix in 0..grid.width {
                let frag = grid.fragment(ix, iy);
                approx_eq(raster.get(ix, iy), shaders::gradient(&frag, &frame));
            }
        }
    }

    #[test]
    fn zero_blur_reproduces_its_source() {
        let mut spec = RenderGraphSpec::default();
        spec.add("main", PassSpec::radial_field());
        spec.add_output("post", PassSpec::box_blur("main", 0.05));
        let textures = TextureRegistry::new();

        let mut runtime = RenderRuntime::new(program(&spec), &textures, PixelGrid::new(16, 9), 0.5);
        let post = runtime.render_output().expect("render succeeds");
        let main = runtime.bake("main").expect("already baked");

        for (a, b) in post.data.iter().zip(main.data.iter()) {
            approx_eq(*a, *b);
        }
    }

    #[test]
    fn blur_of_constant_input_is_constant() {
        let mut textures = TextureRegistry::new();
        let color = Vec4::new(0.2, 0.4, 0.6, 1.0);
        textures.register("flat", SolidTexture::new(color));

        let mut spec = RenderGraphSpec::default();
        spec.add(
            "tinted",
            PassSpec::animated_radial(TextureSource::external("flat")),
        );
        spec.add_output(
            "post",
            PassSpec::box_blur_from(TextureSource::external("flat"), 0.3),
        );
        let opts = CompileOptions {
            include_unreachable: true,
        };
        let program = Arc::new(RenderGraphCompiler::compile(&spec, &opts).unwrap());

        let mut runtime = RenderRuntime::new(program, &textures, PixelGrid::new(6, 6), 0.0);
        let raster = runtime.render_output().expect("render succeeds");
        for c in &raster.data {
            approx_eq(*c, color);
        }
        assert!(!runtime.is_baked("tinted"));
    }

    #[test]
    fn inputs_are_baked_before_their_readers() {
        let mut spec = RenderGraphSpec::default();
        spec.add("main", PassSpec::circle_field(0.5, 2.0));
        spec.add_output("post", PassSpec::box_blur("main", 0.1));
        let textures = TextureRegistry::new();

        let mut runtime = RenderRuntime::new(program(&spec), &textures, PixelGrid::new(8, 8), 1.0);
        let frag = runtime.grid.fragment(3, 3);
        runtime.shade("post", &frag).expect("shade succeeds");

        assert!(runtime.is_baked("main"));
        assert!(!runtime.is_baked("post"));
    }

    #[test]
    fn shade_evaluates_between_pixel_centers_after_bake() {
        let mut spec = RenderGraphSpec::default();
        spec.add_output("rings", PassSpec::circle_field(0.0, 1.0));
        let textures = TextureRegistry::new();
        let grid = PixelGrid::new(10, 10);

        let mut runtime = RenderRuntime::new(program(&spec), &textures, grid, 0.0);
        runtime.bake("rings").unwrap();

        let frag = Fragment::from_uv(Vec2::new(0.8525, 0.614), Vec2::new(10.0, 10.0));
        let shaded = runtime.shade("rings", &frag).expect("shade succeeds");
        let direct = shaders::circle_field(
            &frag,
            &grid.uniforms(0.0),
            &CircleFieldParams::new(0.0, 1.0),
        );

        assert_eq!(shaded, direct);
        assert!(shaded.x == 0.0 || shaded.x == 1.0, "{shaded}");
    }

    #[test]
    fn bake_is_memoized_per_pass() {
        let mut spec = RenderGraphSpec::default();
        spec.add_output("rings", PassSpec::circle_field(1.0, 1.0));
        let textures = TextureRegistry::new();

        let mut runtime = RenderRuntime::new(program(&spec), &textures, PixelGrid::new(4, 4), 0.0);
        let a = runtime.bake("rings").unwrap();
        let b = runtime.bake("rings").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn unknown_pass_is_an_error() {
        let mut spec = RenderGraphSpec::default();
        spec.add_output("grad", PassSpec::gradient());
        let textures = TextureRegistry::new();

        let mut runtime = RenderRuntime::new(program(&spec), &textures, PixelGrid::new(2, 2), 0.0);
        let frag = runtime.grid.fragment(0, 0);
        assert!(matches!(
            runtime.shade("missing", &frag),
            Err(Error::UnknownPass { id }) if id == "missing"
        ));
    }

    #[test]
    fn missing_external_texture_is_an_error() {
        let mut spec = RenderGraphSpec::default();
        spec.add_output(
            "tinted",
            PassSpec::animated_radial(TextureSource::external("albedo")),
        );
        let textures = TextureRegistry::new();

        let mut runtime = RenderRuntime::new(program(&spec), &textures, PixelGrid::new(2, 2), 0.0);
        assert!(matches!(
            runtime.render_output(),
            Err(Error::MissingTexture { id }) if id == "albedo"
        ));
    }

    #[test]
    fn blur_radius_respects_the_configured_maximum() {
        let spec = {
            let mut spec = RenderGraphSpec::default();
            spec.add_output("grad", PassSpec::gradient());
            spec
        };
        let textures = TextureRegistry::new();
        let params = BoxBlurParams::new(2.0);

        let runtime = RenderRuntime::new(program(&spec), &textures, PixelGrid::new(2, 2), 0.0);
        assert_eq!(
            runtime.blur_radius(&params),
            BlurRadius {
                requested: 20,
                effective: 20
            }
        );

        let runtime = runtime.with_max_blur_radius(Some(4));
        let radius = runtime.blur_radius(&params);
        assert_eq!(radius.effective, 4);
        assert!(radius.is_clamped());
        assert!(!runtime.blur_radius(&BoxBlurParams::new(0.2)).is_clamped());
    }

    #[test]
    fn clamped_blur_matches_the_smaller_radius() {
        let mut spec = RenderGraphSpec::default();
        spec.add("main", PassSpec::radial_field());
        spec.add("wide", PassSpec::box_blur("main", 1.0));
        spec.add_output("narrow", PassSpec::box_blur("main", 0.2));
        let opts = CompileOptions {
            include_unreachable: true,
        };
        let program = Arc::new(RenderGraphCompiler::compile(&spec, &opts).unwrap());
        let textures = TextureRegistry::new();
        let grid = PixelGrid::new(12, 12);

        let mut runtime =
            RenderRuntime::new(program, &textures, grid, 0.0).with_max_blur_radius(Some(2));
        let wide = runtime.bake("wide").unwrap();
        let narrow = runtime.bake("narrow").unwrap();
        for (a, b) in wide.data.iter().zip(narrow.data.iter()) {
            approx_eq(*a, *b);
        }
    }
}
