use glam::UVec2;
use shadegraph::prelude::*;
use shadegraph_examples::{init_tracing, save_png};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Gray ramp: brightness follows the pixel column, black at the left edge.
    let graph = RenderGraph::single("gradient", PassSpec::gradient());

    let textures = TextureRegistry::new();
    let cache = RenderProgramCache::new();
    let config = RenderConfig::new(UVec2::new(800, 450));

    let runner = RenderRunner::try_new(config, &textures, &cache)?;
    let frame = runner.render(&graph)?;

    save_png(&frame.raster, "pass-gradient.png")?;
    Ok(())
}
