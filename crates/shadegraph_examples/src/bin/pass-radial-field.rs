use glam::UVec2;
use shadegraph::prelude::*;
use shadegraph_examples::{init_tracing, save_png};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Aspect-corrected distance from the center as a gray level.
    let graph = RenderGraph::single("radial-field", PassSpec::radial_field());

    let textures = TextureRegistry::new();
    let cache = RenderProgramCache::new();
    let config = RenderConfig::new(UVec2::new(800, 450));

    let runner = RenderRunner::try_new(config, &textures, &cache)?;
    let frame = runner.render(&graph)?;

    save_png(&frame.raster, "pass-radial-field.png")?;
    Ok(())
}
