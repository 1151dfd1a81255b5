use glam::UVec2;
use shadegraph::prelude::*;
use shadegraph_examples::{init_tracing, load_graph_ron, save_png};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let path = std::env::args().nth(1).unwrap_or_else(|| {
        format!(
            "{}/graphs/main_then_blur.ron",
            env!("CARGO_MANIFEST_DIR")
        )
    });
    let graph = load_graph_ron(&path)?;

    let textures = TextureRegistry::new();
    let cache = RenderProgramCache::new();
    let config = RenderConfig::new(UVec2::new(800, 450)).with_time(0.5);
    let runner = RenderRunner::try_new(config, &textures, &cache)?;

    let frame = runner.render(&graph)?;
    save_png(&frame.raster, format!("graph-{}.png", graph.id))?;

    // Unchanged graphs are served from the cache.
    let again = runner.render(&graph)?;
    tracing::info!(
        "rendered '{}' twice; {} program(s) cached",
        again.output,
        cache.len()
    );

    Ok(())
}
