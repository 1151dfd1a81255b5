use glam::UVec2;
use shadegraph::prelude::*;
use shadegraph_examples::{init_tracing, save_png};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let textures = TextureRegistry::new();
    let cache = RenderProgramCache::new();

    // Same graph at three times: the ring center bobs with sin(time).
    let graph = RenderGraph::single("circle-field", PassSpec::circle_field(0.25, 4.0));
    for (i, time) in [0.0_f32, 1.57, 4.71].into_iter().enumerate() {
        let config = RenderConfig::new(UVec2::new(800, 450)).with_time(time);
        let frame = render_frame(&graph, &config, &textures, &cache)?;
        save_png(&frame.raster, format!("pass-circle-field-{i}.png"))?;
    }

    Ok(())
}
