use glam::UVec2;
use shadegraph::prelude::*;
use shadegraph_examples::{init_tracing, save_png};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // The blur reads the main pass through an explicit graph edge.
    let mut spec = RenderGraphSpec::default();
    spec.add("main", PassSpec::circle_field(0.25, 4.0));
    spec.add_output("post", PassSpec::box_blur("main", 0.8));
    let graph = RenderGraph::new("post-box-blur", spec);

    let textures = TextureRegistry::new();
    let cache = RenderProgramCache::new();

    // Radius 8 requested, capped at 4.
    let config = RenderConfig::new(UVec2::new(640, 360))
        .with_time(1.0)
        .with_max_blur_radius(Some(4));
    let runner = RenderRunner::try_new(config, &textures, &cache)?;

    let mut sink = FnSink::new(|event| match event {
        RenderEvent::PassFinished { id, size_px, .. } => {
            tracing::info!("pass '{}' baked at {}x{}", id, size_px.0, size_px.1);
        }
        RenderEvent::BlurRadiusClamped {
            pass,
            requested,
            effective,
        } => {
            tracing::info!("pass '{}' blur radius {} -> {}", pass, requested, effective);
        }
        _ => {}
    });
    let frame = runner.render_with_events(&graph, &mut sink)?;
    save_png(&frame.raster, "post-box-blur.png")?;

    let unblurred = RenderGraph::single("main", PassSpec::circle_field(0.25, 4.0));
    let frame = runner.render(&unblurred)?;
    save_png(&frame.raster, "post-box-blur-source.png")?;

    Ok(())
}
