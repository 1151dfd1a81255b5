use glam::UVec2;
use shadegraph::prelude::*;
use shadegraph_examples::{ffmpeg_available, init_tracing, save_png, FfmpegEncoder};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut spec = RenderGraphSpec::default();
    spec.add("main", PassSpec::circle_field(0.25, 4.0));
    spec.add_output("post", PassSpec::box_blur("main", 0.2));
    let graph = RenderGraph::new("circle-field-video", spec);

    let (width, height) = (640, 360);
    let fps = 30;
    let seq = SequenceConfig::new(90, fps as f32);

    let textures = TextureRegistry::new();
    let cache = RenderProgramCache::new();
    let config = RenderConfig::new(UVec2::new(width, height));
    let runner = RenderRunner::try_new(config, &textures, &cache)?;
    let mut sink = FilterSink::new(
        FnSink::new(|event| {
            if let RenderEvent::FrameFinished { index, .. } = event {
                if index % 30 == 0 {
                    tracing::info!("frame {}", index);
                }
            }
        }),
        [RenderEventKind::FrameFinished],
    );

    if !ffmpeg_available() {
        // Without ffmpeg, keep every tenth frame as a PNG.
        tracing::warn!("ffmpeg not found; writing PNG frames instead");
        runner.render_sequence(&graph, &seq, &mut sink, |frame| {
            if frame.index % 10 == 0 {
                save_png(&frame.raster, format!("circle-field-{:03}.png", frame.index))
                    .map_err(|e| Error::Other(e.to_string()))?;
            }
            Ok(())
        })?;
        return Ok(());
    }

    let mut encoder = FfmpegEncoder::spawn("circle-field.mp4", width, height, fps)?;
    runner.render_sequence(&graph, &seq, &mut sink, |frame| {
        encoder
            .write_frame(&frame.to_rgba8())
            .map_err(|e| Error::Other(e.to_string()))
    })?;
    encoder.finish()?;

    Ok(())
}
