use glam::{UVec2, Vec4};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shadegraph::prelude::*;
use shadegraph_examples::{checkerboard, init_tracing, noise, save_png, PngTextures};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Bind an image given on the command line, or a generated checkerboard.
    let mut textures = TextureRegistry::new();
    match std::env::args().nth(1) {
        Some(path) => {
            let mut png_textures = PngTextures::new();
            png_textures.load_png("albedo", &path)?;
            png_textures.register_all_into(&mut textures);
        }
        None => {
            let board = checkerboard(
                256,
                8,
                Vec4::new(0.95, 0.75, 0.3, 1.0),
                Vec4::new(0.2, 0.35, 0.8, 1.0),
            );
            textures.register("albedo", board);
        }
    }
    let mut rng = StdRng::seed_from_u64(7);
    textures.register("noise", noise(64, &mut rng));

    let cache = RenderProgramCache::new();
    let config = RenderConfig::new(UVec2::new(800, 450)).with_time(0.8);
    let runner = RenderRunner::try_new(config, &textures, &cache)?;

    for id in ["albedo", "noise"] {
        let graph = RenderGraph::single(
            format!("animated-radial-{id}"),
            PassSpec::animated_radial(TextureSource::external(id)),
        );
        let frame = runner.render(&graph)?;
        save_png(&frame.raster, format!("pass-animated-radial-{id}.png"))?;
    }

    Ok(())
}
