#![forbid(unsafe_code)]

mod encode;
mod graph_file;
mod rendering;

pub use encode::{ffmpeg_args, ffmpeg_available, FfmpegEncoder};
pub use graph_file::{load_graph_ron, parse_graph_ron};
pub use rendering::{checkerboard, init_tracing, noise, save_png, PngTexture, PngTextures};
