//! Fixed-rate frame sequences for offline export.
//!
//! Frame `i` of a sequence is rendered at `start_time + i / fps` seconds, independent of
//! how long rendering takes, so exported videos play back at the intended speed.
use tracing::info;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::passgraph::cache::RenderProgramCache;
use crate::passgraph::{RenderGraph, TextureRegistry};
use crate::render::events::{EventSink, RenderEvent, RenderEventKind};
use crate::render::runner::{render_frame_with_events, Frame, RenderConfig};

/// Default number of frames in an exported sequence.
pub const DEFAULT_FRAME_COUNT: u64 = 300;
/// Default sequence frame rate.
pub const DEFAULT_FPS: f32 = 30.0;

/// Timing of a frame sequence.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceConfig {
    /// Number of frames to render.
    pub frame_count: u64,
    /// Frames per second.
    pub fps: f32,
    /// Time uniform of the first frame, in seconds.
    pub start_time: f32,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            frame_count: DEFAULT_FRAME_COUNT,
            fps: DEFAULT_FPS,
            start_time: 0.0,
        }
    }
}

impl SequenceConfig {
    pub fn new(frame_count: u64, fps: f32) -> Self {
        Self {
            frame_count,
            fps,
            ..Default::default()
        }
    }

    /// Sets the time of the first frame.
    pub fn with_start_time(mut self, start_time: f32) -> Self {
        self.start_time = start_time;
        self
    }

    /// Time uniform for frame `index`.
    #[inline]
    pub fn time_for(&self, index: u64) -> f32 {
        self.start_time + (index as f64 / self.fps as f64) as f32
    }

    /// Playback length in seconds.
    pub fn duration(&self) -> f32 {
        (self.frame_count as f64 / self.fps as f64) as f32
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(Error::InvalidConfig("fps must be > 0".into()));
        }
        if !self.start_time.is_finite() {
            return Err(Error::InvalidConfig("start_time must be finite".into()));
        }

        Ok(())
    }
}

/// Renders every frame of `seq` in order and passes each to `on_frame`.
///
/// Rendering stops at the first error from either the renderer or `on_frame`. On success
/// the number of frames rendered is returned.
pub fn render_sequence<F>(
    graph: &RenderGraph,
    config: &RenderConfig,
    seq: &SequenceConfig,
    textures: &TextureRegistry,
    cache: &RenderProgramCache,
    sink: &mut dyn EventSink,
    mut on_frame: F,
) -> Result<u64>
where
    F: FnMut(Frame) -> Result<()>,
{
    seq.validate()?;
    config.validate()?;

    info!(
        "Sequence '{}' | {} frames at {} fps | {}x{}.",
        graph.id, seq.frame_count, seq.fps, config.resolution.x, config.resolution.y
    );

    let mut frame_config = config.clone();
    for index in 0..seq.frame_count {
        frame_config.time = seq.time_for(index);
        let frame = render_frame_with_events(graph, &frame_config, textures, cache, index, sink)?;
        on_frame(frame)?;
    }

    if sink.wants(RenderEventKind::SequenceFinished) {
        sink.send(RenderEvent::SequenceFinished {
            frames: seq.frame_count,
        });
    }

    Ok(seq.frame_count)
}

#[cfg(test)]
mod tests {
    use glam::UVec2;

    use super::*;
    use crate::passgraph::PassSpec;
    use crate::render::events::VecSink;

    #[test]
    fn defaults_match_export_settings() {
        let seq = SequenceConfig::default();
        assert_eq!(seq.frame_count, 300);
        assert_eq!(seq.fps, 30.0);
        assert_eq!(seq.duration(), 10.0);
    }

    #[test]
    fn frame_time_is_index_over_fps() {
        let seq = SequenceConfig::new(10, 30.0);
        assert_eq!(seq.time_for(0), 0.0);
        assert!((seq.time_for(15) - 0.5).abs() < 1e-6);

        let shifted = seq.with_start_time(2.0);
        assert!((shifted.time_for(30) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn validate_rejects_non_positive_fps() {
        assert!(SequenceConfig::new(10, 0.0).validate().is_err());
        assert!(SequenceConfig::new(10, -5.0).validate().is_err());
        assert!(SequenceConfig::new(10, f32::NAN).validate().is_err());
        assert!(SequenceConfig::new(0, 24.0).validate().is_ok());
    }

    #[test]
    fn renders_frames_in_order_with_their_times() {
        let textures = TextureRegistry::new();
        let cache = RenderProgramCache::new();
        let graph = RenderGraph::single("rings", PassSpec::circle_field(1.0, 1.0));
        let config = RenderConfig::new(UVec2::new(4, 4));
        let seq = SequenceConfig::new(4, 2.0);
        let mut sink = VecSink::new();
        let mut seen: Vec<(u64, f32)> = Vec::new();

        let rendered = render_sequence(&graph, &config, &seq, &textures, &cache, &mut sink, |f| {
            seen.push((f.index, f.time));
            Ok(())
        })
        .expect("sequence renders");

        assert_eq!(rendered, 4);
        assert_eq!(seen, vec![(0, 0.0), (1, 0.5), (2, 1.0), (3, 1.5)]);
        assert_eq!(sink.count(RenderEventKind::FrameFinished), 4);
        assert!(matches!(
            sink.as_slice().last(),
            Some(RenderEvent::SequenceFinished { frames: 4 })
        ));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn stops_at_the_first_callback_error() {
        let textures = TextureRegistry::new();
        let cache = RenderProgramCache::new();
        let graph = RenderGraph::single("grad", PassSpec::gradient());
        let config = RenderConfig::new(UVec2::new(2, 2));
        let seq = SequenceConfig::new(10, 30.0);
        let mut calls = 0;

        let result = render_sequence(&graph, &config, &seq, &textures, &cache, &mut (), |_| {
            calls += 1;
            if calls == 3 {
                Err(Error::Other("encoder closed".into()))
            } else {
                Ok(())
            }
        });

        assert!(matches!(result, Err(Error::Other(_))));
        assert_eq!(calls, 3);
    }
}
