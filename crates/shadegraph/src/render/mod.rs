//! Frame rendering on top of the render graph: configuration, runners, events and sequences.
pub mod events;
pub mod runner;
pub mod sequence;

pub use events::{EventSink, FilterSink, FnSink, MultiSink, RenderEvent, RenderEventKind, VecSink};
pub use runner::{render_frame, render_frame_with_events, Frame, RenderConfig, RenderRunner};
pub use sequence::{render_sequence, SequenceConfig};
