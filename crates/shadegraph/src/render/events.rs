//! Event types and sinks for observing frame renders.
//!
//! This module defines [`RenderEvent`] and a set of sinks and adapters to emit,
//! collect, or forward events while rendering a [`crate::passgraph::RenderGraph`]
//! via [`crate::render::RenderRunner`], [`crate::render::render_frame`],
//! or [`crate::render::render_sequence`].
use crate::passgraph::PassId;
use crate::render::runner::RenderConfig;

/// Describes events emitted by render operations.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum RenderEvent {
    /// Emitted when a frame starts rendering.
    FrameStarted {
        /// Frame index within a sequence; `0` for single frames.
        index: u64,
        /// Time uniform for the frame, in seconds.
        time: f32,
        /// The render configuration used.
        config: RenderConfig,
        /// Number of passes that will be evaluated.
        pass_count: usize,
    },

    /// Emitted before a pass is baked.
    PassStarted {
        /// Position of the pass in evaluation order.
        order: usize,
        /// The pass id.
        id: PassId,
        /// Short name of the pass kind.
        kind: &'static str,
    },

    /// Emitted after a pass is baked.
    PassFinished {
        /// Position of the pass in evaluation order.
        order: usize,
        /// The pass id.
        id: PassId,
        /// Output size in pixels.
        size_px: (u32, u32),
    },

    /// Emitted when a box-blur radius exceeded the configured maximum.
    BlurRadiusClamped {
        /// The box-blur pass.
        pass: PassId,
        /// Radius derived from the blur amount.
        requested: u32,
        /// Radius actually sampled.
        effective: u32,
    },

    /// Emitted when a frame finishes rendering.
    FrameFinished {
        /// Frame index within a sequence; `0` for single frames.
        index: u64,
        /// The output pass presented as the frame.
        output: PassId,
        /// Number of passes evaluated.
        passes_rendered: usize,
    },

    /// Emitted when a frame sequence completes.
    SequenceFinished {
        /// Number of frames rendered.
        frames: u64,
    },

    /// Non-fatal warning generated during rendering.
    Warning {
        /// Context string (e.g. graph id, pass id).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of a [`RenderEvent`], used to filter events before building them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderEventKind {
    FrameStarted,
    PassStarted,
    PassFinished,
    BlurRadiusClamped,
    FrameFinished,
    SequenceFinished,
    Warning,
}

impl RenderEvent {
    pub fn kind(&self) -> RenderEventKind {
        match self {
            RenderEvent::FrameStarted { .. } => RenderEventKind::FrameStarted,
            RenderEvent::PassStarted { .. } => RenderEventKind::PassStarted,
            RenderEvent::PassFinished { .. } => RenderEventKind::PassFinished,
            RenderEvent::BlurRadiusClamped { .. } => RenderEventKind::BlurRadiusClamped,
            RenderEvent::FrameFinished { .. } => RenderEventKind::FrameFinished,
            RenderEvent::SequenceFinished { .. } => RenderEventKind::SequenceFinished,
            RenderEvent::Warning { .. } => RenderEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`RenderEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: RenderEvent);

    /// Whether events of `kind` should be built and sent at all.
    #[inline]
    fn wants(&self, _kind: RenderEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = RenderEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: RenderEvent) {}

    #[inline]
    fn wants(&self, _kind: RenderEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(RenderEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(RenderEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(RenderEvent),
{
    #[inline]
    fn send(&mut self, event: RenderEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<RenderEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
        }
    }

    pub fn into_inner(self) -> Vec<RenderEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[RenderEvent] {
        &self.events
    }

    /// Number of collected events of `kind`.
    pub fn count(&self, kind: RenderEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: RenderEvent) {
        self.events.push(event);
    }
}

/// Sink that only forwards events whose kind is in an allow list.
pub struct FilterSink<S: EventSink> {
    inner: S,
    kinds: Vec<RenderEventKind>,
}

impl<S: EventSink> FilterSink<S> {
    pub fn new(inner: S, kinds: impl IntoIterator<Item = RenderEventKind>) -> Self {
        Self {
            inner,
            kinds: kinds.into_iter().collect(),
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: EventSink> EventSink for FilterSink<S> {
    fn send(&mut self, event: RenderEvent) {
        if self.wants(event.kind()) {
            self.inner.send(event);
        }
    }

    fn wants(&self, kind: RenderEventKind) -> bool {
        self.kinds.contains(&kind) && self.inner.wants(kind)
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: RenderEvent) {
        let kind = event.kind();
        let targets: Vec<usize> = (0..self.sinks.len())
            .filter(|&i| self.sinks[i].wants(kind))
            .collect();
        let Some((&last, rest)) = targets.split_last() else {
            return;
        };
        for &i in rest {
            self.sinks[i].send(event.clone());
        }
        self.sinks[last].send(event);
    }

    fn wants(&self, kind: RenderEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}
