//! Program representation for compiled render graphs.
//!
//! This module defines the data structures produced by compiling a
//! [`crate::passgraph::spec::RenderGraphSpec`] of [`crate::passgraph::PassSpec`]s into an
//! executable program.
use std::collections::HashMap;

use crate::passgraph::{PassId, PassSpec};

/// Metadata about a pass in the render program.
#[derive(Clone, Debug)]
pub struct PassMeta {
    /// Pass id.
    pub id: PassId,
    /// Pass specification.
    pub spec: PassSpec,
    /// Passes that read this pass's output.
    pub consumers: Vec<PassId>,
}

impl PassMeta {
    /// Check if another pass samples this pass's output.
    #[inline]
    pub fn is_read_by_other_passes(&self) -> bool {
        !self.consumers.is_empty()
    }
}

/// A render program: passes, their evaluation order, and the frame output.
#[derive(Clone, Debug)]
pub struct RenderProgram {
    /// Pass metadata keyed by pass id.
    pub passes: HashMap<PassId, PassMeta>,
    /// Topological order; every pass appears after the passes it reads.
    pub topo: Vec<PassId>,
    /// Pass presented as the frame.
    pub output: PassId,
}

impl RenderProgram {
    /// Position of `id` in the evaluation order.
    pub fn order_of(&self, id: &str) -> Option<usize> {
        self.topo.iter().position(|p| p == id)
    }
}
