//! Specification types for authoring render graphs.
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::passgraph::{PassId, PassSpec};

/// A specification of a render graph: named passes and the pass whose output is the frame.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct RenderGraphSpec {
    pub passes: HashMap<PassId, PassSpec>,
    /// Pass presented as the frame. When `None`, the single pass nobody reads from is used.
    pub output: Option<PassId>,
}

impl RenderGraphSpec {
    /// Add a pass to the render graph specification.
    pub fn add(&mut self, id: &str, spec: PassSpec) -> &mut Self {
        self.passes.insert(id.to_string(), spec);
        self
    }

    /// Mark a pass as the frame output.
    pub fn set_output(&mut self, id: &str) -> &mut Self {
        self.output = Some(id.to_string());
        self
    }

    /// Add a pass and mark it as the frame output.
    pub fn add_output(&mut self, id: &str, spec: PassSpec) -> &mut Self {
        self.add(id, spec);
        self.set_output(id);
        self
    }
}

/// A named render graph. The id keys compiled programs in
/// [`crate::passgraph::cache::RenderProgramCache`].
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct RenderGraph {
    pub id: String,
    pub spec: RenderGraphSpec,
}

impl RenderGraph {
    pub fn new(id: impl Into<String>, spec: RenderGraphSpec) -> Self {
        Self {
            id: id.into(),
            spec,
        }
    }

    /// A graph made of one pass that is also its output.
    pub fn single(id: impl Into<String>, pass: PassSpec) -> Self {
        let id = id.into();
        let mut spec = RenderGraphSpec::default();
        spec.add_output(&id, pass);
        Self { id, spec }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_output_registers_and_marks_the_pass() {
        let mut spec = RenderGraphSpec::default();
        spec.add("main", PassSpec::radial_field())
            .add_output("blurred", PassSpec::box_blur("main", 0.2));
        assert_eq!(spec.passes.len(), 2);
        assert_eq!(spec.output.as_deref(), Some("blurred"));
    }

    #[test]
    fn single_graph_uses_its_id_for_the_pass() {
        let graph = RenderGraph::single("gradient", PassSpec::gradient());
        assert_eq!(graph.id, "gradient");
        assert!(graph.spec.passes.contains_key("gradient"));
        assert_eq!(graph.spec.output.as_deref(), Some("gradient"));
    }
}
