//! Compiler for render graph specifications into executable programs.
//!
//! This module turns a [`RenderGraphSpec`] into a runnable [`RenderProgram`].
//! It validates every pass-to-slot edge, resolves the output pass, computes a
//! topological order for evaluation and, unless asked otherwise via
//! [`CompileOptions`], drops passes that do not contribute to the output.
//!
//! Typical usage:
//! - [`RenderGraphCompiler`] with [`RenderGraphCompiler::compile`]
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::{Error, Result};
use crate::passgraph::spec::RenderGraphSpec;
use crate::passgraph::{PassId, PassMeta, RenderProgram};

/// Options for compiling a render graph.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CompileOptions {
    /// Keep passes whose output never reaches the frame output.
    pub include_unreachable: bool,
}

/// Compiler for render graph specifications into executable programs.
pub struct RenderGraphCompiler;

impl RenderGraphCompiler {
    /// Compiles a render graph specification into a [`RenderProgram`], applying the given options.
    pub fn compile(spec: &RenderGraphSpec, opts: &CompileOptions) -> Result<RenderProgram> {
        if spec.passes.is_empty() {
            return Err(Error::Compile("Render graph has no passes".into()));
        }

        // Sorted view keeps ordering and error messages deterministic.
        let sorted: BTreeMap<&PassId, _> = spec.passes.iter().collect();

        let mut consumers: HashMap<PassId, Vec<PassId>> = HashMap::new();
        for (id, pass) in &sorted {
            for input in pass.pass_inputs() {
                if input == *id {
                    return Err(Error::Compile(format!(
                        "Pass '{}' reads its own output",
                        id
                    )));
                }
                if !spec.passes.contains_key(input) {
                    return Err(Error::Compile(format!(
                        "Pass '{}' reads unknown pass '{}'",
                        id, input
                    )));
                }
                consumers
                    .entry(input.clone())
                    .or_default()
                    .push((*id).clone());
            }
        }

        let topo = topo_sort(spec, &sorted)?;
        let output = resolve_output(spec, &sorted, &consumers)?;

        let keep: HashSet<PassId> = if opts.include_unreachable {
            spec.passes.keys().cloned().collect()
        } else {
            ancestors_of(spec, &output)
        };

        let passes: HashMap<PassId, PassMeta> = keep
            .iter()
            .map(|id| {
                let mut readers: Vec<PassId> = consumers
                    .get(id)
                    .map(|c| c.iter().filter(|r| keep.contains(*r)).cloned().collect())
                    .unwrap_or_default();
                readers.sort();
                readers.dedup();
                (
                    id.clone(),
                    PassMeta {
                        id: id.clone(),
                        spec: spec.passes[id].clone(),
                        consumers: readers,
                    },
                )
            })
            .collect();

        let topo = topo.into_iter().filter(|id| keep.contains(id)).collect();

        Ok(RenderProgram {
            passes,
            topo,
            output,
        })
    }
}

fn resolve_output(
    spec: &RenderGraphSpec,
    sorted: &BTreeMap<&PassId, &crate::passgraph::PassSpec>,
    consumers: &HashMap<PassId, Vec<PassId>>,
) -> Result<PassId> {
    if let Some(output) = &spec.output {
        if !spec.passes.contains_key(output) {
            return Err(Error::Compile(format!(
                "Output pass '{}' does not exist",
                output
            )));
        }
        return Ok(output.clone());
    }

    let sinks: Vec<&PassId> = sorted
        .keys()
        .copied()
        .filter(|id| !consumers.contains_key(*id))
        .collect();

    match sinks.as_slice() {
        [only] => Ok((*only).clone()),
        _ => Err(Error::Compile(format!(
            "Cannot infer output: {} passes are not read by any other pass ({:?}); set an output",
            sinks.len(),
            sinks
        ))),
    }
}

fn ancestors_of(spec: &RenderGraphSpec, output: &str) -> HashSet<PassId> {
    let mut seen: HashSet<PassId> = HashSet::new();
    let mut stack: Vec<&str> = vec![output];

    while let Some(id) = stack.pop() {
        if !seen.insert(id.to_string()) {
            continue;
        }
        if let Some(pass) = spec.passes.get(id) {
            for input in pass.pass_inputs() {
                stack.push(input.as_str());
            }
        }
    }

    seen
}

fn topo_sort(
    spec: &RenderGraphSpec,
    sorted: &BTreeMap<&PassId, &crate::passgraph::PassSpec>,
) -> Result<Vec<PassId>> {
    let mut indeg: BTreeMap<&str, usize> = BTreeMap::new();
    let mut dependents: HashMap<&str, BTreeMap<&str, usize>> = HashMap::new();

    for (id, pass) in sorted {
        let id_str = id.as_str();
        let inputs = pass.pass_inputs();
        indeg.insert(id_str, inputs.len());

        for input in inputs {
            dependents
                .entry(input.as_str())
                .or_default()
                .entry(id_str)
                .and_modify(|count| *count += 1)
                .or_insert(1);
        }
    }

    // Reverse-sorted stack so passes pop in ascending id order.
    let mut q: Vec<&str> = indeg
        .iter()
        .rev()
        .filter_map(|(k, &v)| if v == 0 { Some(*k) } else { None })
        .collect();
    let mut out: Vec<PassId> = Vec::with_capacity(spec.passes.len());

    while let Some(n) = q.pop() {
        out.push(n.to_string());

        if let Some(children) = dependents.get(n) {
            for (child, count) in children.iter().rev() {
                if let Some(e) = indeg.get_mut(child) {
                    *e = e.saturating_sub(*count);
                    if *e == 0 {
                        q.push(*child);
                    }
                }
            }
        }
    }

    if out.len() != spec.passes.len() {
        let stuck: Vec<&str> = indeg
            .iter()
            .filter_map(|(k, &v)| if v > 0 { Some(*k) } else { None })
            .collect();
        return Err(Error::Compile(format!(
            "Cycle detected between passes {:?}",
            stuck
        )));
    }

    Ok(out)
}
