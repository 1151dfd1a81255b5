//! Cache for compiled render programs.
//!
//! This module provides a cache that maps render graph ids to compiled [`RenderProgram`]s,
//! recompiling entries when the associated [`RenderGraphSpec`] fingerprint changes. An
//! edited graph is therefore picked up on the next frame without any explicit reload.
//!
//! Typical usage:
//! - Look up a program with [`RenderProgramCache::get_or_compile`] by passing a
//!   [`RenderGraph`] and [`CompileOptions`].
//! - Share one cache across frames; lookups take `&self` and hand out [`Arc`]s.
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::Result;
use crate::passgraph::compiler::{CompileOptions, RenderGraphCompiler};
use crate::passgraph::{PassSpec, RenderGraph, RenderGraphSpec, RenderProgram, TextureSource};

struct ProgramEntry {
    program: Arc<RenderProgram>,
    fingerprint: u64,
}

/// Cache for compiled render programs, keyed by graph id and invalidated by specification fingerprint.
pub struct RenderProgramCache {
    entries: RwLock<HashMap<String, ProgramEntry>>,
}

impl RenderProgramCache {
    /// Creates a new, empty cache.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Gets the compiled program for the given graph id, if it exists in the cache.
    pub fn get(&self, graph_id: &str) -> Option<Arc<RenderProgram>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(graph_id).map(|e| Arc::clone(&e.program))
    }

    /// Inserts a compiled program into the cache with the given graph id and specification fingerprint.
    pub fn insert(&self, graph_id: impl Into<String>, fingerprint: u64, program: RenderProgram) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            graph_id.into(),
            ProgramEntry {
                fingerprint,
                program: Arc::new(program),
            },
        );
    }

    /// Removes the compiled program for the given graph id, returning it if it existed.
    pub fn remove(&self, graph_id: &str) -> Option<Arc<RenderProgram>> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(graph_id).map(|e| e.program)
    }

    /// Clears all entries from the cache.
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
    }

    /// Number of cached programs.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gets the compiled program for the given [`RenderGraph`], compiling and caching it if necessary.
    pub fn get_or_compile(
        &self,
        graph: &RenderGraph,
        opts: &CompileOptions,
    ) -> Result<Arc<RenderProgram>> {
        let fp = fingerprint(&graph.spec, opts);

        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = entries.get(&graph.id) {
                if entry.fingerprint == fp {
                    return Ok(Arc::clone(&entry.program));
                }
            }
        }

        let program = Arc::new(RenderGraphCompiler::compile(&graph.spec, opts)?);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            graph.id.clone(),
            ProgramEntry {
                program: Arc::clone(&program),
                fingerprint: fp,
            },
        );
        Ok(program)
    }
}

impl Default for RenderProgramCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash of everything in `spec` and `opts` that affects compilation.
pub fn fingerprint(spec: &RenderGraphSpec, opts: &CompileOptions) -> u64 {
    let mut hasher = DefaultHasher::new();

    let mut ids: Vec<&String> = spec.passes.keys().collect();
    ids.sort();

    for id in ids {
        id.hash(&mut hasher);
        let pass = &spec.passes[id];

        let kind_tag: u8 = match pass {
            PassSpec::CircleField { .. } => 1,
            PassSpec::Gradient => 2,
            PassSpec::RadialField => 3,
            PassSpec::AnimatedRadial { .. } => 4,
            PassSpec::BoxBlur { .. } => 5,
        };
        kind_tag.hash(&mut hasher);

        for source in pass.texture_inputs() {
            match source {
                TextureSource::External(tex) => {
                    0u8.hash(&mut hasher);
                    tex.hash(&mut hasher);
                }
                TextureSource::Pass(input) => {
                    1u8.hash(&mut hasher);
                    input.hash(&mut hasher);
                }
            }
        }

        match pass {
            PassSpec::CircleField { params } => {
                params.amplitude.to_bits().hash(&mut hasher);
                params.ramp_frequency.to_bits().hash(&mut hasher);
            }
            PassSpec::BoxBlur { params, .. } => {
                params.blur_amount.to_bits().hash(&mut hasher);
            }
            _ => {}
        }
    }

    spec.output.hash(&mut hasher);
    opts.include_unreachable.hash(&mut hasher);

    hasher.finish()
}
