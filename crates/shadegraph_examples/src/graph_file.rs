use std::path::Path;

use anyhow::Context;
use shadegraph::prelude::{RenderGraph, RenderGraphSpec};

/// Parses a RON render graph; `id` keys the graph in program caches.
pub fn parse_graph_ron(id: &str, source: &str) -> anyhow::Result<RenderGraph> {
    let spec: RenderGraphSpec =
        ron::from_str(source).with_context(|| format!("invalid render graph '{id}'"))?;
    Ok(RenderGraph::new(id, spec))
}

/// Loads a RON render graph from disk, using the file stem as its id.
pub fn load_graph_ron(path: impl AsRef<Path>) -> anyhow::Result<RenderGraph> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let id = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "graph".to_string());
    parse_graph_ron(&id, &source)
}

#[cfg(test)]
mod tests {
    use shadegraph::prelude::{PassSpec, TextureSource};

    use super::*;

    #[test]
    fn parses_passes_edges_and_output() {
        let graph = parse_graph_ron(
            "demo",
            r#"(
                passes: {
                    "main": CircleField(params: (amplitude: 0.5)),
                    "post": BoxBlur(source: Pass("main"), params: (blur_amount: 0.2)),
                },
                output: Some("post"),
            )"#,
        )
        .expect("graph parses");

        assert_eq!(graph.id, "demo");
        assert_eq!(graph.spec.output.as_deref(), Some("post"));
        assert_eq!(
            graph.spec.passes["main"],
            PassSpec::circle_field(0.5, 1.0)
        );
        assert_eq!(
            graph.spec.passes["post"],
            PassSpec::box_blur_from(TextureSource::pass("main"), 0.2)
        );
    }

    #[test]
    fn shipped_graph_files_parse() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/graphs/main_then_blur.ron");
        let graph = load_graph_ron(path).expect("graph loads");
        assert_eq!(graph.id, "main_then_blur");
        assert_eq!(graph.spec.passes.len(), 2);
    }
}
