//! Subcommand implementations. Each returns the text to print.

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use std::io::Read;
use std::path::Path;
use topolens_parse::{Graph, NodeId, NodeKind, PlantUmlRenderer, RenderOptions};

/// Command-line overrides for document directives
#[derive(Debug, Default)]
pub struct RenderOverrides {
    pub horizontal: bool,
    pub no_ortho: bool,
    pub no_group_topics: bool,
    pub no_group_stores: bool,
    pub title: Option<String>,
}

impl RenderOverrides {
    fn apply(&self, mut options: RenderOptions) -> RenderOptions {
        if self.horizontal {
            options = options.with_horizontal(true);
        }
        if self.no_ortho {
            options = options.with_orthogonal(false);
        }
        if self.no_group_topics {
            options = options.with_group_topics(false);
        }
        if self.no_group_stores {
            options = options.with_group_stores(false);
        }
        if let Some(title) = &self.title {
            options = options.with_title(title.clone());
        }
        options
    }
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .wrap_err("failed to read stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(input).wrap_err_with(|| format!("failed to read {}", input.display()))
    }
}

/// Read and parse a description
pub fn load(input: &Path) -> Result<Graph> {
    let text = read_input(input)?;
    let graph = topolens_parse::parse(&text)
        .wrap_err_with(|| format!("invalid topology in {}", input.display()))?;
    tracing::info!(
        input = %input.display(),
        nodes = graph.size(),
        edges = graph.edge_count(),
        "loaded topology"
    );
    Ok(graph)
}

/// Diagram title derived from the input file name
pub fn default_title(input: &Path) -> Option<String> {
    input
        .file_name()
        .filter(|_| input != Path::new("-"))
        .map(|name| format!("Topology \"{}\"", name.to_string_lossy()))
}

pub fn summary(graph: &Graph) -> String {
    let count = |kind| graph.nodes_of_kind(kind).count();
    format!(
        "nodes: {}\nedges: {}\nsub-topologies: {}\nsources: {}\nprocessors: {}\nsinks: {}\n",
        graph.size(),
        graph.edge_count(),
        graph.subtopologies().len(),
        count(NodeKind::Source),
        count(NodeKind::Processor),
        count(NodeKind::Sink),
    )
}

pub fn json(graph: &Graph) -> Result<String> {
    let mut text = serde_json::to_string_pretty(graph).wrap_err("failed to encode graph")?;
    text.push('\n');
    Ok(text)
}

pub fn plantuml(graph: &Graph, overrides: &RenderOverrides) -> String {
    let options = overrides.apply(RenderOptions::from_properties(graph.properties()));
    PlantUmlRenderer::new(options).render(graph)
}

fn id_list<'a>(ids: impl IntoIterator<Item = &'a NodeId>) -> String {
    let ids: Vec<&str> = ids.into_iter().map(NodeId::as_str).collect();
    if ids.is_empty() {
        "(none)".to_string()
    } else {
        ids.join(", ")
    }
}

pub fn lookup(graph: &Graph, id: &str) -> Result<String> {
    let node = graph
        .find_for_id(id)
        .ok_or_else(|| eyre!("node '{}' not found", id))?;

    let mut lines = vec![
        format!("id: {}", node.id()),
        format!("kind: {}", node.kind()),
        format!("line: {}", node.line()),
    ];
    if !node.comment().is_empty() {
        lines.push(format!("comment: {}", node.comment()));
    }
    lines.push("attributes:".to_string());
    lines.extend(
        node.attributes()
            .iter()
            .map(|(key, values)| format!("  {}: [{}]", key, values.join(", "))),
    );
    lines.push(format!("outgoing: {}", id_list(node.outgoing())));
    lines.push(format!("incoming: {}", id_list(node.incoming())));

    let mut out = lines.join("\n");
    out.push('\n');
    Ok(out)
}

pub fn check(graph: &Graph) -> String {
    format!("ok ({} nodes)\n", graph.size())
}
