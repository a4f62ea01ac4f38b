//! Two-phase topology parser.
//!
//! Phase one scans the text line by line, registering nodes and collecting
//! raw edge lists against the current node. Phase two links the collected
//! lists once every node is known.

use crate::classify::{classify, BannerKind, Classified};
use crate::collect::EdgeCollector;
use crate::extract::Registry;
use crate::graph::{Graph, SubTopology};
use crate::link::link;
use crate::properties::Properties;
use topolens_core::TopologyResult;

/// Parse a topology description into a [`Graph`]
///
/// # Errors
///
/// Returns [`topolens_core::TopologyError::DuplicateNode`] when an id is
/// declared twice and [`topolens_core::TopologyError::UnresolvedReference`]
/// when an edge names an undeclared node. No partial graph is returned.
pub fn parse(text: &str) -> TopologyResult<Graph> {
    let mut registry = Registry::new();
    let mut collector = EdgeCollector::new();
    let mut subtopologies: Vec<SubTopology> = Vec::new();
    let mut group: Option<usize> = None;
    let mut properties = Properties::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let classified = classify(raw);
        tracing::trace!(line, ?classified, "classified line");

        match classified {
            Classified::Blank => {}
            Classified::Directive(props) => properties.merge(props),
            Classified::Banner(banner) => {
                if banner.resets_context() {
                    collector.reset();
                }
                match banner {
                    BannerKind::Topologies => group = None,
                    BannerKind::SubTopology { label, comment } => {
                        subtopologies.push(SubTopology::new(label, comment));
                        group = Some(subtopologies.len() - 1);
                    }
                    BannerKind::Noise => {}
                }
            }
            Classified::NodeDeclaration(decl) => {
                let node = registry.declare(&decl, line, group)?;
                if let Some(current) = group.and_then(|g| subtopologies.get_mut(g)) {
                    current.push_member(decl.id.into());
                }
                collector.begin_node(node);
            }
            Classified::Edge { direction, ids } => collector.collect(direction, &ids, line),
        }
    }

    let mut nodes = registry.into_nodes();
    let edge_count = link(&mut nodes, collector.into_pending())?;
    tracing::debug!(
        nodes = nodes.len(),
        edges = edge_count,
        subtopologies = subtopologies.len(),
        "parsed topology"
    );
    Ok(Graph::from_parts(nodes, subtopologies, properties, edge_count))
}
