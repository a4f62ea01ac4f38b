//! Topology graph produced by the parser.
//!
//! The graph is built once by [`crate::parse`] and is read-only afterwards.
//! Edges are stored on both ends: if `b` is in `a.outgoing()` then `a` is in
//! `b.incoming()`, and the other way round.

use crate::properties::Properties;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use topolens_core::{NodeId, NodeKind, TopologyResult};

/// Attribute values by key, in declaration order
pub type Attributes = IndexMap<String, Vec<String>>;

/// A declared source, processor or sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    id: NodeId,
    kind: NodeKind,
    attributes: Attributes,
    #[serde(skip_serializing_if = "String::is_empty")]
    comment: String,
    outgoing: IndexSet<NodeId>,
    incoming: IndexSet<NodeId>,
    line: usize,
    #[serde(skip)]
    group: Option<usize>,
}

impl Node {
    pub(crate) fn new(
        id: NodeId,
        kind: NodeKind,
        attributes: Attributes,
        comment: &str,
        line: usize,
        group: Option<usize>,
    ) -> Self {
        Self {
            id,
            kind,
            attributes,
            comment: comment.to_string(),
            outgoing: IndexSet::new(),
            incoming: IndexSet::new(),
            line,
            group,
        }
    }

    /// Node identifier
    #[must_use]
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// Node kind
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// All attributes
    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Values of one attribute; empty if the key is absent
    #[must_use]
    pub fn values(&self, key: &str) -> &[String] {
        self.attributes.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Free text following the attribute clause
    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Downstream neighbours, in the order the edges were established
    #[must_use]
    pub fn outgoing(&self) -> &IndexSet<NodeId> {
        &self.outgoing
    }

    /// Upstream neighbours, in the order the edges were established
    #[must_use]
    pub fn incoming(&self) -> &IndexSet<NodeId> {
        &self.incoming
    }

    /// Line of the declaration (1-based)
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Index of the enclosing sub-topology, if any
    #[must_use]
    pub fn group(&self) -> Option<usize> {
        self.group
    }

    pub(crate) fn outgoing_mut(&mut self) -> &mut IndexSet<NodeId> {
        &mut self.outgoing
    }

    pub(crate) fn incoming_mut(&mut self) -> &mut IndexSet<NodeId> {
        &mut self.incoming
    }
}

/// A `Sub-topology:` grouping
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubTopology {
    label: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    comment: String,
    members: Vec<NodeId>,
}

impl SubTopology {
    pub(crate) fn new(label: &str, comment: &str) -> Self {
        Self {
            label: label.to_string(),
            comment: comment.to_string(),
            members: Vec::new(),
        }
    }

    /// Label printed after `Sub-topology:`
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Text following the label
    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Member node ids in declaration order
    #[must_use]
    pub fn members(&self) -> &[NodeId] {
        &self.members
    }

    /// Whether the group feeds a global state store
    #[must_use]
    pub fn is_global_store(&self) -> bool {
        let comment = self.comment.to_ascii_lowercase();
        comment
            .find("global")
            .is_some_and(|at| comment[at..].contains("store"))
    }

    pub(crate) fn push_member(&mut self, id: NodeId) {
        self.members.push(id);
    }
}

/// Parsed topology
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Graph {
    nodes: IndexMap<NodeId, Node>,
    subtopologies: Vec<SubTopology>,
    #[serde(skip_serializing_if = "Properties::is_empty")]
    properties: Properties,
    edge_count: usize,
}

impl Graph {
    pub(crate) fn from_parts(
        nodes: IndexMap<NodeId, Node>,
        subtopologies: Vec<SubTopology>,
        properties: Properties,
        edge_count: usize,
    ) -> Self {
        Self {
            nodes,
            subtopologies,
            properties,
            edge_count,
        }
    }

    /// Parse a topology description
    ///
    /// # Errors
    ///
    /// See [`crate::parse`]
    pub fn parse(text: &str) -> TopologyResult<Self> {
        crate::parser::parse(text)
    }

    /// Number of distinct nodes
    #[must_use]
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct edges
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Check if the graph has no nodes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look a node up by id
    #[must_use]
    pub fn find_for_id(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Nodes in declaration order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Nodes of one kind, in declaration order
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes().filter(move |n| n.kind == kind)
    }

    /// Resolved downstream neighbours of a node
    pub fn successors<'a>(&'a self, node: &'a Node) -> impl Iterator<Item = &'a Node> + 'a {
        node.outgoing.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Resolved upstream neighbours of a node
    pub fn predecessors<'a>(&'a self, node: &'a Node) -> impl Iterator<Item = &'a Node> + 'a {
        node.incoming.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Sub-topology groups in declaration order
    #[must_use]
    pub fn subtopologies(&self) -> &[SubTopology] {
        &self.subtopologies
    }

    /// Nodes declared outside any sub-topology
    pub fn orphans(&self) -> impl Iterator<Item = &Node> {
        self.nodes().filter(|n| n.group.is_none())
    }

    /// Directive properties
    #[must_use]
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Directive property or the given default
    #[must_use]
    pub fn property<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.properties.get_or(key, default)
    }
}

fn write_node(f: &mut std::fmt::Formatter<'_>, node: &Node) -> std::fmt::Result {
    write!(f, "{}: {} '{}' data: {{", node.id, node.kind, node.comment)?;
    for (i, (key, values)) in node.attributes.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}: [{}]", key, values.join(", "))?;
    }
    writeln!(f, "}}")?;
    for (marker, ids) in [("-->", &node.outgoing), ("<--", &node.incoming)] {
        if !ids.is_empty() {
            let ids: Vec<&str> = ids.iter().map(NodeId::as_str).collect();
            writeln!(f, "    {} {}", marker, ids.join(", "))?;
        }
    }
    Ok(())
}

impl std::fmt::Display for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Topology: {} nodes, {} edges",
            self.size(),
            self.edge_count
        )?;
        for group in &self.subtopologies {
            writeln!(f, "Sub-topology: {} {}", group.label, group.comment)?;
            for node in group.members.iter().filter_map(|id| self.nodes.get(id)) {
                f.write_str("  ")?;
                write_node(f, node)?;
            }
        }
        let mut orphans = self.orphans().peekable();
        if orphans.peek().is_some() {
            writeln!(f, "Orphans:")?;
            for node in orphans {
                f.write_str("  ")?;
                write_node(f, node)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_node(id: &str, kind: NodeKind, group: Option<usize>) -> Node {
        let mut attributes = Attributes::new();
        attributes.insert(kind.expected_attribute().to_string(), vec!["t".to_string()]);
        Node::new(NodeId::new(id), kind, attributes, "", 1, group)
    }

    fn make_graph() -> Graph {
        let mut nodes = IndexMap::new();
        let mut src = make_node("src", NodeKind::Source, Some(0));
        let mut sink = make_node("sink", NodeKind::Sink, None);
        src.outgoing_mut().insert(NodeId::new("sink"));
        sink.incoming_mut().insert(NodeId::new("src"));
        nodes.insert(src.id().clone(), src);
        nodes.insert(sink.id().clone(), sink);

        let mut group = SubTopology::new("0", "");
        group.push_member(NodeId::new("src"));
        Graph::from_parts(nodes, vec![group], Properties::new(), 1)
    }

    #[test]
    fn test_graph_empty() {
        let graph = Graph::default();
        assert!(graph.is_empty());
        assert_eq!(graph.size(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.find_for_id("x").is_none());
    }

    #[test]
    fn test_graph_lookup_and_neighbours() {
        let graph = make_graph();
        assert_eq!(graph.size(), 2);

        let src = graph.find_for_id("src").unwrap();
        let succ: Vec<&str> = graph.successors(src).map(|n| n.id().as_str()).collect();
        assert_eq!(succ, vec!["sink"]);

        let sink = graph.find_for_id("sink").unwrap();
        let pred: Vec<&str> = graph.predecessors(sink).map(|n| n.id().as_str()).collect();
        assert_eq!(pred, vec!["src"]);
    }

    #[test]
    fn test_orphans_and_kinds() {
        let graph = make_graph();
        let orphans: Vec<&str> = graph.orphans().map(|n| n.id().as_str()).collect();
        assert_eq!(orphans, vec!["sink"]);
        assert_eq!(graph.nodes_of_kind(NodeKind::Source).count(), 1);
        assert_eq!(graph.nodes_of_kind(NodeKind::Processor).count(), 0);
    }

    #[test]
    fn test_node_values() {
        let node = make_node("src", NodeKind::Source, None);
        assert_eq!(node.values("topics"), ["t".to_string()]);
        assert!(node.values("stores").is_empty());
    }

    #[test]
    fn test_global_store_detection() {
        assert!(SubTopology::new("0", "for global store (will not generate tasks)").is_global_store());
        assert!(SubTopology::new("1", "GLOBAL state STORE").is_global_store());
        assert!(!SubTopology::new("2", "store before global").is_global_store());
        assert!(!SubTopology::new("3", "").is_global_store());
    }

    #[test]
    fn test_display_lists_edges() {
        let text = format!("{}", make_graph());
        assert!(text.starts_with("Topology: 2 nodes, 1 edges"));
        assert!(text.contains("src: Source '' data: {topics: [t]}"));
        assert!(text.contains("--> sink"));
        assert!(text.contains("<-- src"));
        assert!(text.contains("Orphans:"));
    }

    #[test]
    fn test_serialize_graph() {
        let json = serde_json::to_value(make_graph()).unwrap();
        assert_eq!(json["nodes"]["src"]["kind"], "Source");
        assert_eq!(json["nodes"]["src"]["outgoing"][0], "sink");
        assert_eq!(json["edge_count"], 1);
    }
}
