//! PlantUML rendering of a parsed topology.
//!
//! Rendering is a convenience for humans; it reads the graph and never
//! fails. Aliases are assigned in first-seen order so identical graphs
//! render to identical text.

use crate::graph::{Graph, Node};
use crate::properties::Properties;
use crate::style::OperatorStyle;
use indexmap::IndexMap;
use std::fmt;
use topolens_core::NodeId;

/// Directive key: lay the diagram out left to right
pub const PROPERTY_LAYOUT_HORIZ: &str = "layout.horiz";
/// Directive key: draw orthogonal edges
pub const PROPERTY_ORTHOGONAL: &str = "edge.ortho";
/// Directive key: group topics in a package
pub const PROPERTY_TOPICS_GROUP: &str = "group.topics";
/// Directive key: group stores in a package
pub const PROPERTY_STORE_GROUP: &str = "group.stores";

/// Diagram settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Diagram title
    pub title: Option<String>,
    /// Left-to-right instead of top-to-bottom
    pub horizontal: bool,
    /// Orthogonal line routing
    pub orthogonal: bool,
    /// Wrap topics in a `Topics` package
    pub group_topics: bool,
    /// Wrap stores in a `Stores` package
    pub group_stores: bool,
}

impl RenderOptions {
    /// Create options with default settings
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: None,
            horizontal: false,
            orthogonal: true,
            group_topics: true,
            group_stores: true,
        }
    }

    /// Read settings from document directives, falling back to defaults
    #[must_use]
    pub fn from_properties(properties: &Properties) -> Self {
        let defaults = Self::new();
        Self {
            title: None,
            horizontal: properties.flag(PROPERTY_LAYOUT_HORIZ, defaults.horizontal),
            orthogonal: properties.flag(PROPERTY_ORTHOGONAL, defaults.orthogonal),
            group_topics: properties.flag(PROPERTY_TOPICS_GROUP, defaults.group_topics),
            group_stores: properties.flag(PROPERTY_STORE_GROUP, defaults.group_stores),
        }
    }

    /// Write the settings back as directive properties
    #[must_use]
    pub fn to_properties(&self) -> Properties {
        [
            (PROPERTY_LAYOUT_HORIZ, self.horizontal),
            (PROPERTY_ORTHOGONAL, self.orthogonal),
            (PROPERTY_TOPICS_GROUP, self.group_topics),
            (PROPERTY_STORE_GROUP, self.group_stores),
        ]
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect()
    }

    /// Set title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set horizontal layout
    #[must_use]
    pub fn with_horizontal(mut self, horizontal: bool) -> Self {
        self.horizontal = horizontal;
        self
    }

    /// Set orthogonal edges
    #[must_use]
    pub fn with_orthogonal(mut self, orthogonal: bool) -> Self {
        self.orthogonal = orthogonal;
        self
    }

    /// Set topic grouping
    #[must_use]
    pub fn with_group_topics(mut self, group: bool) -> Self {
        self.group_topics = group;
        self
    }

    /// Set store grouping
    #[must_use]
    pub fn with_group_stores(mut self, group: bool) -> Self {
        self.group_stores = group;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Category of an attribute value drawn as its own element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ResourceKind {
    Topic,
    Store,
    Other,
}

impl ResourceKind {
    fn for_key(key: &str) -> Self {
        let key = key.trim().to_ascii_lowercase();
        if key.starts_with("topic") {
            Self::Topic
        } else if key.starts_with("store") {
            Self::Store
        } else {
            Self::Other
        }
    }

    const fn shape(self) -> &'static str {
        match self {
            Self::Topic => "queue",
            Self::Store => "database",
            Self::Other => "file",
        }
    }

    /// Labels at least this long are wrapped
    const fn wrap_at(self) -> usize {
        match self {
            Self::Topic => 32,
            Self::Store | Self::Other => 10,
        }
    }
}

/// Deterministic PlantUML aliases
///
/// Resources are keyed by kind as well as value, so a topic and a store
/// sharing a name stay two elements.
#[derive(Debug, Default)]
struct Aliases {
    nodes: IndexMap<NodeId, String>,
    resources: IndexMap<(ResourceKind, String), String>,
}

impl Aliases {
    fn build(graph: &Graph) -> Self {
        let mut aliases = Self::default();
        for (n, node) in graph.nodes().enumerate() {
            aliases
                .nodes
                .insert(node.id().clone(), format!("__tel_{}", n + 1));
        }
        for node in graph.nodes() {
            for (key, values) in node.attributes() {
                let kind = ResourceKind::for_key(key);
                for value in values.iter().filter(|v| !v.is_empty()) {
                    let next = aliases.resources.len() + 1;
                    aliases
                        .resources
                        .entry((kind, value.clone()))
                        .or_insert_with(|| format!("__dta_{}", next));
                }
            }
        }
        aliases
    }

    fn node(&self, id: &NodeId) -> &str {
        self.nodes.get(id).map_or("", String::as_str)
    }

    fn resource(&self, kind: ResourceKind, value: &str) -> Option<&str> {
        self.resources
            .get(&(kind, value.to_string()))
            .map(String::as_str)
    }
}

/// Renders graphs as PlantUML component diagrams
#[derive(Debug, Clone, Default)]
pub struct PlantUmlRenderer {
    options: RenderOptions,
}

impl PlantUmlRenderer {
    /// Create a renderer
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Renderer configured from the graph's own directives
    #[must_use]
    pub fn from_graph(graph: &Graph) -> Self {
        Self::new(RenderOptions::from_properties(graph.properties()))
    }

    /// Options in use
    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render a graph
    #[must_use]
    pub fn render(&self, graph: &Graph) -> String {
        Diagram {
            options: &self.options,
            graph,
            aliases: Aliases::build(graph),
        }
        .to_string()
    }
}

struct Diagram<'a> {
    options: &'a RenderOptions,
    graph: &'a Graph,
    aliases: Aliases,
}

impl Diagram<'_> {
    fn write_header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "@startuml")?;
        if self.options.horizontal {
            writeln!(f, "left to right direction")?;
        } else {
            writeln!(f, "top to bottom direction")?;
        }
        if self.options.orthogonal {
            writeln!(f, "skinparam linetype ortho")?;
        }
        writeln!(f)?;
        writeln!(f, "hide stereotype")?;
        writeln!(f, "skinparam ArrowThickness 3")?;
        writeln!(f, "skinparam rectangle {{")?;
        writeln!(f, "borderStyle<<Sub-Topologies>> dotted")?;
        writeln!(f, "borderColor<<Sub-Topologies>> Gray")?;
        writeln!(f, "borderThickness<<Sub-Topologies>> 2")?;
        writeln!(f, "roundCorner<<Sub-Topologies>> 25")?;
        writeln!(f, "shadowing<<Sub-Topologies>> false")?;
        writeln!(f, "}}")?;
        let title = self.options.title.as_deref().unwrap_or("Topology");
        writeln!(f, "title {}", escape(title))
    }

    fn write_node(&self, f: &mut fmt::Formatter<'_>, node: &Node, notes: &mut usize) -> fmt::Result {
        let style = OperatorStyle::for_node(node);
        let alias = self.aliases.node(node.id());
        writeln!(
            f,
            "{} \"{}\" as {} {}",
            style.shape,
            wrap_label(&escape(node.id().as_str()), 0),
            alias,
            style.partitioning.color()
        )?;
        if !node.comment().is_empty() {
            *notes += 1;
            writeln!(f, "note \"{}\" as __nte_{}", escape(node.comment()), notes)?;
            writeln!(f, "{} --> __nte_{}", alias, notes)?;
        }
        Ok(())
    }

    fn write_groups(&self, f: &mut fmt::Formatter<'_>, notes: &mut usize) -> fmt::Result {
        if self.graph.subtopologies().is_empty() {
            return Ok(());
        }
        writeln!(f, "rectangle \"Sub-topologies\" <<Sub-Topologies>> {{")?;
        for group in self.graph.subtopologies() {
            let color = if group.is_global_store() { "#FFDFFF" } else { "#DFDFFF" };
            writeln!(f, "package \"Sub-topology {}\" {} {{", escape(group.label()), color)?;
            if !group.comment().is_empty() {
                *notes += 1;
                writeln!(f, "note \"{}\" as __nte_{}", escape(group.comment()), notes)?;
            }
            for id in group.members() {
                if let Some(node) = self.graph.find_for_id(id.as_str()) {
                    self.write_node(f, node, notes)?;
                }
            }
            writeln!(f, "}}")?;
        }
        writeln!(f, "}}")
    }

    fn write_resources(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let packages = [
            (ResourceKind::Topic, "Topics", "#DFFFDF", self.options.group_topics),
            (ResourceKind::Store, "Stores", "#FED8B1", self.options.group_stores),
            (ResourceKind::Other, "Others", "#DDDDDD", true),
        ];
        for (kind, name, color, grouped) in packages {
            let mut members = self
                .aliases
                .resources
                .iter()
                .filter(|((k, _), _)| *k == kind)
                .peekable();
            if members.peek().is_none() {
                continue;
            }
            if grouped {
                writeln!(f, "package \"{}\" {} {{", name, color)?;
            }
            for ((_, value), alias) in members {
                let label = wrap_label(&escape(value), kind.wrap_at());
                writeln!(f, "{} \"{}\" as {}", kind.shape(), label, alias)?;
            }
            if grouped {
                writeln!(f, "}}")?;
            }
        }
        Ok(())
    }

    fn write_links(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in self.graph.nodes() {
            let alias = self.aliases.node(node.id());
            for target in node.outgoing() {
                writeln!(f, "{} -->> {}", alias, self.aliases.node(target))?;
            }
            let link = OperatorStyle::resource_link(node.kind());
            for (key, values) in node.attributes() {
                let kind = ResourceKind::for_key(key);
                for value in values {
                    if let Some(resource) = self.aliases.resource(kind, value) {
                        writeln!(f, "{} {} {}", alias, link, resource)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Diagram<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut notes = 0;
        self.write_header(f)?;
        self.write_groups(f, &mut notes)?;
        for node in self.graph.orphans() {
            self.write_node(f, node, &mut notes)?;
        }
        self.write_resources(f)?;
        self.write_links(f)?;
        writeln!(f, "@enduml")
    }
}

/// Make text safe inside a quoted PlantUML label
///
/// `&` and `|` are written as character references too; `|` would
/// otherwise open a table.
fn escape(text: &str) -> String {
    text.chars().fold(String::with_capacity(text.len()), |mut out, c| {
        match c {
            '"' => out.push('\''),
            c if c.is_ascii() && c != '&' && c != '|' => out.push(c),
            c => out.push_str(&format!("&#{};", u32::from(c))),
        }
        out
    })
}

/// Break a label after `-` and `_` and at spaces once it reaches `min_len` characters
fn wrap_label(label: &str, min_len: usize) -> String {
    if label.chars().count() < min_len {
        return label.to_string();
    }
    label
        .replace('-', "-\\n")
        .replace(' ', "\\n")
        .replace('_', "_\\n")
}
