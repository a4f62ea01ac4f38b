//! Node extraction: attribute clauses and the node registry.

use crate::classify::NodeDeclaration;
use crate::graph::{Attributes, Node};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use topolens_core::{NodeId, TopologyError, TopologyResult};

/// One `key: [a, b]` or `key: scalar` pair inside a clause
static ATTRIBUTE_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r",?\s*([A-Za-z_\-]+)\s*:\s*(?:\[(.*?)\]|(.*))").expect("attribute pattern is valid")
});

/// Parse the text between a declaration's parentheses
///
/// A bracketed value is split on commas and every element trimmed, so
/// `[]` yields a single empty value. A scalar value runs to the end of the
/// clause. Repeated keys append. Returns `None` when no pair is found.
#[must_use]
pub fn parse_attribute_clause(clause: &str) -> Option<Attributes> {
    let mut attributes = Attributes::new();
    for caps in ATTRIBUTE_PAIR.captures_iter(clause) {
        let Some(key) = caps.get(1) else { continue };
        let values = attributes.entry(key.as_str().to_string()).or_default();
        if let Some(list) = caps.get(2) {
            values.extend(list.as_str().split(',').map(|v| v.trim().to_string()));
        } else if let Some(scalar) = caps.get(3) {
            values.push(scalar.as_str().trim().to_string());
        }
    }
    (!attributes.is_empty()).then_some(attributes)
}

/// Ordered registry of declared nodes
#[derive(Debug, Default)]
pub(crate) struct Registry {
    nodes: IndexMap<NodeId, Node>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a declaration, returning the new node's index
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::DuplicateNode`] if the id is already declared
    pub(crate) fn declare(
        &mut self,
        decl: &NodeDeclaration<'_>,
        line: usize,
        group: Option<usize>,
    ) -> TopologyResult<usize> {
        if let Some(first) = self.nodes.get(decl.id) {
            return Err(TopologyError::DuplicateNode {
                id: first.id().clone(),
                kind: decl.kind,
                first_kind: first.kind(),
                line,
                first_line: first.line(),
            });
        }

        let attributes = match decl.clause {
            Some(clause) => parse_attribute_clause(clause).unwrap_or_else(|| {
                tracing::warn!(id = decl.id, line, clause, "malformed attribute clause");
                Attributes::new()
            }),
            None => {
                tracing::warn!(id = decl.id, line, "declaration without attribute clause");
                Attributes::new()
            }
        };

        let id = NodeId::new(decl.id);
        let node = Node::new(id.clone(), decl.kind, attributes, decl.comment, line, group);
        let (index, _) = self.nodes.insert_full(id, node);
        tracing::debug!(id = decl.id, kind = %decl.kind, line, "registered node");
        Ok(index)
    }

    pub(crate) fn into_nodes(self) -> IndexMap<NodeId, Node> {
        self.nodes
    }
}
