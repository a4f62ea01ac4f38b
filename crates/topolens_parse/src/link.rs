//! Edge linking post-pass.
//!
//! Resolves every pending identifier against the registry and installs
//! each edge on both of its ends. Edges declared from both sides, or more
//! than once, collapse into one because both ends are ordered sets.

use crate::collect::{PendingEdges, RawRef};
use crate::graph::Node;
use indexmap::IndexMap;
use topolens_core::{EdgeDirection, NodeId, TopologyError, TopologyResult};

/// Link pending edge lists into `nodes`, returning the number of distinct edges
///
/// `pending[i]` belongs to the node at index `i`.
///
/// # Errors
///
/// Returns [`TopologyError::UnresolvedReference`] for the first identifier
/// that names no declared node
pub(crate) fn link(
    nodes: &mut IndexMap<NodeId, Node>,
    pending: Vec<PendingEdges>,
) -> TopologyResult<usize> {
    let mut installed = 0;
    for (index, edges) in pending.into_iter().enumerate() {
        for reference in &edges.forward {
            let target = resolve(nodes, index, reference, EdgeDirection::Forward)?;
            installed += usize::from(install(nodes, index, target));
        }
        for reference in &edges.backward {
            let source = resolve(nodes, index, reference, EdgeDirection::Backward)?;
            installed += usize::from(install(nodes, source, index));
        }
    }
    tracing::debug!(nodes = nodes.len(), edges = installed, "linked topology");
    Ok(installed)
}

fn resolve(
    nodes: &IndexMap<NodeId, Node>,
    owner: usize,
    reference: &RawRef,
    direction: EdgeDirection,
) -> TopologyResult<usize> {
    nodes
        .get_index_of(reference.id.as_str())
        .ok_or_else(|| TopologyError::UnresolvedReference {
            id: reference.id.clone(),
            referenced_by: nodes[owner].id().clone(),
            direction,
            line: reference.line,
        })
}

/// Install `from -> to` on both ends; true if the edge is new
fn install(nodes: &mut IndexMap<NodeId, Node>, from: usize, to: usize) -> bool {
    let from_id = nodes[from].id().clone();
    let to_id = nodes[to].id().clone();
    let added_out = nodes[from].outgoing_mut().insert(to_id);
    let added_in = nodes[to].incoming_mut().insert(from_id);
    debug_assert_eq!(added_out, added_in, "edge ends out of sync");
    added_out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Attributes;
    use topolens_core::NodeKind;

    fn registry(ids: &[&str]) -> IndexMap<NodeId, Node> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| {
                let node = Node::new(
                    NodeId::new(*id),
                    NodeKind::Processor,
                    Attributes::new(),
                    "",
                    i + 1,
                    None,
                );
                (NodeId::new(*id), node)
            })
            .collect()
    }

    fn refs(ids: &[&str]) -> Vec<RawRef> {
        ids.iter()
            .map(|id| RawRef {
                id: (*id).to_string(),
                line: 1,
            })
            .collect()
    }

    fn ids(set: &indexmap::IndexSet<NodeId>) -> Vec<&str> {
        set.iter().map(NodeId::as_str).collect()
    }

    #[test]
    fn test_forward_installs_both_ends() {
        let mut nodes = registry(&["a", "b"]);
        let pending = vec![PendingEdges {
            forward: refs(&["b"]),
            backward: Vec::new(),
        }];
        assert_eq!(link(&mut nodes, pending).unwrap(), 1);
        assert_eq!(ids(nodes["a"].outgoing()), vec!["b"]);
        assert_eq!(ids(nodes["b"].incoming()), vec!["a"]);
        assert!(nodes["a"].incoming().is_empty());
    }

    #[test]
    fn test_backward_installs_both_ends() {
        let mut nodes = registry(&["a", "b"]);
        let pending = vec![
            PendingEdges::default(),
            PendingEdges {
                forward: Vec::new(),
                backward: refs(&["a"]),
            },
        ];
        assert_eq!(link(&mut nodes, pending).unwrap(), 1);
        assert_eq!(ids(nodes["a"].outgoing()), vec!["b"]);
        assert_eq!(ids(nodes["b"].incoming()), vec!["a"]);
    }

    #[test]
    fn test_redundant_declarations_collapse() {
        let mut nodes = registry(&["a", "b"]);
        let pending = vec![
            PendingEdges {
                forward: refs(&["b", "b"]),
                backward: Vec::new(),
            },
            PendingEdges {
                forward: Vec::new(),
                backward: refs(&["a"]),
            },
        ];
        assert_eq!(link(&mut nodes, pending).unwrap(), 1);
        assert_eq!(nodes["a"].outgoing().len(), 1);
        assert_eq!(nodes["b"].incoming().len(), 1);
    }

    #[test]
    fn test_order_is_first_established() {
        let mut nodes = registry(&["m", "x", "y"]);
        let pending = vec![
            PendingEdges {
                forward: Vec::new(),
                backward: refs(&["y", "x"]),
            },
            PendingEdges {
                forward: refs(&["m"]),
                backward: Vec::new(),
            },
        ];
        link(&mut nodes, pending).unwrap();
        assert_eq!(ids(nodes["m"].incoming()), vec!["y", "x"]);
    }

    #[test]
    fn test_self_reference_kept_when_explicit() {
        let mut nodes = registry(&["loop"]);
        let pending = vec![PendingEdges {
            forward: refs(&["loop"]),
            backward: Vec::new(),
        }];
        assert_eq!(link(&mut nodes, pending).unwrap(), 1);
        assert_eq!(ids(nodes["loop"].outgoing()), vec!["loop"]);
        assert_eq!(ids(nodes["loop"].incoming()), vec!["loop"]);
    }

    #[test]
    fn test_unresolved_reference() {
        let mut nodes = registry(&["a"]);
        let pending = vec![PendingEdges {
            forward: Vec::new(),
            backward: vec![RawRef {
                id: "ghost".to_string(),
                line: 7,
            }],
        }];
        let err = link(&mut nodes, pending).unwrap_err();
        assert_eq!(
            err,
            TopologyError::UnresolvedReference {
                id: "ghost".to_string(),
                referenced_by: NodeId::new("a"),
                direction: EdgeDirection::Backward,
                line: 7,
            }
        );
    }
}
