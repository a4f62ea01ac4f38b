//! Edge collection during the scan.
//!
//! Edge lines are attached to the most recently declared node as raw
//! identifier lists. Nothing is resolved here; forward references to
//! nodes declared further down are legal.

use topolens_core::EdgeDirection;

/// An identifier as written on an edge line
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawRef {
    pub(crate) id: String,
    pub(crate) line: usize,
}

/// Unresolved edge lists of one node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PendingEdges {
    pub(crate) forward: Vec<RawRef>,
    pub(crate) backward: Vec<RawRef>,
}

/// Collects edge lines, indexed in parallel with the node registry
#[derive(Debug, Default)]
pub(crate) struct EdgeCollector {
    pending: Vec<PendingEdges>,
    current: Option<usize>,
}

impl EdgeCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Make `index` the node that subsequent edge lines belong to
    pub(crate) fn begin_node(&mut self, index: usize) {
        if self.pending.len() <= index {
            self.pending.resize_with(index + 1, PendingEdges::default);
        }
        self.current = Some(index);
    }

    /// Forget the current node
    pub(crate) fn reset(&mut self) {
        self.current = None;
    }

    /// Attach an edge line to the current node
    ///
    /// Lines seen before any node are dropped.
    pub(crate) fn collect(&mut self, direction: EdgeDirection, ids: &[&str], line: usize) {
        let Some(edges) = self.current.and_then(|i| self.pending.get_mut(i)) else {
            tracing::warn!(line, %direction, "edge line without a preceding node ignored");
            return;
        };
        let list = match direction {
            EdgeDirection::Forward => &mut edges.forward,
            EdgeDirection::Backward => &mut edges.backward,
        };
        list.extend(ids.iter().map(|id| RawRef {
            id: (*id).to_string(),
            line,
        }));
    }

    pub(crate) fn into_pending(self) -> Vec<PendingEdges> {
        self.pending
    }
}
