//! Error types for topology parsing.
//!
//! Only structural inconsistencies are errors. Recoverable oddities in the
//! input (unknown lines, missing attribute clauses) are absorbed by the
//! parser and never reach this type.

use crate::{NodeId, NodeKind};
use serde::{Deserialize, Serialize};

/// Topology result type
pub type TopologyResult<T> = Result<T, TopologyError>;

/// Direction of an edge declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeDirection {
    /// `-->` line: the declaring node feeds the listed nodes
    Forward,
    /// `<--` line: the listed nodes feed the declaring node
    Backward,
}

impl EdgeDirection {
    /// Marker as printed in topology descriptions
    #[must_use]
    pub const fn marker(&self) -> &'static str {
        match self {
            Self::Forward => "-->",
            Self::Backward => "<--",
        }
    }
}

impl std::fmt::Display for EdgeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.marker())
    }
}

/// Structural parse failure
///
/// Line numbers are 1-based positions in the parsed text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    /// A node identifier was declared more than once
    #[error(
        "duplicate node '{id}': {kind} declared at line {line}, already declared as {first_kind} at line {first_line}"
    )]
    DuplicateNode {
        /// Conflicting identifier
        id: NodeId,
        /// Kind of the rejected declaration
        kind: NodeKind,
        /// Kind of the first declaration
        first_kind: NodeKind,
        /// Line of the rejected declaration
        line: usize,
        /// Line of the first declaration
        first_line: usize,
    },

    /// An edge line names a node that is never declared
    #[error("unresolved reference '{id}' in '{direction}' list of node '{referenced_by}' at line {line}")]
    UnresolvedReference {
        /// Identifier that could not be resolved
        id: String,
        /// Node whose edge list contains the identifier
        referenced_by: NodeId,
        /// Edge line direction
        direction: EdgeDirection,
        /// Line of the edge declaration
        line: usize,
    },
}

impl TopologyError {
    /// Line the error points at
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::DuplicateNode { line, .. } | Self::UnresolvedReference { line, .. } => *line,
        }
    }
}
