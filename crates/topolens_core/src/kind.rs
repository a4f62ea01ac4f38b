//! Node kinds.

use serde::{Deserialize, Serialize};

/// Node kind - the role a node plays in the topology
///
/// Kinds differ only in the attribute key their declaration line is
/// expected to carry; parsing and linking treat all three alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Reads records from one or more topics
    Source,
    /// Transforms records, optionally backed by state stores
    Processor,
    /// Writes records to a topic
    Sink,
}

impl NodeKind {
    /// All kinds, in declaration-prefix matching order
    pub const ALL: [NodeKind; 3] = [NodeKind::Source, NodeKind::Processor, NodeKind::Sink];

    /// Keyword that introduces a declaration of this kind (without the colon)
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Source => "Source",
            Self::Processor => "Processor",
            Self::Sink => "Sink",
        }
    }

    /// Attribute key the declaration usually carries
    #[must_use]
    pub const fn expected_attribute(&self) -> &'static str {
        match self {
            Self::Source => "topics",
            Self::Processor => "stores",
            Self::Sink => "topic",
        }
    }

    /// Resolve a declaration keyword, ignoring ASCII case
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.keyword().eq_ignore_ascii_case(keyword))
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}
