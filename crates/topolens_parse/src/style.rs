//! Diagram styling for topology nodes.
//!
//! Stream engines name generated processors after the operator that
//! created them (`KSTREAM-FILTER-…`, `KSTREAM-KEY-SELECT-…`). The name
//! picks the element shape and whether the operator may repartition.
//! Only the part after a `KSTREAM` marker is inspected, so table-side
//! processors such as `KTABLE-SOURCE-…` get the default style.

use crate::graph::Node;
use topolens_core::NodeKind;

/// Whether an operator may change record partitioning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partitioning {
    /// Keeps the upstream partitioning
    Inherited,
    /// May repartition depending on its inputs
    MayOn,
    /// Changes the key and therefore the partitioning
    On,
}

impl Partitioning {
    /// Fill colour used for elements with this partitioning
    #[must_use]
    pub const fn color(&self) -> &'static str {
        match self {
            Self::Inherited => "#BBFFBB",
            Self::MayOn => "#FFFFBB",
            Self::On => "#FFDEDE",
        }
    }
}

/// Shape and partitioning of one node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorStyle {
    /// PlantUML element keyword
    pub shape: &'static str,
    /// Partitioning behaviour
    pub partitioning: Partitioning,
}

/// Marker that precedes the operator fragment
const STREAM_MARKER: &str = "kstream";

/// Name fragments checked in order; more specific fragments come first
const OPERATORS: &[(&str, &str, Partitioning)] = &[
    ("printer", "file", Partitioning::Inherited),
    ("peek", "file", Partitioning::Inherited),
    ("foreach", "node", Partitioning::Inherited),
    ("processor", "node", Partitioning::Inherited),
    ("transformvalues", "cloud", Partitioning::Inherited),
    ("transform", "cloud", Partitioning::On),
    ("key-select", "rectangle", Partitioning::On),
    ("flatmapvalues", "rectangle", Partitioning::Inherited),
    ("flatmap", "rectangle", Partitioning::On),
    ("filter", "rectangle", Partitioning::Inherited),
    ("mapvalues", "rectangle", Partitioning::Inherited),
    ("map", "rectangle", Partitioning::On),
    ("merge", "usecase", Partitioning::MayOn),
    ("windowed", "frame", Partitioning::Inherited),
    ("join", "usecase", Partitioning::MayOn),
    ("outer", "usecase", Partitioning::MayOn),
    ("branch", "usecase", Partitioning::Inherited),
    ("source", "node", Partitioning::Inherited),
    ("sink", "node", Partitioning::Inherited),
];

impl OperatorStyle {
    const DEFAULT: Self = Self {
        shape: "rectangle",
        partitioning: Partitioning::Inherited,
    };

    /// Style for a node, from its kind and then its id
    #[must_use]
    pub fn for_node(node: &Node) -> Self {
        match node.kind() {
            NodeKind::Source | NodeKind::Sink => Self {
                shape: "node",
                partitioning: Partitioning::Inherited,
            },
            NodeKind::Processor => Self::for_name(node.id().as_str()),
        }
    }

    /// Style for a processor name
    #[must_use]
    pub fn for_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        let Some(at) = lower.find(STREAM_MARKER) else {
            return Self::DEFAULT;
        };
        let operator = &lower[at + STREAM_MARKER.len()..];
        OPERATORS
            .iter()
            .find(|(fragment, _, _)| operator.contains(fragment))
            .map_or(Self::DEFAULT, |&(_, shape, partitioning)| Self {
                shape,
                partitioning,
            })
    }

    /// Arrow linking a node of `kind` to one of its topics or stores
    #[must_use]
    pub const fn resource_link(kind: NodeKind) -> &'static str {
        match kind {
            NodeKind::Source => "<<=.=",
            NodeKind::Sink => "=.=>>",
            NodeKind::Processor => "=.=",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specific_before_general() {
        let tv = OperatorStyle::for_name("KSTREAM-TRANSFORMVALUES-0000000004");
        assert_eq!(tv.shape, "cloud");
        assert_eq!(tv.partitioning, Partitioning::Inherited);

        let t = OperatorStyle::for_name("KSTREAM-TRANSFORM-0000000001");
        assert_eq!(t.partitioning, Partitioning::On);

        let mv = OperatorStyle::for_name("KSTREAM-MAPVALUES-0000000002");
        assert_eq!(mv.partitioning, Partitioning::Inherited);
    }

    #[test]
    fn test_key_select_repartitions() {
        let style = OperatorStyle::for_name("KSTREAM-KEY-SELECT-0000000002");
        assert_eq!(style.shape, "rectangle");
        assert_eq!(style.partitioning.color(), "#FFDEDE");
    }

    #[test]
    fn test_merge_and_join() {
        assert_eq!(OperatorStyle::for_name("KSTREAM-MERGE-1").shape, "usecase");
        assert_eq!(
            OperatorStyle::for_name("KSTREAM-JOINTHIS-1").partitioning,
            Partitioning::MayOn
        );
    }

    #[test]
    fn test_unknown_name_falls_back() {
        assert_eq!(OperatorStyle::for_name("my-custom-step"), OperatorStyle::DEFAULT);
        assert_eq!(OperatorStyle::for_name("my-filter-step"), OperatorStyle::DEFAULT);
    }

    #[test]
    fn test_table_processors_use_default() {
        assert_eq!(
            OperatorStyle::for_name("KTABLE-SOURCE-0000000001"),
            OperatorStyle::DEFAULT
        );
        assert_eq!(
            OperatorStyle::for_name("KTABLE-TOSTREAM-0000000007"),
            OperatorStyle::DEFAULT
        );
        assert_eq!(OperatorStyle::for_name("KSTREAM-SOURCE-0000000000").shape, "node");
    }

    #[test]
    fn test_resource_links() {
        assert_eq!(OperatorStyle::resource_link(NodeKind::Source), "<<=.=");
        assert_eq!(OperatorStyle::resource_link(NodeKind::Sink), "=.=>>");
        assert_eq!(OperatorStyle::resource_link(NodeKind::Processor), "=.=");
    }
}
