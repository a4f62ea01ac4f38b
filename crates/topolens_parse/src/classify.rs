//! Line classifier for topology descriptions.
//!
//! Every input line maps to exactly one [`Classified`] variant. The format
//! is tolerant of decoration, so anything unrecognised becomes
//! [`BannerKind::Noise`] instead of an error.

use crate::properties::{Properties, DIRECTIVE_PREFIX};
use once_cell::sync::Lazy;
use regex::Regex;
use topolens_core::{EdgeDirection, NodeKind};

/// `-->` / `<--` with any number of dashes, followed by the id list
static EDGE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(<-+|-+>)(.*)$").expect("edge line pattern is valid"));

/// `<Keyword>: <tail>` header or declaration
static KEYWORD_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9_\- ]*?)\s*:(.*)$").expect("keyword line pattern is valid")
});

/// Marker the engine prints for an empty neighbour list
const NONE_MARKER: &str = "none";

/// Classification of one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified<'a> {
    /// Empty or whitespace-only line
    Blank,
    /// Header or decoration with no node content
    Banner(BannerKind<'a>),
    /// `//properties k=v;...` directive
    Directive(Properties),
    /// `Source:` / `Processor:` / `Sink:` line
    NodeDeclaration(NodeDeclaration<'a>),
    /// `-->` or `<--` line
    Edge {
        /// Marker direction
        direction: EdgeDirection,
        /// Referenced identifiers, trimmed, with empties and `none` dropped
        ids: Vec<&'a str>,
    },
}

/// Banner flavours
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BannerKind<'a> {
    /// `Topologies:`, `Topology`, `Sub-topologies:` and friends
    Topologies,
    /// `Sub-topology: <label> [comment]`
    SubTopology {
        /// First token after the colon
        label: &'a str,
        /// Remaining text, trimmed
        comment: &'a str,
    },
    /// Unrecognised decoration
    Noise,
}

impl BannerKind<'_> {
    /// Whether this banner closes the current node's edge context
    #[must_use]
    pub const fn resets_context(&self) -> bool {
        !matches!(self, Self::Noise)
    }
}

/// Pieces of a node declaration line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDeclaration<'a> {
    /// Declared kind
    pub kind: NodeKind,
    /// Identifier token
    pub id: &'a str,
    /// Text between the clause parentheses; `None` when there is no clause
    pub clause: Option<&'a str>,
    /// Text after the clause
    pub comment: &'a str,
}

/// Classify a single line
#[must_use]
pub fn classify(line: &str) -> Classified<'_> {
    let text = line.trim();
    if text.is_empty() {
        return Classified::Blank;
    }

    if let Some(rest) = text.strip_prefix(DIRECTIVE_PREFIX) {
        return Classified::Directive(Properties::parse_pairs(rest));
    }

    if let Some(caps) = EDGE_LINE.captures(text) {
        let direction = if caps[1].ends_with('>') {
            EdgeDirection::Forward
        } else {
            EdgeDirection::Backward
        };
        let ids = caps
            .get(2)
            .map_or("", |m| m.as_str())
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty() && !id.eq_ignore_ascii_case(NONE_MARKER))
            .collect();
        return Classified::Edge { direction, ids };
    }

    if is_topologies_header(text) {
        return Classified::Banner(BannerKind::Topologies);
    }

    let Some(caps) = KEYWORD_LINE.captures(text) else {
        return Classified::Banner(BannerKind::Noise);
    };
    let (Some(keyword), Some(tail)) = (caps.get(1), caps.get(2)) else {
        return Classified::Banner(BannerKind::Noise);
    };
    let keyword = keyword.as_str();
    let tail = tail.as_str().trim();

    if is_subtopology_keyword(keyword) {
        let (label, comment) = split_first_token(tail);
        return Classified::Banner(BannerKind::SubTopology { label, comment });
    }

    match NodeKind::from_keyword(keyword) {
        Some(kind) => declaration(kind, tail),
        None => Classified::Banner(BannerKind::Noise),
    }
}

fn declaration(kind: NodeKind, tail: &str) -> Classified<'_> {
    let id_end = tail
        .find(|c: char| c.is_whitespace() || c == '(')
        .unwrap_or(tail.len());
    let (id, rest) = tail.split_at(id_end);
    if id.is_empty() {
        tracing::warn!(kind = %kind, "declaration without identifier ignored");
        return Classified::Banner(BannerKind::Noise);
    }

    let rest = rest.trim();
    let (clause, comment) = match rest.strip_prefix('(').and_then(|inner| inner.split_once(')')) {
        Some((clause, comment)) => (Some(clause), comment.trim()),
        None => (None, rest),
    };

    Classified::NodeDeclaration(NodeDeclaration {
        kind,
        id,
        clause,
        comment,
    })
}

fn is_topologies_header(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    matches!(
        lower.as_str(),
        "topology" | "topology:" | "topologies" | "sub-topologies:"
    ) || lower.starts_with("topologies:")
}

fn is_subtopology_keyword(keyword: &str) -> bool {
    let lower = keyword.to_ascii_lowercase();
    lower.starts_with("sub") && lower.ends_with("topology")
}

fn split_first_token(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((token, rest)) => (token, rest.trim()),
        None => (text, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(line: &str) -> NodeDeclaration<'_> {
        match classify(line) {
            Classified::NodeDeclaration(decl) => decl,
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_lines() {
        assert_eq!(classify(""), Classified::Blank);
        assert_eq!(classify(" \t  \t"), Classified::Blank);
    }

    #[test]
    fn test_banners() {
        assert_eq!(classify("Topologies:"), Classified::Banner(BannerKind::Topologies));
        assert_eq!(classify("Topology"), Classified::Banner(BannerKind::Topologies));
        assert_eq!(classify("Sub-topologies:"), Classified::Banner(BannerKind::Topologies));
        assert_eq!(
            classify("   Sub-topology: 0"),
            Classified::Banner(BannerKind::SubTopology {
                label: "0",
                comment: ""
            })
        );
    }

    #[test]
    fn test_global_store_banner_comment() {
        assert_eq!(
            classify("Sub-topology: 0 for global store (will not generate tasks)"),
            Classified::Banner(BannerKind::SubTopology {
                label: "0",
                comment: "for global store (will not generate tasks)"
            })
        );
    }

    #[test]
    fn test_unknown_lines_are_noise() {
        assert_eq!(classify("none"), Classified::Banner(BannerKind::Noise));
        assert_eq!(classify("hello world"), Classified::Banner(BannerKind::Noise));
        assert_eq!(classify("Global: thing"), Classified::Banner(BannerKind::Noise));
        assert!(!BannerKind::Noise.resets_context());
        assert!(BannerKind::Topologies.resets_context());
    }

    #[test]
    fn test_source_declaration() {
        let d = decl("    Source: KSTREAM-SOURCE-0000000000 (topics: [a])");
        assert_eq!(d.kind, NodeKind::Source);
        assert_eq!(d.id, "KSTREAM-SOURCE-0000000000");
        assert_eq!(d.clause, Some("topics: [a]"));
        assert_eq!(d.comment, "");
    }

    #[test]
    fn test_declaration_with_tabs_and_double_space() {
        let d = decl("\tSource:  KSTREAM-SOURCE-0000000000 (topics: [conversation-meta])\t ");
        assert_eq!(d.id, "KSTREAM-SOURCE-0000000000");
        assert_eq!(d.clause, Some("topics: [conversation-meta]"));
    }

    #[test]
    fn test_declaration_without_clause() {
        let d = decl("Processor: lonely");
        assert_eq!(d.kind, NodeKind::Processor);
        assert_eq!(d.id, "lonely");
        assert_eq!(d.clause, None);
    }

    #[test]
    fn test_declaration_with_comment() {
        let d = decl("Sink: out (topic: c) written hourly");
        assert_eq!(d.clause, Some("topic: c"));
        assert_eq!(d.comment, "written hourly");
    }

    #[test]
    fn test_unclosed_clause_is_kept_as_comment() {
        let d = decl("Sink: out (topic: c");
        assert_eq!(d.clause, None);
        assert_eq!(d.comment, "(topic: c");
    }

    #[test]
    fn test_declaration_without_id_is_noise() {
        assert_eq!(classify("Source:"), Classified::Banner(BannerKind::Noise));
    }

    #[test]
    fn test_forward_edge() {
        assert_eq!(
            classify("      --> KSTREAM-SINK-0000000002"),
            Classified::Edge {
                direction: EdgeDirection::Forward,
                ids: vec!["KSTREAM-SINK-0000000002"],
            }
        );
    }

    #[test]
    fn test_backward_edge_list() {
        assert_eq!(
            classify("\t<-- sensor-a ,sensor-b,  \t"),
            Classified::Edge {
                direction: EdgeDirection::Backward,
                ids: vec!["sensor-a", "sensor-b"],
            }
        );
    }

    #[test]
    fn test_edge_none_marker_dropped() {
        assert_eq!(
            classify("--> none"),
            Classified::Edge {
                direction: EdgeDirection::Forward,
                ids: Vec::new(),
            }
        );
    }

    #[test]
    fn test_directive() {
        match classify("  //properties layout.horiz=true;edge.ortho=false") {
            Classified::Directive(props) => {
                assert_eq!(props.get("layout.horiz"), Some("true"));
                assert_eq!(props.get("edge.ortho"), Some("false"));
            }
            other => panic!("expected directive, got {:?}", other),
        }
    }
}
