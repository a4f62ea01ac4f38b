//! topolens Parser
//!
//! Turns the textual topology description printed by stream-processing
//! engines (sources, processors, sinks and their `-->` / `<--` edges) into
//! an immutable, symmetric [`Graph`].
//!
//! ```
//! let text = "Source: sensor-a (topics: [topic-a])\n --> to-the-world\n\
//!             Sink: to-the-world (topic: output-topic)";
//! let graph = topolens_parse::parse(text).unwrap();
//! assert_eq!(graph.size(), 2);
//! let sink = graph.find_for_id("to-the-world").unwrap();
//! assert_eq!(sink.incoming().len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classify;
mod collect;
pub mod extract;
pub mod graph;
mod link;
pub mod parser;
pub mod properties;
pub mod render;
pub mod style;

pub use classify::{classify, BannerKind, Classified, NodeDeclaration};
pub use extract::parse_attribute_clause;
pub use graph::{Attributes, Graph, Node, SubTopology};
pub use parser::parse;
pub use properties::{replace_properties, Properties, DIRECTIVE_PREFIX};
pub use render::{PlantUmlRenderer, RenderOptions};
pub use style::{OperatorStyle, Partitioning};
pub use topolens_core::{EdgeDirection, NodeId, NodeKind, TopologyError, TopologyResult};
