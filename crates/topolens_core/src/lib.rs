//! topolens Core Types
//!
//! This crate contains pure types with no I/O: the identifiers and kinds
//! of topology nodes and the error type shared by the parser and its
//! consumers.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod id;
pub mod kind;

// Re-exports
pub use error::{EdgeDirection, TopologyError, TopologyResult};
pub use id::NodeId;
pub use kind::NodeKind;
