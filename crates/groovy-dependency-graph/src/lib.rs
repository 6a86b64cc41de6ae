//! Dependency extraction and the process-wide reverse dependency graph.
//!
//! These two pieces are split into modules rather than crates because they
//! are used in lockstep by the service facade: the extractor's output is
//! exactly the graph's input, and no other component depends on one without
//! the other.

mod extractor;
mod graph;

pub use extractor::{extract_dependencies, DependencyRelation, DependencySource, MethodSignature, TypeRef};
pub use graph::{DependencyGraph, DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES};
