pub mod dependency_graph;

pub use dependency_graph::{DependencyCycleError, DependencyGraph};
