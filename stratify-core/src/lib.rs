//! Stratify Core
//!
//! This crate provides the dependency ordering engine for the Stratify model
//! compiler. Given a graph of interdependent model elements (classes,
//! mappings, associations, runtimes, functions, ...), it determines:
//!
//! - a safe processing order among element *kinds*, and
//! - within one kind, a safe order among individual elements linked by
//!   prerequisite relationships,
//!
//! detecting cycles at both levels and producing deterministic, level-batched
//! output suitable for parallel or staged compilation.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `graph`: closed dependency graphs, cycle detection, level batching
//! - `kind`: the closed set of metamodel element categories
//! - `sorter`: per-kind element ordering by prerequisite paths
//! - `schedule`: both layers composed into one compilation plan
//! - `error`: the single error type shared by all of the above
//!
//! The engine is purely computational: no I/O, no locks, and no mutation
//! after validation succeeds. Entries within one wave or level are provably
//! independent, so callers may fan out freely and join between waves.
//!
//! # Example
//!
//! ```rust
//! use stratify_core::graph::DependencyGraph;
//!
//! let mut graph = DependencyGraph::build([
//!     ("mapping", vec!["class", "binding"]),
//!     ("class", vec![]),
//! ]);
//! graph.detect_circular_dependency().unwrap();
//!
//! let waves = graph.topologically_ordered_groups();
//! assert_eq!(waves.len(), 2);
//! assert!(waves[0].contains("class") && waves[0].contains("binding"));
//! assert!(waves[1].contains("mapping"));
//! ```

pub mod error;
pub mod graph;
pub mod kind;
pub mod schedule;
pub mod sorter;

pub use error::GraphError;
pub use graph::DependencyGraph;
pub use kind::{standard_dependencies, ElementKind, KindDependencyGraph};
pub use schedule::{plan_compilation, CompilationPlan};
pub use sorter::{
    ElementDependencySorter, ElementGroup, ElementRef, LevelBatch, UnresolvedPrerequisites,
};
