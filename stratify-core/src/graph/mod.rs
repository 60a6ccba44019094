//! Dependency Graph
//!
//! This module implements the dependency graph machinery shared by both
//! ordering layers of the compiler:
//!
//! - the *kind* layer, where nodes are metamodel element categories, and
//! - the *element* layer, where nodes are concrete element paths.
//!
//! # Overview
//!
//! A [`DependencyGraph`] is built from a snapshot of declared dependencies
//! and closed over every referenced node. Validation checks that the relation
//! is a DAG and, on success, caches two derived views: the topological waves
//! (each wave safe to process in parallel once earlier waves are done) and
//! the disjoint subgraphs (unrelated clusters, reported for diagnostics and
//! coarse scheduling).
//!
//! # Design Decisions
//!
//! 1. Both edge directions are materialized (dependencies and dependents) to
//!    enable efficient traversal either way.
//!
//! 2. All maps and sets are insertion-ordered, so every derived view is
//!    deterministic regardless of hash state.
//!
//! 3. Cycle discovery returns the offending path as data; nothing unwinds.

mod algo;
mod dependency;

pub use dependency::DependencyGraph;
