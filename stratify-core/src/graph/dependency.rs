//! Dependency Graph Construction and Validation
//!
//! [`DependencyGraph`] is generic over the node identity `K`: the kind layer
//! instantiates it at `ElementKind`, the element layer at `String` paths.
//! `Display` on `K` is the projection used for human-readable cycle traces.

use std::fmt::Display;
use std::hash::Hash;

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use super::algo;
use crate::error::GraphError;

/// A closed dependency graph over nodes of type `K`.
///
/// Built once per compilation pass from a snapshot of declared dependencies.
/// [`DependencyGraph::build`] closes the graph (every node referenced as a
/// dependency gets its own key, with an empty set if it declared nothing)
/// and derives the reverse relation. Construction is cheap and always
/// succeeds.
///
/// [`DependencyGraph::detect_circular_dependency`] validates acyclicity and
/// caches the two derived views:
///
/// - topological waves ([`Self::topologically_ordered_groups`]): every
///   dependency of a node sits in an earlier wave, nodes within a wave are
///   mutually independent;
/// - disjoint subgraphs ([`Self::disjoint_dependency_graphs`]):
///   weakly-connected components, so unrelated clusters can be compiled
///   independently.
///
/// After validation succeeds the graph is never mutated again and is safe to
/// read from multiple threads without synchronization.
#[derive(Debug, Clone)]
pub struct DependencyGraph<K> {
    dependent_to_dependencies: IndexMap<K, IndexSet<K>>,
    dependency_to_dependents: IndexMap<K, IndexSet<K>>,
    ordered_groups: Option<Vec<IndexSet<K>>>,
    disjoint_graphs: Option<Vec<IndexSet<K>>>,
}

impl<K> DependencyGraph<K>
where
    K: Clone + Eq + Hash,
{
    /// Build a closed graph from declared dependencies.
    ///
    /// The input may be incomplete: any node that only ever appears inside a
    /// dependency set is materialized as a key with an empty set of its own.
    pub fn build<I, D>(declared: I) -> Self
    where
        I: IntoIterator<Item = (K, D)>,
        D: IntoIterator<Item = K>,
    {
        let mut forward: IndexMap<K, IndexSet<K>> = IndexMap::new();
        for (node, dependencies) in declared {
            forward.entry(node).or_default().extend(dependencies);
        }

        // Close the graph over every referenced node.
        let referenced: Vec<K> = forward.values().flatten().cloned().collect();
        for node in referenced {
            forward.entry(node).or_default();
        }

        let mut reverse: IndexMap<K, IndexSet<K>> = forward
            .keys()
            .map(|node| (node.clone(), IndexSet::new()))
            .collect();
        for (node, dependencies) in &forward {
            for dependency in dependencies {
                if let Some(dependents) = reverse.get_mut(dependency) {
                    dependents.insert(node.clone());
                }
            }
        }

        Self {
            dependent_to_dependencies: forward,
            dependency_to_dependents: reverse,
            ordered_groups: None,
            disjoint_graphs: None,
        }
    }

    /// Number of nodes in the closed graph.
    pub fn node_count(&self) -> usize {
        self.dependent_to_dependencies.len()
    }

    /// For each node, the set of nodes it depends on.
    pub fn dependent_to_dependencies(&self) -> &IndexMap<K, IndexSet<K>> {
        &self.dependent_to_dependencies
    }

    /// For each node, the set of nodes depending on it.
    pub fn dependency_to_dependents(&self) -> &IndexMap<K, IndexSet<K>> {
        &self.dependency_to_dependents
    }

    /// The topological waves.
    ///
    /// # Panics
    ///
    /// Panics if [`Self::detect_circular_dependency`] has not succeeded yet;
    /// reading an order that was never established is a programmer error.
    pub fn topologically_ordered_groups(&self) -> &[IndexSet<K>] {
        self.ordered_groups
            .as_deref()
            .expect("topological order read before detect_circular_dependency succeeded")
    }

    /// The weakly-connected components of the closed graph.
    ///
    /// # Panics
    ///
    /// Panics if [`Self::detect_circular_dependency`] has not succeeded yet.
    pub fn disjoint_dependency_graphs(&self) -> &[IndexSet<K>] {
        self.disjoint_graphs
            .as_deref()
            .expect("disjoint subgraphs read before detect_circular_dependency succeeded")
    }
}

impl<K> DependencyGraph<K>
where
    K: Clone + Eq + Hash + Display,
{
    /// Check the graph for cycles and derive the ordered views.
    ///
    /// On success the topological waves and disjoint subgraphs are computed
    /// once and cached; repeated calls are cheap and yield identical results.
    /// On failure no ordering exists at all and the error carries the cycle
    /// trace.
    pub fn detect_circular_dependency(&mut self) -> Result<(), GraphError> {
        if let Some(trace) = algo::find_cycle(&self.dependent_to_dependencies) {
            return Err(GraphError::CircularDependency {
                cycle: GraphError::format_trace(&trace),
            });
        }

        if self.ordered_groups.is_none() {
            let groups = algo::level_batches(
                &self.dependent_to_dependencies,
                &self.dependency_to_dependents,
            );
            let disjoint = algo::disjoint_components(
                &self.dependent_to_dependencies,
                &self.dependency_to_dependents,
            );
            debug!(
                nodes = self.node_count(),
                waves = groups.len(),
                subgraphs = disjoint.len(),
                "dependency graph validated"
            );
            self.ordered_groups = Some(groups);
            self.disjoint_graphs = Some(disjoint);
        }
        Ok(())
    }
}
