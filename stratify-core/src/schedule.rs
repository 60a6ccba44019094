//! Compilation Planning
//!
//! Ties the two ordering layers together. The kind graph decides the macro
//! order across element categories; each kind's elements are then sorted by
//! their prerequisite relation. The resulting plan is what a whole-model
//! compiler walks: kind waves outermost, element levels within a kind,
//! arbitrary parallelism inside a level.

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::error::GraphError;
use crate::kind::{ElementKind, KindDependencyGraph};
use crate::sorter::{ElementDependencySorter, ElementGroup, LevelBatch};

/// A validated, fully ordered compilation schedule.
#[derive(Debug, Clone)]
pub struct CompilationPlan<E> {
    /// Waves of kinds; all elements of a wave's kinds may be compiled once
    /// every earlier wave is complete.
    pub kind_waves: Vec<IndexSet<ElementKind>>,
    /// Per kind, the prerequisite levels of its elements.
    pub element_levels: IndexMap<ElementKind, Vec<LevelBatch<E>>>,
}

impl<E> CompilationPlan<E> {
    /// Kinds flattened into a single safe processing order.
    pub fn kinds_in_order(&self) -> impl Iterator<Item = ElementKind> + '_ {
        self.kind_waves.iter().flatten().copied()
    }

    /// Total number of elements across all kinds.
    pub fn element_count(&self) -> usize {
        self.element_levels
            .values()
            .flatten()
            .map(|batch| batch.elements.len())
            .sum()
    }
}

/// Validate the kind graph and sort every element group.
///
/// The kind graph is closed over every kind that has elements, so a group
/// whose kind declares no dependencies still lands in the first wave. Fails
/// on the first cycle found at either layer; no partial plan is returned.
pub fn plan_compilation<E>(
    kind_dependencies: IndexMap<ElementKind, Vec<ElementKind>>,
    groups: IndexMap<ElementKind, ElementGroup<E>>,
    prerequisites: &IndexMap<ElementKind, IndexMap<String, IndexSet<String>>>,
    sorter: &ElementDependencySorter,
) -> Result<CompilationPlan<E>, GraphError> {
    let mut declared = kind_dependencies;
    for kind in groups.keys() {
        declared.entry(*kind).or_default();
    }

    let mut kind_graph = KindDependencyGraph::build(declared);
    kind_graph.detect_circular_dependency()?;
    let kind_waves = kind_graph.topologically_ordered_groups().to_vec();

    let element_levels = sorter.topologically_sort_elements(groups, prerequisites)?;

    debug!(
        kinds = kind_graph.node_count(),
        waves = kind_waves.len(),
        "compilation plan ready"
    );

    Ok(CompilationPlan {
        kind_waves,
        element_levels,
    })
}
