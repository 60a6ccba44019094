//! Element-Level Prerequisite Sorting
//!
//! Within one kind, elements may reference each other as prerequisites: a
//! mapping that includes another mapping must be compiled after it. This
//! module sorts a flat per-kind collection of elements into dependency
//! levels. Each level depends only on earlier levels, so a caller can
//! compile one level at a time and parallelize freely inside it.
//!
//! # Determinism
//!
//! Two rules fix the output completely:
//!
//! 1. Levels come from the shared graph algorithms over insertion-ordered
//!    maps.
//!
//! 2. Within a level, elements keep the relative order of the input
//!    collection. The level's path set is projected back onto the original
//!    group order, so ties between elements of equal dependency depth never
//!    depend on map iteration order.

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::error::GraphError;
use crate::graph::DependencyGraph;
use crate::kind::ElementKind;

/// A concrete model element plus its stable, globally unique path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRef<E> {
    /// Opaque payload, returned to the caller untouched.
    pub element: E,
    /// Stable identifier used for prerequisite lookups and cycle messages.
    pub path: String,
}

impl<E> ElementRef<E> {
    /// Pair an element with its path.
    pub fn new(element: E, path: impl Into<String>) -> Self {
        Self {
            element,
            path: path.into(),
        }
    }
}

/// Ordered collection of elements of one kind, in declaration order.
pub type ElementGroup<E> = Vec<ElementRef<E>>;

/// Elements that are mutually independent once earlier batches are done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelBatch<E> {
    /// Members of this batch, input order preserved.
    pub elements: Vec<ElementRef<E>>,
}

/// Handling of prerequisite paths absent from the input collection.
///
/// A prerequisite can legitimately point outside the collection being sorted:
/// a cross-kind or cross-module reference that an earlier compilation wave
/// already resolved. Whether that is legitimate is a property of the
/// integration, not of the algorithm, so the caller states it explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnresolvedPrerequisites {
    /// Treat the missing path as already satisfied and drop the edge.
    #[default]
    AssumeSatisfied,
    /// Fail the sort with [`GraphError::UnknownPrerequisite`].
    Reject,
}

/// Sorts elements of one or more kinds by their prerequisite relation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementDependencySorter {
    unresolved: UnresolvedPrerequisites,
}

impl ElementDependencySorter {
    /// Sorter with the default policy for unresolved prerequisites.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorter with an explicit policy for unresolved prerequisites.
    pub fn with_unresolved_policy(unresolved: UnresolvedPrerequisites) -> Self {
        Self { unresolved }
    }

    /// Sort every group into prerequisite levels, independently per kind.
    ///
    /// `prerequisites` maps, per kind, an element path to the set of paths
    /// that must be compiled before it; elements without an entry are
    /// independent. A cycle in any kind fails the whole call; no partial
    /// result is returned.
    pub fn topologically_sort_elements<E>(
        &self,
        groups: IndexMap<ElementKind, ElementGroup<E>>,
        prerequisites: &IndexMap<ElementKind, IndexMap<String, IndexSet<String>>>,
    ) -> Result<IndexMap<ElementKind, Vec<LevelBatch<E>>>, GraphError> {
        let mut sorted = IndexMap::with_capacity(groups.len());
        for (kind, group) in groups {
            let batches = self.sort_group(kind, group, prerequisites.get(&kind))?;
            sorted.insert(kind, batches);
        }
        Ok(sorted)
    }

    fn sort_group<E>(
        &self,
        kind: ElementKind,
        group: ElementGroup<E>,
        prerequisites: Option<&IndexMap<String, IndexSet<String>>>,
    ) -> Result<Vec<LevelBatch<E>>, GraphError> {
        let element_count = group.len();

        let mut paths: IndexSet<&str> = IndexSet::with_capacity(group.len());
        for element in &group {
            if !paths.insert(element.path.as_str()) {
                return Err(GraphError::DuplicatePath {
                    kind: kind.to_string(),
                    path: element.path.clone(),
                });
            }
        }

        // Closed path-keyed dependency map; an absent entry means independent.
        let mut declared: Vec<(String, Vec<String>)> = Vec::with_capacity(group.len());
        for element in &group {
            let listed = prerequisites.and_then(|by_path| by_path.get(&element.path));
            let mut direct = Vec::new();
            for prerequisite in listed.into_iter().flatten() {
                if paths.contains(prerequisite.as_str()) {
                    direct.push(prerequisite.clone());
                } else {
                    match self.unresolved {
                        UnresolvedPrerequisites::AssumeSatisfied => {}
                        UnresolvedPrerequisites::Reject => {
                            return Err(GraphError::UnknownPrerequisite {
                                kind: kind.to_string(),
                                path: element.path.clone(),
                                prerequisite: prerequisite.clone(),
                            });
                        }
                    }
                }
            }
            declared.push((element.path.clone(), direct));
        }

        let mut graph = DependencyGraph::build(declared);
        graph.detect_circular_dependency().map_err(|error| match error {
            GraphError::CircularDependency { cycle } => GraphError::CircularPrerequisites {
                kind: kind.to_string(),
                cycle,
            },
            other => other,
        })?;

        let levels = graph.topologically_ordered_groups();
        let mut level_of: IndexMap<&str, usize> = IndexMap::with_capacity(element_count);
        for (index, level) in levels.iter().enumerate() {
            for path in level {
                level_of.insert(path.as_str(), index);
            }
        }

        // Project each level back onto the original group order.
        let mut batches: Vec<LevelBatch<E>> = (0..levels.len())
            .map(|_| LevelBatch {
                elements: Vec::new(),
            })
            .collect();
        for element in group {
            let index = *level_of
                .get(element.path.as_str())
                .expect("every group path appears in exactly one level");
            batches[index].elements.push(element);
        }

        debug!(
            kind = %kind,
            elements = element_count,
            levels = batches.len(),
            "sorted element prerequisites"
        );
        Ok(batches)
    }
}
