//! Shared Graph Algorithms
//!
//! Cycle detection, level batching, and connected-component discovery over a
//! closed dependency map. Both ordering layers run the same routines; only
//! the node identity type differs (kind tokens at the coarse layer, element
//! paths at the fine one).
//!
//! All inputs are insertion-ordered maps, and every routine visits nodes in
//! map key order, so results are deterministic regardless of hash state.

use std::collections::VecDeque;
use std::hash::Hash;

use indexmap::{IndexMap, IndexSet};

/// Search for a cycle, following dependency edges.
///
/// Classic three-color DFS: `visited` holds finished nodes, `in_progress` the
/// current stack. On hitting a back edge the returned trace lists the nodes
/// that close the loop, ending with a repeat of the first, e.g. `[a, b, c, a]`.
/// A self-loop yields the degenerate `[a, a]`.
pub(crate) fn find_cycle<K>(dependencies: &IndexMap<K, IndexSet<K>>) -> Option<Vec<K>>
where
    K: Clone + Eq + Hash,
{
    let mut visited: IndexSet<K> = IndexSet::with_capacity(dependencies.len());
    // Insertion order doubles as the DFS stack; that is what turns a back
    // edge into a readable trace instead of a bare boolean.
    let mut in_progress: IndexSet<K> = IndexSet::new();

    for node in dependencies.keys() {
        if visited.contains(node) {
            continue;
        }
        if let Some(trace) = visit(node, dependencies, &mut visited, &mut in_progress) {
            return Some(trace);
        }
    }
    None
}

fn visit<K>(
    node: &K,
    dependencies: &IndexMap<K, IndexSet<K>>,
    visited: &mut IndexSet<K>,
    in_progress: &mut IndexSet<K>,
) -> Option<Vec<K>>
where
    K: Clone + Eq + Hash,
{
    if let Some(start) = in_progress.get_index_of(node) {
        let mut trace: Vec<K> = in_progress.iter().skip(start).cloned().collect();
        trace.push(node.clone());
        return Some(trace);
    }
    if visited.contains(node) {
        return None;
    }

    in_progress.insert(node.clone());
    if let Some(direct) = dependencies.get(node) {
        for dependency in direct {
            if let Some(trace) = visit(dependency, dependencies, visited, in_progress) {
                return Some(trace);
            }
        }
    }
    in_progress.pop();
    visited.insert(node.clone());
    None
}

/// Peel the graph into topological waves.
///
/// Wave `i` contains exactly the nodes whose dependencies all sit in waves
/// `0..i`; nodes within a wave are mutually independent. Per-node in-degree
/// counters and a ready list keep the peel O(V+E).
///
/// # Panics
///
/// Panics if nodes remain after the peel stalls, i.e. the graph contains a
/// cycle. Callers establish acyclicity with [`find_cycle`] first.
pub(crate) fn level_batches<K>(
    dependencies: &IndexMap<K, IndexSet<K>>,
    dependents: &IndexMap<K, IndexSet<K>>,
) -> Vec<IndexSet<K>>
where
    K: Clone + Eq + Hash,
{
    let mut in_degree: IndexMap<&K, usize> = dependencies
        .iter()
        .map(|(node, direct)| (node, direct.len()))
        .collect();

    let mut wave: Vec<&K> = in_degree
        .iter()
        .filter(|(_, &degree)| degree == 0)
        .map(|(&node, _)| node)
        .collect();

    let mut levels: Vec<IndexSet<K>> = Vec::new();
    let mut placed = 0;

    while !wave.is_empty() {
        let mut next: Vec<&K> = Vec::new();
        for &node in &wave {
            if let Some(waiting) = dependents.get(node) {
                for dependent in waiting {
                    if let Some(degree) = in_degree.get_mut(dependent) {
                        *degree -= 1;
                        if *degree == 0 {
                            next.push(dependent);
                        }
                    }
                }
            }
        }
        placed += wave.len();
        levels.push(wave.iter().map(|&node| node.clone()).collect());
        wave = next;
    }

    assert_eq!(
        placed,
        dependencies.len(),
        "level batching stalled with nodes remaining; graph contains a cycle"
    );

    levels
}

/// Partition the graph into weakly-connected components.
///
/// Two nodes share a component iff an undirected chain of dependency edges
/// links them. Used for diagnostics and for scheduling unrelated clusters
/// independently; the topological order does not depend on it.
pub(crate) fn disjoint_components<K>(
    dependencies: &IndexMap<K, IndexSet<K>>,
    dependents: &IndexMap<K, IndexSet<K>>,
) -> Vec<IndexSet<K>>
where
    K: Clone + Eq + Hash,
{
    let mut assigned: IndexSet<K> = IndexSet::with_capacity(dependencies.len());
    let mut components: Vec<IndexSet<K>> = Vec::new();

    for start in dependencies.keys() {
        if assigned.contains(start) {
            continue;
        }
        let mut component: IndexSet<K> = IndexSet::new();
        let mut queue: VecDeque<K> = VecDeque::from([start.clone()]);
        while let Some(node) = queue.pop_front() {
            if !component.insert(node.clone()) {
                continue;
            }
            assigned.insert(node.clone());
            let neighbors = dependencies
                .get(&node)
                .into_iter()
                .flatten()
                .chain(dependents.get(&node).into_iter().flatten());
            for neighbor in neighbors {
                if !component.contains(neighbor) {
                    queue.push_back(neighbor.clone());
                }
            }
        }
        components.push(component);
    }
    components
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build closed forward and reverse maps from declared edges.
    fn closed(
        edges: Vec<(&'static str, Vec<&'static str>)>,
    ) -> (
        IndexMap<&'static str, IndexSet<&'static str>>,
        IndexMap<&'static str, IndexSet<&'static str>>,
    ) {
        let mut forward: IndexMap<&str, IndexSet<&str>> = IndexMap::new();
        for (node, dependencies) in edges {
            forward.entry(node).or_default().extend(dependencies);
        }
        let referenced: Vec<&str> = forward.values().flatten().copied().collect();
        for node in referenced {
            forward.entry(node).or_default();
        }
        let mut reverse: IndexMap<&str, IndexSet<&str>> = forward
            .keys()
            .map(|&node| (node, IndexSet::new()))
            .collect();
        for (&node, dependencies) in &forward {
            for &dependency in dependencies {
                reverse[&dependency].insert(node);
            }
        }
        (forward, reverse)
    }

    #[test]
    fn acyclic_graph_has_no_cycle() {
        let (forward, _) = closed(vec![("b", vec!["a"]), ("c", vec!["a", "b"])]);
        assert_eq!(find_cycle(&forward), None);
    }

    #[test]
    fn direct_cycle_is_traced() {
        let (forward, _) = closed(vec![("a", vec!["b"]), ("b", vec!["a"])]);
        assert_eq!(find_cycle(&forward), Some(vec!["a", "b", "a"]));
    }

    #[test]
    fn self_loop_is_a_degenerate_cycle() {
        let (forward, _) = closed(vec![("a", vec!["a"])]);
        assert_eq!(find_cycle(&forward), Some(vec!["a", "a"]));
    }

    #[test]
    fn trace_starts_at_the_first_cycle_member_reached() {
        // d sits before the cycle; the trace must not include it.
        let (forward, _) = closed(vec![("d", vec!["a"]), ("a", vec!["b"]), ("b", vec!["a"])]);
        assert_eq!(find_cycle(&forward), Some(vec!["a", "b", "a"]));
    }

    #[test]
    fn waves_respect_dependencies() {
        let (forward, reverse) = closed(vec![
            ("b", vec!["a"]),
            ("c", vec!["a"]),
            ("d", vec!["b", "c"]),
        ]);
        let levels = level_batches(&forward, &reverse);
        assert_eq!(levels.len(), 3);
        assert_eq!(levels[0], IndexSet::from(["a"]));
        assert_eq!(levels[1], IndexSet::from(["b", "c"]));
        assert_eq!(levels[2], IndexSet::from(["d"]));
    }

    #[test]
    fn isolated_node_sits_in_the_first_wave() {
        let (forward, reverse) = closed(vec![("lonely", vec![]), ("b", vec!["a"])]);
        let levels = level_batches(&forward, &reverse);
        assert!(levels[0].contains("lonely"));
        assert!(levels[0].contains("a"));
        assert_eq!(levels[1], IndexSet::from(["b"]));
    }

    #[test]
    fn empty_graph_yields_no_waves() {
        let (forward, reverse) = closed(vec![]);
        assert!(level_batches(&forward, &reverse).is_empty());
        assert!(disjoint_components(&forward, &reverse).is_empty());
    }

    #[test]
    #[should_panic(expected = "level batching stalled")]
    fn cyclic_graph_stalls_the_peel() {
        let (forward, reverse) = closed(vec![("a", vec!["b"]), ("b", vec!["a"])]);
        level_batches(&forward, &reverse);
    }

    #[test]
    fn components_split_unrelated_clusters() {
        let (forward, reverse) = closed(vec![
            ("b", vec!["a"]),
            ("d", vec!["c"]),
            ("lonely", vec![]),
        ]);
        let components = disjoint_components(&forward, &reverse);
        assert_eq!(components.len(), 3);
        assert!(components.iter().any(|c| c.contains("a") && c.contains("b")));
        assert!(components.iter().any(|c| c.contains("c") && c.contains("d")));
        assert!(components
            .iter()
            .any(|c| c.len() == 1 && c.contains("lonely")));
    }

    #[test]
    fn component_membership_ignores_edge_direction() {
        // a -> b <- c: one component despite opposing directions.
        let (forward, reverse) = closed(vec![("a", vec!["b"]), ("c", vec!["b"])]);
        let components = disjoint_components(&forward, &reverse);
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].len(), 3);
    }
}
