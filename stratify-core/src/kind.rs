//! Metamodel Element Kinds
//!
//! The coarse ordering layer works over categories of model elements rather
//! than individual elements. The categories form a closed enum: the set of
//! kinds the compiler understands is fixed at build time, so kind identity is
//! a plain `Copy` token instead of a runtime type lookup.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::graph::DependencyGraph;

/// Category of model element handled by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Profile,
    Enumeration,
    Measure,
    Class,
    Association,
    Function,
    Mapping,
    Binding,
    Connection,
    Runtime,
    Service,
}

impl ElementKind {
    /// All kinds, in declaration order.
    pub const ALL: [ElementKind; 11] = [
        ElementKind::Profile,
        ElementKind::Enumeration,
        ElementKind::Measure,
        ElementKind::Class,
        ElementKind::Association,
        ElementKind::Function,
        ElementKind::Mapping,
        ElementKind::Binding,
        ElementKind::Connection,
        ElementKind::Runtime,
        ElementKind::Service,
    ];

    /// The category name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Profile => "Profile",
            ElementKind::Enumeration => "Enumeration",
            ElementKind::Measure => "Measure",
            ElementKind::Class => "Class",
            ElementKind::Association => "Association",
            ElementKind::Function => "Function",
            ElementKind::Mapping => "Mapping",
            ElementKind::Binding => "Binding",
            ElementKind::Connection => "Connection",
            ElementKind::Runtime => "Runtime",
            ElementKind::Service => "Service",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The kind-layer dependency graph.
pub type KindDependencyGraph = DependencyGraph<ElementKind>;

/// The standard inter-kind dependency table the compiler integration feeds
/// into [`DependencyGraph::build`].
///
/// Instances of a kind are compiled only after every instance of the kinds it
/// depends on. Simple declarations (profiles, enumerations, measures,
/// bindings) carry no dependencies and land in the first wave; services close
/// the chain, depending on mappings, runtimes, and functions.
pub fn standard_dependencies() -> IndexMap<ElementKind, Vec<ElementKind>> {
    use ElementKind::*;
    IndexMap::from([
        (Profile, vec![]),
        (Enumeration, vec![]),
        (Measure, vec![]),
        (Binding, vec![]),
        (Class, vec![Measure]),
        (Association, vec![Class]),
        (Function, vec![Class, Association, Enumeration]),
        (Mapping, vec![Enumeration, Class, Association, Binding]),
        (Connection, vec![Class, Binding]),
        (Runtime, vec![Mapping, Connection]),
        (Service, vec![Mapping, Runtime, Function]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_is_acyclic_and_ordered() {
        let mut graph = KindDependencyGraph::build(standard_dependencies());
        graph
            .detect_circular_dependency()
            .expect("standard table must be acyclic");

        assert_eq!(graph.node_count(), ElementKind::ALL.len());

        let waves = graph.topologically_ordered_groups();
        let wave_of = |kind: ElementKind| {
            waves
                .iter()
                .position(|wave| wave.contains(&kind))
                .expect("every kind is placed")
        };
        assert_eq!(wave_of(ElementKind::Profile), 0);
        assert!(wave_of(ElementKind::Class) < wave_of(ElementKind::Association));
        assert!(wave_of(ElementKind::Association) < wave_of(ElementKind::Mapping));
        assert!(wave_of(ElementKind::Mapping) < wave_of(ElementKind::Runtime));
        assert!(wave_of(ElementKind::Runtime) < wave_of(ElementKind::Service));
    }

    #[test]
    fn display_uses_the_diagnostic_name() {
        assert_eq!(ElementKind::Mapping.to_string(), "Mapping");
        assert_eq!(ElementKind::Runtime.to_string(), "Runtime");
    }

    #[test]
    fn kind_tags_round_trip_through_serde() {
        let json = serde_json::to_string(&ElementKind::Mapping).unwrap();
        assert_eq!(json, "\"Mapping\"");
        let kind: ElementKind = serde_json::from_str(&json).unwrap();
        assert_eq!(kind, ElementKind::Mapping);
    }
}
