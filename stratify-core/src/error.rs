//! Error Reporting
//!
//! Every failure produced by this crate funnels into a single [`GraphError`]
//! enum. Cycle errors carry a pre-formatted trace (`A -> B -> C -> A`) so the
//! surrounding compiler can surface the message to the end user verbatim;
//! there is no partial ordering to fall back to, so none of these errors is
//! recoverable within one compilation pass.

use std::fmt::Display;

use thiserror::Error;

/// Errors produced while validating or ordering dependency graphs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A cycle among element kinds.
    #[error("Detected a circular dependency in dependency graph.\nCycle: {cycle}")]
    CircularDependency {
        /// The dependency chain closing the loop, e.g. `Class -> Function -> Class`.
        cycle: String,
    },

    /// A cycle among element prerequisites within one kind.
    #[error("Detected a circular dependency in element prerequisites graph in the following metamodel: {kind}.\nCycle: {cycle}")]
    CircularPrerequisites {
        /// Name of the metamodel kind whose elements form the cycle.
        kind: String,
        /// The prerequisite chain closing the loop, element paths in discovery order.
        cycle: String,
    },

    /// The same element path occurred more than once in a group.
    #[error("duplicate element path '{path}' in {kind} group")]
    DuplicatePath {
        /// Name of the metamodel kind of the offending group.
        kind: String,
        /// The repeated path.
        path: String,
    },

    /// A prerequisite referenced a path missing from the input collection.
    ///
    /// Only raised when the sorter is configured with
    /// `UnresolvedPrerequisites::Reject`.
    #[error("element '{path}' lists unknown prerequisite '{prerequisite}' in metamodel {kind}")]
    UnknownPrerequisite {
        /// Name of the metamodel kind of the offending group.
        kind: String,
        /// Path of the element listing the prerequisite.
        path: String,
        /// The path that could not be resolved.
        prerequisite: String,
    },
}

impl GraphError {
    /// Format a cycle trace as `A -> B -> C -> A`.
    pub(crate) fn format_trace<K: Display>(trace: &[K]) -> String {
        trace
            .iter()
            .map(K::to_string)
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_formatting_joins_with_arrows() {
        assert_eq!(GraphError::format_trace(&["a", "b", "a"]), "a -> b -> a");
        assert_eq!(GraphError::format_trace(&["a", "a"]), "a -> a");
    }

    #[test]
    fn kind_cycle_message_is_stable() {
        let error = GraphError::CircularDependency {
            cycle: "Class -> Function -> Class".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Detected a circular dependency in dependency graph.\nCycle: Class -> Function -> Class"
        );
    }

    #[test]
    fn prerequisite_cycle_message_names_the_kind() {
        let error = GraphError::CircularPrerequisites {
            kind: "Mapping".to_string(),
            cycle: "a -> b -> a".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("element prerequisites graph in the following metamodel: Mapping"));
        assert!(message.ends_with("Cycle: a -> b -> a"));
    }
}
