//! Error types for graph construction, contraction, and traversal

use thiserror::Error;

/// Result type for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors that can occur in graph operations
///
/// All variants are programmer-error-class failures surfaced synchronously
/// to the caller; none are retried internally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// An operation referenced a label that was never registered
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    /// Contraction of a node with itself, or with a stale handle
    #[error("Invalid contraction: {0}")]
    InvalidContraction(String),

    /// An operation requiring at least one node (or one edge) was called
    /// on a graph that has none
    #[error("Graph is empty")]
    EmptyGraph,
}

impl GraphError {
    /// Check if the error is a precondition violation on caller input
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            GraphError::UnknownNode(_) | GraphError::InvalidContraction(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GraphError::UnknownNode("42".to_string());
        assert_eq!(err.to_string(), "Unknown node: 42");

        let err = GraphError::InvalidContraction("\"a\" with itself".to_string());
        assert_eq!(err.to_string(), "Invalid contraction: \"a\" with itself");

        let err = GraphError::EmptyGraph;
        assert_eq!(err.to_string(), "Graph is empty");
    }

    #[test]
    fn test_is_precondition() {
        assert!(GraphError::UnknownNode("1".to_string()).is_precondition());
        assert!(GraphError::InvalidContraction("x".to_string()).is_precondition());
        assert!(!GraphError::EmptyGraph.is_precondition());
    }
}
