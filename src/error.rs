//! Error types for sqltile.
//!
//! The transform operates on DAGs that its producer has already validated,
//! so every error here is an internal-consistency failure: a bug in the
//! front end that built the DAG, or in this crate. Errors are propagated
//! via `Result<T, CompileError>` and are never retried — a `transform`
//! invocation either fully succeeds or fails fatally.
//!
//! Each variant carries enough context (node id, operator tag) to locate
//! the offending DAG node.

use crate::dag::NodeId;

/// Primary error type for the SQL code generator.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// A node id referenced by an edge or a root is absent from the DAG's
    /// node map. The DAG is assumed well-formed by construction; this
    /// indicates a producer bug.
    #[error("unknown node {0} referenced in algebra DAG")]
    UnknownNode(NodeId),

    /// A ternary operator reached the SQL lowering stage. The operators
    /// this backend lowers never produce one.
    #[error("node {0}: ternary operator cannot be lowered to SQL")]
    TernaryOperator(NodeId),

    /// An unexpected internal error. Indicates a bug.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_node_message_contains_id() {
        let err = CompileError::UnknownNode(NodeId(42));
        let msg = format!("{err}");
        assert!(msg.contains("42"), "message should name the node: {msg}");
    }

    #[test]
    fn test_ternary_message_names_operator_kind() {
        let err = CompileError::TernaryOperator(NodeId(7));
        let msg = format!("{err}");
        assert!(msg.contains("ternary"), "message should name the kind: {msg}");
        assert!(msg.contains("7"));
    }

    #[test]
    fn test_internal_message() {
        let err = CompileError::Internal("cycle detected".into());
        assert!(format!("{err}").contains("cycle detected"));
    }
}
