//! Error types for RestMachine Core

use crate::graph::NodeRole;
use thiserror::Error;

/// Errors raised while building or walking a decision graph.
///
/// All of these indicate a mismatch between the graph and the code consulting
/// it; none of them is an HTTP-level outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error("Node '{node}' has role {found}, expected {expected}")]
    RoleMismatch {
        node: String,
        expected: NodeRole,
        found: NodeRole,
    },

    #[error("Node '{node}' references unknown node '{target}'")]
    DanglingEdge { node: String, target: String },

    #[error("Duplicate node: {0}")]
    DuplicateNode(String),
}

pub type Result<T> = std::result::Result<T, GraphError>;
