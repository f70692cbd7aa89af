//! RestMachine Core - decision graph and content negotiation
//!
//! This crate provides the pure, request-independent parts of the engine:
//! - The HTTP resource decision graph (decision, action and handler nodes)
//! - Media type negotiation between client preferences and resource offers
//! - Error types

pub mod error;
pub mod graph;
pub mod negotiate;

// Re-export commonly used types
pub use error::{GraphError, Result};
pub use graph::{DecisionGraph, DecisionNode, NodeKind, NodeRole};
