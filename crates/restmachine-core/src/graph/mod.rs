//! Decision graph definitions
//!
//! The graph is a table of named nodes. Each node carries an explicit role:
//! a binary decision with a pass and a fail successor, an action with a single
//! successor, or a terminal handler mapped to an HTTP status code.

mod table;

use crate::error::{GraphError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Name of the node `handle-exception`, which is only entered when a
/// resource opts into mapping callback failures to a 500 response.
pub const HANDLE_EXCEPTION: &str = "handle-exception";

/// Role of a node in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Decision,
    Action,
    Handler,
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRole::Decision => write!(f, "decision"),
            NodeRole::Action => write!(f, "action"),
            NodeRole::Handler => write!(f, "handler"),
        }
    }
}

/// Role-specific data of a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum NodeKind {
    /// Binary test
    Decision { pass: String, fail: String },
    /// Side effect followed unconditionally by `next`
    Action { next: String },
    /// Terminal node
    Handler { status: u16 },
}

impl NodeKind {
    pub fn role(&self) -> NodeRole {
        match self {
            NodeKind::Decision { .. } => NodeRole::Decision,
            NodeKind::Action { .. } => NodeRole::Action,
            NodeKind::Handler { .. } => NodeRole::Handler,
        }
    }

    /// Names of the nodes this node can move to
    pub fn successors(&self) -> Vec<&str> {
        match self {
            NodeKind::Decision { pass, fail } => vec![pass.as_str(), fail.as_str()],
            NodeKind::Action { next } => vec![next.as_str()],
            NodeKind::Handler { .. } => Vec::new(),
        }
    }
}

/// A named node of the decision graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionNode {
    pub name: String,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl DecisionNode {
    pub fn decision(name: impl Into<String>, pass: impl Into<String>, fail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Decision {
                pass: pass.into(),
                fail: fail.into(),
            },
        }
    }

    pub fn action(name: impl Into<String>, next: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Action { next: next.into() },
        }
    }

    pub fn handler(name: impl Into<String>, status: u16) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Handler { status },
        }
    }

    pub fn role(&self) -> NodeRole {
        self.kind.role()
    }
}

/// The decision graph walked by the engine.
///
/// Read-only once built; the built-in instance is shared process-wide.
#[derive(Debug, Clone)]
pub struct DecisionGraph {
    start: String,
    nodes: HashMap<String, DecisionNode>,
}

impl DecisionGraph {
    /// Name of the initial node of the built-in graph
    pub const START: &'static str = table::START;

    /// The built-in HTTP resource flowchart.
    pub fn builtin() -> Arc<DecisionGraph> {
        static BUILTIN: OnceLock<Arc<DecisionGraph>> = OnceLock::new();
        BUILTIN
            .get_or_init(|| {
                let nodes = table::ROWS.iter().map(|(name, row)| match *row {
                    table::Row::Decision(pass, fail) => DecisionNode::decision(*name, pass, fail),
                    table::Row::Action(next) => DecisionNode::action(*name, next),
                    table::Row::Handler(status) => DecisionNode::handler(*name, status),
                });
                let graph = DecisionGraph {
                    start: table::START.to_string(),
                    nodes: nodes.map(|node| (node.name.clone(), node)).collect(),
                };
                log::debug!("Built-in decision graph loaded with {} nodes", graph.len());
                Arc::new(graph)
            })
            .clone()
    }

    /// Build a graph from explicit nodes.
    ///
    /// Edges are not checked here; call [`DecisionGraph::validate`] for that.
    pub fn from_nodes(
        start: impl Into<String>,
        nodes: impl IntoIterator<Item = DecisionNode>,
    ) -> Result<Self> {
        let mut map = HashMap::new();
        for node in nodes {
            if map.contains_key(&node.name) {
                return Err(GraphError::DuplicateNode(node.name));
            }
            map.insert(node.name.clone(), node);
        }
        Ok(Self {
            start: start.into(),
            nodes: map,
        })
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn node(&self, name: &str) -> Result<&DecisionNode> {
        self.nodes
            .get(name)
            .ok_or_else(|| GraphError::UnknownNode(name.to_string()))
    }

    /// All nodes, in no particular order
    pub fn nodes(&self) -> impl Iterator<Item = &DecisionNode> {
        self.nodes.values()
    }

    pub fn classify(&self, name: &str) -> Result<NodeRole> {
        Ok(self.node(name)?.role())
    }

    pub fn next_after_decision(&self, name: &str, outcome: bool) -> Result<&str> {
        match &self.node(name)?.kind {
            NodeKind::Decision { pass, fail } => Ok(if outcome { pass.as_str() } else { fail.as_str() }),
            other => Err(Self::mismatch(name, NodeRole::Decision, other.role())),
        }
    }

    pub fn next_after_action(&self, name: &str) -> Result<&str> {
        match &self.node(name)?.kind {
            NodeKind::Action { next } => Ok(next.as_str()),
            other => Err(Self::mismatch(name, NodeRole::Action, other.role())),
        }
    }

    pub fn status_of(&self, name: &str) -> Result<u16> {
        match &self.node(name)?.kind {
            NodeKind::Handler { status } => Ok(*status),
            other => Err(Self::mismatch(name, NodeRole::Handler, other.role())),
        }
    }

    /// Check that the start node exists and every edge resolves.
    pub fn validate(&self) -> Result<()> {
        if !self.contains(&self.start) {
            return Err(GraphError::UnknownNode(self.start.clone()));
        }
        for node in self.nodes.values() {
            for target in node.kind.successors() {
                if !self.contains(target) {
                    log::warn!("Node '{}' points at missing node '{}'", node.name, target);
                    return Err(GraphError::DanglingEdge {
                        node: node.name.clone(),
                        target: target.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Names of all nodes reachable from the start node (including it).
    /// Edges to missing nodes are skipped.
    pub fn reachable(&self) -> HashSet<&str> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        if let Some(start) = self.nodes.get(&self.start) {
            seen.insert(start.name.as_str());
            queue.push_back(start);
        }
        while let Some(node) = queue.pop_front() {
            for target in node.kind.successors() {
                if let Some(next) = self.nodes.get(target) {
                    if seen.insert(next.name.as_str()) {
                        queue.push_back(next);
                    }
                }
            }
        }
        seen
    }

    fn mismatch(name: &str, expected: NodeRole, found: NodeRole) -> GraphError {
        GraphError::RoleMismatch {
            node: name.to_string(),
            expected,
            found,
        }
    }
}
