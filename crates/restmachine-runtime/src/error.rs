//! Runtime error types
//!
//! Only programming and configuration mistakes are errors here. Protocol
//! outcomes such as 404 or 412 are ordinary responses.

use restmachine_core::GraphError;
use thiserror::Error;

/// Boxed error carried by callback and serializer failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Fatal mismatch between a resource, the graph and the engine setup
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Graph lookup failed (unknown node, wrong role, dangling edge)
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// A handler key holds something that cannot be invoked
    #[error("Handler '{0}' is configured but not invocable")]
    HandlerNotInvocable(String),

    /// A key holds a different kind of entry than the node expects
    #[error("Key '{key}' holds a {found} entry, expected {expected}")]
    EntryMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// No serializer is registered for the negotiated media type
    #[error("No serializer available for {0}")]
    NoSerializer(String),

    /// A handler produced a value but the resource offers no media type
    #[error("No media type available to serialize the result of '{0}'")]
    NoMediaType(String),

    /// A header value produced by the resource is not a valid header value
    #[error("Invalid value for header {header}: {value:?}")]
    InvalidHeader { header: String, value: String },

    /// A handler node declares a status code outside 100..=999
    #[error("Invalid status code {status} on node '{node}'")]
    InvalidStatus { node: String, status: u16 },

    /// The walk did not reach a handler within the configured limit
    #[error("Traversal exceeded {0} transitions without reaching a handler")]
    TransitionLimit(usize),
}

/// Error returned by [`crate::Engine::run`]
#[derive(Error, Debug)]
pub enum MachineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A caller-supplied decision, action or handler failed
    #[error("Callback for '{node}' failed: {source}")]
    Callback { node: String, source: BoxError },

    /// A registered serializer failed to encode the handler result
    #[error("Serializer for {media_type} failed: {source}")]
    Serialization { media_type: String, source: BoxError },
}

impl MachineError {
    /// Wrap a callback failure, unwrapping engine errors raised from inside
    /// nested resolutions so they keep their original classification.
    pub fn callback(node: &str, err: anyhow::Error) -> Self {
        match err.downcast::<MachineError>() {
            Ok(inner) => inner,
            Err(err) => MachineError::Callback {
                node: node.to_string(),
                source: err.into(),
            },
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, MachineError::Config(_))
    }
}

impl From<GraphError> for MachineError {
    fn from(err: GraphError) -> Self {
        MachineError::Config(ConfigError::Graph(err))
    }
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, MachineError>;
