//! RestMachine Runtime - walks the decision graph for one request
//!
//! This crate provides everything that happens per request:
//! - The abstract [`Request`] and [`Response`]
//! - The declarative [`ResourceConfig`] and its built-in defaults
//! - The per-request [`Context`]
//! - The [`Engine`] that traverses the graph and assembles the response
//! - The media type [`SerializerRegistry`]

pub mod context;
pub mod engine;
pub mod error;
pub mod headers;
pub mod request;
pub mod resource;
pub mod response;
pub mod serializer;
pub mod trace;
pub mod value;

// Re-export main types
pub use context::{Context, Extensions, Representation};
pub use engine::{Engine, EngineSettings};
pub use error::{ConfigError, MachineError, Result};
pub use request::Request;
pub use resource::ResourceConfig;
pub use response::Response;
pub use serializer::SerializerRegistry;
pub use trace::{TraceEntry, TraceSettings};
pub use value::{Callback, ConfigEntry, ConfigValue, EntryValue, Outcome};

// Re-export the pieces of core that show up in the runtime API
pub use restmachine_core::{negotiate, DecisionGraph, DecisionNode, GraphError, NodeKind, NodeRole};
