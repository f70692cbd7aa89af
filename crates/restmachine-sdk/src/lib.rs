//! RestMachine SDK
//!
//! High-level API for serving HTTP resources through the decision graph.
//!
//! ```rust,ignore
//! use restmachine_sdk::{Request, ResourceConfig, WebMachine};
//!
//! let machine = WebMachine::new();
//! let resource = ResourceConfig::new()
//!     .available_media_types(["application/json"])
//!     .handle_ok(|_| Ok(serde_json::json!({"hello": "world"})));
//!
//! let response = machine.run(&resource, Request::get())?;
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod machine;

// Re-export main types
pub use builder::WebMachineBuilder;
pub use config::MachineConfig;
pub use error::{Result, SdkError};
pub use machine::WebMachine;

// Re-export commonly used types from dependencies
pub use restmachine_core::{DecisionGraph, DecisionNode, NodeRole};
pub use restmachine_runtime::serializer::php;
pub use restmachine_runtime::{
    ConfigEntry, ConfigValue, Context, MachineError, Outcome, Request, ResourceConfig, Response,
    SerializerRegistry, TraceEntry,
};
pub use http::{header, Method, StatusCode};
