//! Builder pattern for WebMachine

use crate::config::MachineConfig;
use crate::error::Result;
use crate::machine::WebMachine;
use restmachine_core::DecisionGraph;
use restmachine_runtime::{Engine, SerializerRegistry};
use serde_json::Value;
use std::sync::Arc;

/// Builder for [`WebMachine`]
///
/// ```rust,ignore
/// let machine = WebMachineBuilder::new()
///     .enable_trace(true)
///     .install_serializer("text/csv", |value| Ok(to_csv(value)?))
///     .build()?;
/// ```
pub struct WebMachineBuilder {
    config: MachineConfig,
    graph: Option<Arc<DecisionGraph>>,
    serializers: SerializerRegistry,
}

impl WebMachineBuilder {
    pub fn new() -> Self {
        Self {
            config: MachineConfig::new(),
            graph: None,
            serializers: SerializerRegistry::with_defaults(),
        }
    }

    pub fn with_config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Emit the decision trace on every response
    pub fn enable_trace(mut self, enable: bool) -> Self {
        self.config.trace = enable;
        self
    }

    /// Request header that turns the trace on per request; `None` disables it
    pub fn trace_request_header(mut self, header: Option<impl Into<String>>) -> Self {
        self.config.trace_request_header = header.map(Into::into);
        self
    }

    pub fn trace_response_header(mut self, header: impl Into<String>) -> Self {
        self.config.trace_response_header = header.into();
        self
    }

    pub fn validate_resources(mut self, enable: bool) -> Self {
        self.config.validate_resources = enable;
        self
    }

    pub fn max_transitions(mut self, max: usize) -> Self {
        self.config.max_transitions = max;
        self
    }

    /// Walk a custom graph instead of the built-in flowchart
    pub fn with_graph(mut self, graph: Arc<DecisionGraph>) -> Self {
        self.graph = Some(graph);
        self
    }

    /// Start from an empty serializer table instead of the defaults
    pub fn without_default_serializers(mut self) -> Self {
        self.serializers = SerializerRegistry::new();
        self
    }

    pub fn install_serializer<F>(mut self, media_type: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<Vec<u8>> + Send + Sync + 'static,
    {
        self.serializers.install(media_type, f);
        self
    }

    /// Validate the configuration and graph, then build the machine
    pub fn build(self) -> Result<WebMachine> {
        self.config.validate()?;
        let graph = self.graph.unwrap_or_else(DecisionGraph::builtin);
        graph.validate()?;

        tracing::debug!(
            nodes = graph.len(),
            serializers = ?self.serializers.media_types(),
            "building web machine"
        );
        let engine = Engine::new()
            .with_graph(graph)
            .with_serializers(self.serializers)
            .with_settings(self.config.engine_settings());
        Ok(WebMachine::from_engine(engine))
    }
}

impl Default for WebMachineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
