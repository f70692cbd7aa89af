//! Decision graph traversal
//!
//! The engine starts at the graph's start node and resolves one node at a
//! time against the request [`Context`] until a handler is reached:
//! - Decision: resolve to a bool, record it, follow `pass` or `fail`
//! - Action: run the side effect, record it, follow `next`
//! - Handler: stop and assemble the response (see `respond`)

mod respond;

use crate::context::Context;
use crate::error::{ConfigError, MachineError, Result};
use crate::request::Request;
use crate::resource::ResourceConfig;
use crate::response::Response;
use crate::serializer::SerializerRegistry;
use crate::trace::TraceSettings;
use crate::value::{ConfigEntry, Outcome};
use restmachine_core::graph::HANDLE_EXCEPTION;
use restmachine_core::{DecisionGraph, NodeKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Engine behaviour knobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub trace: TraceSettings,
    /// Check each resource against the graph before walking it
    pub validate_resources: bool,
    /// Upper bound on visited nodes per request
    pub max_transitions: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            trace: TraceSettings::default(),
            validate_resources: true,
            max_transitions: 256,
        }
    }
}

/// Where a traversal stopped
enum Terminal {
    Handler { name: String, status: u16 },
    /// An action returned a complete response
    Verbatim(Response),
}

/// Dispatches requests against resources.
///
/// Holds no per-request state; one engine can serve any number of threads.
#[derive(Debug, Clone)]
pub struct Engine {
    graph: Arc<DecisionGraph>,
    serializers: SerializerRegistry,
    settings: EngineSettings,
}

impl Engine {
    /// Built-in graph, default serializers and default settings
    pub fn new() -> Self {
        Self {
            graph: DecisionGraph::builtin(),
            serializers: SerializerRegistry::with_defaults(),
            settings: EngineSettings::default(),
        }
    }

    pub fn with_graph(mut self, graph: Arc<DecisionGraph>) -> Self {
        self.graph = graph;
        self
    }

    pub fn with_serializers(mut self, serializers: SerializerRegistry) -> Self {
        self.serializers = serializers;
        self
    }

    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn graph(&self) -> &DecisionGraph {
        &self.graph
    }

    pub fn serializers(&self) -> &SerializerRegistry {
        &self.serializers
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Register or replace the serializer of a media type.
    pub fn install_serializer<F>(&mut self, media_type: impl Into<String>, f: F)
    where
        F: Fn(&serde_json::Value) -> anyhow::Result<Vec<u8>> + Send + Sync + 'static,
    {
        self.serializers.install(media_type, f);
    }

    /// Run one request through the graph.
    ///
    /// Protocol outcomes (404, 412, ...) are `Ok` responses. `Err` means the
    /// resource is misconfigured or one of its callbacks failed without a
    /// `handle-exception` handler to take over.
    pub fn run(&self, resource: &ResourceConfig, request: Request) -> Result<Response> {
        if self.settings.validate_resources {
            resource.validate(&self.graph)?;
        }

        let span = tracing::debug_span!(
            "dispatch",
            method = %request.method(),
            uri = %request.uri()
        );
        let _enter = span.enter();

        let trace = self.settings.trace.enabled_for(&request);
        let mut ctx = Context::new(request, resource.clone());
        if trace {
            ctx.enable_trace();
        }

        let response = match self.traverse(&mut ctx)? {
            Terminal::Verbatim(response) => response,
            Terminal::Handler { name, status } => match self.respond(&mut ctx, &name, status) {
                Err(err) if name != HANDLE_EXCEPTION => {
                    let fallback = self.recover(&mut ctx, err)?;
                    ctx.record(fallback, None);
                    self.respond(&mut ctx, fallback, self.graph.status_of(fallback)?)?
                }
                result => result?,
            },
        };
        tracing::info!(status = response.status().as_u16(), "request dispatched");
        Ok(response)
    }

    fn traverse(&self, ctx: &mut Context) -> Result<Terminal> {
        let mut node = self.graph.start();
        for _ in 0..self.settings.max_transitions {
            match &self.graph.node(node)?.kind {
                NodeKind::Decision { pass, fail } => match ctx.resolve(node, false) {
                    Ok(outcome) => {
                        tracing::debug!(node, outcome, "decision");
                        ctx.record(node, Some(outcome));
                        node = if outcome { pass.as_str() } else { fail.as_str() };
                    }
                    Err(err) => {
                        ctx.record(node, None);
                        node = self.recover(ctx, err)?;
                    }
                },
                NodeKind::Action { next } => match self.perform(ctx, node) {
                    Ok(verbatim) => {
                        tracing::debug!(node, "action");
                        ctx.record(node, None);
                        if let Some(response) = verbatim {
                            return Ok(Terminal::Verbatim(response));
                        }
                        node = next.as_str();
                    }
                    Err(err) => {
                        ctx.record(node, None);
                        node = self.recover(ctx, err)?;
                    }
                },
                NodeKind::Handler { status } => {
                    tracing::debug!(node, status, "handler");
                    ctx.record(node, None);
                    return Ok(Terminal::Handler {
                        name: node.to_string(),
                        status: *status,
                    });
                }
            }
        }
        tracing::error!(
            limit = self.settings.max_transitions,
            "traversal did not reach a handler"
        );
        Err(ConfigError::TransitionLimit(self.settings.max_transitions).into())
    }

    /// Run an action. `Some` when it produced a complete response.
    fn perform(&self, ctx: &mut Context, node: &str) -> Result<Option<Response>> {
        let Some(action) = ctx.resource().action(node)? else {
            return Ok(None);
        };
        match action(ctx).map_err(|err| MachineError::callback(node, err))? {
            Outcome::Response(response) => Ok(Some(response)),
            Outcome::Empty | Outcome::Value(_) => Ok(None),
        }
    }

    /// Route a callback failure to `handle-exception` when the resource
    /// configures it; every other error propagates.
    fn recover(&self, ctx: &mut Context, err: MachineError) -> Result<&'static str> {
        let handled = self.graph.contains(HANDLE_EXCEPTION)
            && matches!(ctx.resource().get(HANDLE_EXCEPTION), Some(ConfigEntry::Handler(_)));
        match err {
            MachineError::Callback { node, source } if handled => {
                tracing::warn!(node = %node, error = %source, "callback failed, handing over to handle-exception");
                ctx.set_failure(source);
                Ok(HANDLE_EXCEPTION)
            }
            other => Err(other),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
