//! The WebMachine facade

use crate::builder::WebMachineBuilder;
use crate::config::MachineConfig;
use crate::error::Result;
use bytes::Bytes;
use restmachine_runtime::{Engine, Request, ResourceConfig, Response};
use serde_json::Value;

/// Entry point for dispatching requests against resources.
///
/// Shareable across threads; install serializers before serving.
#[derive(Debug, Clone, Default)]
pub struct WebMachine {
    engine: Engine,
}

impl WebMachine {
    /// Built-in graph, default serializers, default configuration
    pub fn new() -> Self {
        Self::from_engine(Engine::new())
    }

    pub fn builder() -> WebMachineBuilder {
        WebMachineBuilder::new()
    }

    pub fn from_config(config: MachineConfig) -> Result<Self> {
        WebMachineBuilder::new().with_config(config).build()
    }

    pub fn from_engine(engine: Engine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Register or replace the serializer of a media type.
    pub fn install_serializer<F>(&mut self, media_type: impl Into<String>, f: F)
    where
        F: Fn(&Value) -> anyhow::Result<Vec<u8>> + Send + Sync + 'static,
    {
        self.engine.install_serializer(media_type, f);
    }

    /// Dispatch one request against a resource
    pub fn run(&self, resource: &ResourceConfig, request: Request) -> Result<Response> {
        Ok(self.engine.run(resource, request)?)
    }

    /// Dispatch an `http::Request`, for adapters built on the `http` types
    pub fn handle(
        &self,
        resource: &ResourceConfig,
        request: http::Request<Bytes>,
    ) -> Result<http::Response<Bytes>> {
        Ok(self.run(resource, Request::from(request))?.into())
    }
}
