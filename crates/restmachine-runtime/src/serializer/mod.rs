//! Media type serializers
//!
//! Handler results are `serde_json::Value`s. The registry maps a media type
//! to the function that turns such a value into response bytes.

pub mod php;

use crate::error::{ConfigError, MachineError, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Encoder for one media type
pub type Serializer = Arc<dyn Fn(&Value) -> anyhow::Result<Vec<u8>> + Send + Sync>;

pub const APPLICATION_JSON: &str = "application/json";
pub const TEXT_PLAIN: &str = "text/plain";
pub const APPLICATION_PHP: &str = "application/php";
pub const TEXT_PHP: &str = "text/php";

/// Media type keyed serializer table. Lookups ignore ASCII case.
#[derive(Clone, Default)]
pub struct SerializerRegistry {
    serializers: HashMap<String, Serializer>,
}

impl SerializerRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// JSON, plain text, PHP serialization and PHP source
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.install(APPLICATION_JSON, json);
        registry.install(TEXT_PLAIN, plain_text);
        registry.install(APPLICATION_PHP, |value| Ok(php::to_vec(value)));
        registry.install(TEXT_PHP, |value| Ok(php::export(value).into_bytes()));
        registry
    }

    /// Register or replace the serializer of a media type
    pub fn install<F>(&mut self, media_type: impl Into<String>, f: F)
    where
        F: Fn(&Value) -> anyhow::Result<Vec<u8>> + Send + Sync + 'static,
    {
        let media_type = media_type.into().to_ascii_lowercase();
        tracing::debug!(media_type = %media_type, "serializer installed");
        self.serializers.insert(media_type, Arc::new(f));
    }

    pub fn contains(&self, media_type: &str) -> bool {
        self.serializers.contains_key(&media_type.to_ascii_lowercase())
    }

    /// Registered media types, sorted
    pub fn media_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.serializers.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    pub fn serialize(&self, value: &Value, media_type: &str) -> Result<Vec<u8>> {
        let serializer = self
            .serializers
            .get(&media_type.to_ascii_lowercase())
            .ok_or_else(|| ConfigError::NoSerializer(media_type.to_string()))?;
        serializer(value).map_err(|err| MachineError::Serialization {
            media_type: media_type.to_string(),
            source: err.into(),
        })
    }
}

impl fmt::Debug for SerializerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializerRegistry")
            .field("media_types", &self.media_types())
            .finish()
    }
}

/// `application/json`
pub fn json(value: &Value) -> anyhow::Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

/// `text/plain`: strings verbatim, `null` empty, anything else as JSON text
pub fn plain_text(value: &Value) -> anyhow::Result<Vec<u8>> {
    Ok(match value {
        Value::String(text) => text.clone().into_bytes(),
        Value::Null => Vec::new(),
        other => other.to_string().into_bytes(),
    })
}
