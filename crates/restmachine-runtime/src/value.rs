//! Values stored in a resource configuration.
//!
//! Every key maps to a [`ConfigEntry`]. Data entries are either a constant or
//! a callback computed against the request [`Context`]; actions and handlers
//! are always callbacks.

use crate::context::Context;
use crate::response::Response;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A caller-supplied function evaluated against the request context
pub type Callback<T> = Arc<dyn Fn(&mut Context) -> anyhow::Result<T> + Send + Sync>;

/// Constant or computed value of a configuration key
#[derive(Clone)]
pub enum ConfigValue<T> {
    Constant(T),
    Computed(Callback<T>),
}

impl<T: Clone> ConfigValue<T> {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&mut Context) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        ConfigValue::Computed(Arc::new(f))
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, ConfigValue::Computed(_))
    }

    pub fn resolve(&self, ctx: &mut Context) -> anyhow::Result<T> {
        match self {
            ConfigValue::Constant(value) => Ok(value.clone()),
            ConfigValue::Computed(f) => f(ctx),
        }
    }
}

impl<T> From<T> for ConfigValue<T> {
    fn from(value: T) -> Self {
        ConfigValue::Constant(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for ConfigValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            ConfigValue::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Result of an action or handler
#[derive(Debug, Clone, Default)]
pub enum Outcome {
    /// Nothing to add; the engine builds the response
    #[default]
    Empty,
    /// A value serialized with the negotiated media type
    Value(serde_json::Value),
    /// A complete response, returned as is
    Response(Response),
}

impl Outcome {
    /// Serialize any `Serialize` type into [`Outcome::Value`].
    pub fn serialize<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<Self> {
        Ok(Outcome::Value(serde_json::to_value(value)?))
    }
}

impl From<()> for Outcome {
    fn from(_: ()) -> Self {
        Outcome::Empty
    }
}

impl From<serde_json::Value> for Outcome {
    fn from(value: serde_json::Value) -> Self {
        Outcome::Value(value)
    }
}

impl From<Response> for Outcome {
    fn from(response: Response) -> Self {
        Outcome::Response(response)
    }
}

impl From<&str> for Outcome {
    fn from(text: &str) -> Self {
        Outcome::Value(serde_json::Value::String(text.to_string()))
    }
}

impl From<String> for Outcome {
    fn from(text: String) -> Self {
        Outcome::Value(serde_json::Value::String(text))
    }
}

/// One entry of a resource configuration
#[derive(Clone)]
pub enum ConfigEntry {
    /// Answer of a decision node
    Flag(ConfigValue<bool>),
    /// Method or media type lists
    List(ConfigValue<Vec<String>>),
    /// Optional text such as `etag` or `location`
    Text(ConfigValue<Option<String>>),
    /// Optional instant such as `last-modified`
    Timestamp(ConfigValue<Option<DateTime<Utc>>>),
    /// Side effect of an action node
    Action(Callback<Outcome>),
    /// Body producer of a handler node
    Handler(Callback<Outcome>),
}

impl ConfigEntry {
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigEntry::Flag(_) => "flag",
            ConfigEntry::List(_) => "list",
            ConfigEntry::Text(_) => "text",
            ConfigEntry::Timestamp(_) => "timestamp",
            ConfigEntry::Action(_) => "action",
            ConfigEntry::Handler(_) => "handler",
        }
    }

    pub fn flag(value: bool) -> Self {
        ConfigEntry::Flag(ConfigValue::Constant(value))
    }

    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ConfigEntry::List(ConfigValue::Constant(values.into_iter().map(Into::into).collect()))
    }

    pub fn text(value: impl Into<String>) -> Self {
        ConfigEntry::Text(ConfigValue::Constant(Some(value.into())))
    }

    pub fn timestamp(value: DateTime<Utc>) -> Self {
        ConfigEntry::Timestamp(ConfigValue::Constant(Some(value)))
    }
}

impl fmt::Debug for ConfigEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigEntry::Flag(v) => f.debug_tuple("Flag").field(v).finish(),
            ConfigEntry::List(v) => f.debug_tuple("List").field(v).finish(),
            ConfigEntry::Text(v) => f.debug_tuple("Text").field(v).finish(),
            ConfigEntry::Timestamp(v) => f.debug_tuple("Timestamp").field(v).finish(),
            ConfigEntry::Action(_) => f.write_str("Action(..)"),
            ConfigEntry::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

/// Types that can be read out of a [`ConfigEntry`]
pub trait EntryValue: Clone + Send + Sync + 'static {
    /// Entry kind holding this type, as reported by [`ConfigEntry::kind`]
    const KIND: &'static str;

    fn from_entry(entry: &ConfigEntry) -> Option<ConfigValue<Self>>;
}

impl EntryValue for bool {
    const KIND: &'static str = "flag";

    fn from_entry(entry: &ConfigEntry) -> Option<ConfigValue<Self>> {
        match entry {
            ConfigEntry::Flag(value) => Some(value.clone()),
            _ => None,
        }
    }
}

impl EntryValue for Vec<String> {
    const KIND: &'static str = "list";

    fn from_entry(entry: &ConfigEntry) -> Option<ConfigValue<Self>> {
        match entry {
            ConfigEntry::List(value) => Some(value.clone()),
            _ => None,
        }
    }
}

impl EntryValue for Option<String> {
    const KIND: &'static str = "text";

    fn from_entry(entry: &ConfigEntry) -> Option<ConfigValue<Self>> {
        match entry {
            ConfigEntry::Text(value) => Some(value.clone()),
            _ => None,
        }
    }
}

impl EntryValue for Option<DateTime<Utc>> {
    const KIND: &'static str = "timestamp";

    fn from_entry(entry: &ConfigEntry) -> Option<ConfigValue<Self>> {
        match entry {
            ConfigEntry::Timestamp(value) => Some(value.clone()),
            _ => None,
        }
    }
}
