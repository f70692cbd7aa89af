//! Resource configuration
//!
//! A [`ResourceConfig`] maps keys to [`ConfigEntry`] values. Keys that name a
//! graph node answer that node; the remaining keys (see [`keys`]) are data
//! read by the built-in decisions and by response assembly.

mod builder;
mod defaults;
pub mod keys;

pub use builder::{ACTION_SETTERS, DECISION_SETTERS, HANDLER_SETTERS};
pub use defaults::KNOWN_METHODS;

use crate::context::Context;
use crate::error::{ConfigError, MachineError};
use crate::value::{Callback, ConfigEntry, ConfigValue, EntryValue, Outcome};
use restmachine_core::{DecisionGraph, GraphError, NodeRole};
use std::collections::HashMap;
use std::fmt;

/// Declarative description of one HTTP resource.
///
/// Cloning is cheap: callbacks are reference counted. The engine works on a
/// private clone per request, so a config can be shared freely.
#[derive(Clone)]
pub struct ResourceConfig {
    entries: HashMap<String, ConfigEntry>,
}

impl ResourceConfig {
    /// A resource seeded with the built-in defaults
    pub fn new() -> Self {
        Self {
            entries: defaults::builtin(),
        }
    }

    /// Copy `base` if given, otherwise start from the built-in defaults.
    pub fn create(base: Option<&ResourceConfig>) -> Self {
        base.cloned().unwrap_or_default()
    }

    /// A resource with no entries at all, not even the defaults
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Set a key and return the config, for chaining
    pub fn set(mut self, key: impl Into<String>, entry: ConfigEntry) -> Self {
        self.entries.insert(key.into(), entry);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, entry: ConfigEntry) -> Option<ConfigEntry> {
        self.entries.insert(key.into(), entry)
    }

    pub fn remove(&mut self, key: &str) -> Option<ConfigEntry> {
        self.entries.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&ConfigEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Typed value of a data or decision key
    pub fn value<T: EntryValue>(&self, key: &str) -> Result<Option<ConfigValue<T>>, ConfigError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(entry) => T::from_entry(entry)
                .map(Some)
                .ok_or_else(|| ConfigError::EntryMismatch {
                    key: key.to_string(),
                    expected: T::KIND,
                    found: entry.kind(),
                }),
        }
    }

    /// Resolve a key against a context; see [`Context::resolve`]
    pub fn resolve<T: EntryValue>(
        &self,
        key: &str,
        ctx: &mut Context,
        default: T,
    ) -> Result<T, MachineError> {
        match self.value::<T>(key)? {
            Some(value) => value
                .resolve(ctx)
                .map_err(|err| MachineError::callback(key, err)),
            None => Ok(default),
        }
    }

    pub fn action(&self, key: &str) -> Result<Option<Callback<Outcome>>, ConfigError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(ConfigEntry::Action(f)) => Ok(Some(f.clone())),
            Some(other) => Err(ConfigError::EntryMismatch {
                key: key.to_string(),
                expected: "action",
                found: other.kind(),
            }),
        }
    }

    /// Handler callback of a node. A key that holds anything other than a
    /// handler is an error, never an empty body.
    pub fn handler(&self, key: &str) -> Result<Option<Callback<Outcome>>, ConfigError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(ConfigEntry::Handler(f)) => Ok(Some(f.clone())),
            Some(_) => Err(ConfigError::HandlerNotInvocable(key.to_string())),
        }
    }

    /// Check every key against the roles of `graph`.
    ///
    /// Node keys must hold the entry kind of their role. Flags, actions and
    /// handlers under a key that is not a node are reported as unknown nodes,
    /// which catches misspelled decision names. Keys of the built-in graph
    /// that `graph` lacks are never consulted and pass.
    pub fn validate(&self, graph: &DecisionGraph) -> Result<(), ConfigError> {
        let builtin = DecisionGraph::builtin();
        for (key, entry) in &self.entries {
            let expected = match graph.node(key) {
                Ok(node) => match node.role() {
                    NodeRole::Decision => "flag",
                    NodeRole::Action => "action",
                    NodeRole::Handler => "handler",
                },
                Err(_) if builtin.contains(key) => continue,
                Err(_) => match entry {
                    ConfigEntry::Flag(_) | ConfigEntry::Action(_) | ConfigEntry::Handler(_) => {
                        return Err(GraphError::UnknownNode(key.clone()).into());
                    }
                    _ => continue,
                },
            };
            if entry.kind() != expected {
                return Err(if expected == "handler" {
                    ConfigError::HandlerNotInvocable(key.clone())
                } else {
                    ConfigError::EntryMismatch {
                        key: key.clone(),
                        expected,
                        found: entry.kind(),
                    }
                });
            }
        }
        Ok(())
    }
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ResourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.entries.keys().collect();
        keys.sort();
        f.debug_map()
            .entries(keys.into_iter().map(|k| (k, self.entries[k].kind())))
            .finish()
    }
}
