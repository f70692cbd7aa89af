//! Decision trace recording.

use crate::request::Request;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Header that turns tracing on for a single request
pub const DEFAULT_TRACE_HEADER: &str = "x-restmachine-trace";

/// One visited node. Decisions carry their outcome; actions and the final
/// handler carry none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub node: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<bool>,
}

impl TraceEntry {
    pub fn new(node: impl Into<String>, outcome: Option<bool>) -> Self {
        Self {
            node: node.into(),
            outcome,
        }
    }
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            Some(outcome) => write!(f, "{} -> {}", self.node, outcome),
            None => write!(f, "{}", self.node),
        }
    }
}

/// When to record the trace and where to emit it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceSettings {
    /// Trace every request
    pub enabled: bool,
    /// Trace requests that carry this header, whatever `enabled` says
    pub request_header: Option<String>,
    /// Response header receiving one value per entry
    pub response_header: String,
}

impl Default for TraceSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            request_header: Some(DEFAULT_TRACE_HEADER.to_string()),
            response_header: DEFAULT_TRACE_HEADER.to_string(),
        }
    }
}

impl TraceSettings {
    pub fn enabled_for(&self, request: &Request) -> bool {
        self.enabled
            || self
                .request_header
                .as_deref()
                .map_or(false, |header| request.has_header(header))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_display() {
        assert_eq!(TraceEntry::new("exists?", Some(true)).to_string(), "exists? -> true");
        assert_eq!(TraceEntry::new("handle-ok", None).to_string(), "handle-ok");
    }

    #[test]
    fn test_entry_serde_omits_missing_outcome() {
        let json = serde_json::to_string(&TraceEntry::new("put!", None)).unwrap();
        assert_eq!(json, "{\"node\":\"put!\"}");
    }

    #[test]
    fn test_enabled_for() {
        let settings = TraceSettings::default();
        assert!(!settings.enabled_for(&Request::get()));
        assert!(settings.enabled_for(&Request::get().with_header(DEFAULT_TRACE_HEADER, "1")));

        let always = TraceSettings {
            enabled: true,
            ..TraceSettings::default()
        };
        assert!(always.enabled_for(&Request::get()));

        let never = TraceSettings {
            request_header: None,
            ..TraceSettings::default()
        };
        assert!(!never.enabled_for(&Request::get().with_header(DEFAULT_TRACE_HEADER, "1")));
    }
}
