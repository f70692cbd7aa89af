//! Machine configuration
//!
//! Loaded from an optional `config/restmachine.{yaml,toml,json}` file and
//! `RESTMACHINE_*` environment variables (a `.env` file is honoured), or
//! parsed from YAML text.

use crate::error::{Result, SdkError};
use restmachine_runtime::trace::DEFAULT_TRACE_HEADER;
use restmachine_runtime::{EngineSettings, TraceSettings};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine configuration as read from files or the environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Record and emit the decision trace on every response
    pub trace: bool,

    /// Request header that turns the trace on for one request
    pub trace_request_header: Option<String>,

    /// Response header carrying the trace entries
    pub trace_response_header: String,

    /// Check resources against the graph before dispatch
    pub validate_resources: bool,

    /// Upper bound on visited nodes per request
    pub max_transitions: usize,
}

impl MachineConfig {
    pub fn new() -> Self {
        Self {
            trace: false,
            trace_request_header: Some(DEFAULT_TRACE_HEADER.to_string()),
            trace_response_header: DEFAULT_TRACE_HEADER.to_string(),
            validate_resources: true,
            max_transitions: 256,
        }
    }

    /// Load from `config/restmachine` and the environment
    pub fn load() -> Result<Self> {
        // Load .env file if exists
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/restmachine").required(false))
            .add_source(config::Environment::with_prefix("RESTMACHINE").try_parsing(true))
            .build()?;
        let loaded: Self = config.try_deserialize()?;
        loaded.validate()?;
        tracing::debug!(?loaded, "machine configuration loaded");
        Ok(loaded)
    }

    /// Load from an explicit file; the format follows the extension
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .build()?;
        let loaded: Self = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let loaded: Self = serde_yaml::from_str(yaml)?;
        loaded.validate()?;
        Ok(loaded)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_transitions == 0 {
            return Err(SdkError::ConfigError(
                "max_transitions must be positive".to_string(),
            ));
        }
        if self.trace_response_header.trim().is_empty() {
            return Err(SdkError::ConfigError(
                "trace_response_header must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_trace(mut self, enable: bool) -> Self {
        self.trace = enable;
        self
    }

    pub fn with_max_transitions(mut self, max: usize) -> Self {
        self.max_transitions = max;
        self
    }

    /// Runtime settings carrying the same knobs
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            trace: TraceSettings {
                enabled: self.trace,
                request_header: self.trace_request_header.clone(),
                response_header: self.trace_response_header.clone(),
            },
            validate_resources: self.validate_resources,
            max_transitions: self.max_transitions,
        }
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_machine_config_default() {
        let config = MachineConfig::default();

        assert!(!config.trace);
        assert_eq!(config.trace_request_header.as_deref(), Some("x-restmachine-trace"));
        assert_eq!(config.trace_response_header, "x-restmachine-trace");
        assert!(config.validate_resources);
        assert_eq!(config.max_transitions, 256);
        assert_eq!(config.engine_settings(), EngineSettings::default());
    }

    #[test]
    fn test_from_yaml_partial() {
        let config = MachineConfig::from_yaml_str("trace: true\nmax_transitions: 64\n").unwrap();

        assert!(config.trace);
        assert_eq!(config.max_transitions, 64);
        assert!(config.validate_resources);

        let settings = config.engine_settings();
        assert!(settings.trace.enabled);
        assert_eq!(settings.max_transitions, 64);
    }

    #[test]
    fn test_from_yaml_disables_request_header() {
        let config = MachineConfig::from_yaml_str("trace_request_header: null").unwrap();
        assert!(config.trace_request_header.is_none());
    }

    #[test]
    fn test_from_yaml_rejects_zero_limit() {
        let err = MachineConfig::from_yaml_str("max_transitions: 0").unwrap_err();
        assert!(matches!(err, SdkError::ConfigError(_)));
    }

    #[test]
    fn test_from_yaml_rejects_bad_types() {
        let err = MachineConfig::from_yaml_str("trace: sometimes").unwrap_err();
        assert!(matches!(err, SdkError::YamlError(_)));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("restmachine.yaml");
        std::fs::write(&path, "trace: true\ntrace_response_header: x-trace\n").unwrap();

        let config = MachineConfig::load_from(&path).unwrap();
        assert!(config.trace);
        assert_eq!(config.trace_response_header, "x-trace");
        assert_eq!(config.max_transitions, 256);
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = MachineConfig::load_from("/nonexistent/restmachine.yaml").unwrap_err();
        assert!(matches!(err, SdkError::LoadError(_)));
    }
}
