//! SDK error types

use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Invalid configuration values
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Configuration sources could not be read
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    /// YAML configuration could not be parsed
    #[error("Invalid YAML configuration: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The decision graph is incomplete
    #[error("Graph error: {0}")]
    GraphError(#[from] restmachine_core::GraphError),

    /// Dispatch failed
    #[error("Machine error: {0}")]
    MachineError(#[from] restmachine_runtime::MachineError),
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
