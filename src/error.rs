//! Error types for workflow launcher operations.
//!
//! Defines error types for the three subsystems:
//! - Environment configuration
//! - Pipeline graph construction and manifest compilation
//! - Remote job submission
//!
//! All three are fatal: the launcher performs no retries and no partial
//! recovery, so every error propagates to `main` and ends the process.

use thiserror::Error;

/// Errors that can occur while resolving the environment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more required environment variables are unset or empty.
    /// Every missing name is collected before failing.
    #[error("Missing environment variables: {}", .0.join(", "))]
    MissingEnvVars(Vec<String>),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors that can occur while building or compiling a pipeline graph.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Pipeline '{0}' has no stages")]
    EmptyPipeline(String),

    #[error("Duplicate stage '{0}' in pipeline")]
    DuplicateStage(String),

    #[error("Edge references unknown stage {0}")]
    UnknownStage(String),

    #[error("Cycle detected in pipeline graph at stage '{0}'")]
    CycleDetected(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors that can occur while talking to the Vertex AI pipeline-job API.
#[derive(Debug, Error)]
pub enum AipError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API error ({code}): {message}")]
    ApiError { code: u16, message: String },

    #[error("Pipeline job '{name}' finished in state {state}")]
    JobFailed { name: String, state: String },

    #[error("Invalid manifest '{path}': {message}")]
    InvalidManifest { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
