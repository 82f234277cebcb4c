//! platepals-workflow: CLI launcher for the PlatePals ML pipelines.
//!
//! Assembles the data-processing, model-training and model-deployment
//! stages into pipeline graphs, compiles them to declarative YAML
//! manifests and submits them as Vertex AI pipeline jobs.

// Core modules
pub mod aip;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod utils;

// Re-export commonly used error types
pub use error::{AipError, ConfigError, PipelineError};
