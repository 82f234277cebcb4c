//! Environment-driven configuration for the workflow launcher.
//!
//! All configuration comes from environment variables; the launcher
//! refuses to start when any required variable is unset. Validation is
//! eager and aggregate: every missing variable is reported in a single
//! error instead of failing on the first one.

use crate::error::ConfigError;

/// Optional bearer token attached to submission requests when present.
/// Its absence is not a startup error; unauthenticated submissions fail
/// remotely and propagate from there.
const ACCESS_TOKEN_VAR: &str = "GCP_ACCESS_TOKEN";

/// Resolved launcher configuration.
///
/// Constructed once at process start from the six required environment
/// variables. The bucket URI and pipeline root are derived, not read.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// GCP project identifier (`GCP_PROJECT`).
    pub project: String,
    /// Region the pipeline jobs run in (`GCP_REGION`).
    pub region: String,
    /// Storage bucket name for pipeline artifacts (`GCS_BUCKET_NAME`).
    pub bucket_name: String,
    /// Service account the remote jobs execute as (`GCS_SERVICE_ACCOUNT`).
    pub service_account: String,
    /// Staging location of the trainer package (`GCS_PACKAGE_URI`).
    pub package_uri: String,
    /// Container image for the data-processor stage (`DATA_PROCESSOR_IMAGE`).
    pub data_processor_image: String,
    /// Optional OAuth bearer token for the submission API.
    pub access_token: Option<String>,
}

impl WorkflowConfig {
    /// Read the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVars`] naming every required
    /// variable that is unset or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an injected lookup function.
    ///
    /// `from_env` delegates here; tests supply a map-backed lookup
    /// instead of mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut require = |key: &'static str| -> String {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => value,
                _ => {
                    missing.push(key.to_string());
                    String::new()
                }
            }
        };

        let project = require("GCP_PROJECT");
        let region = require("GCP_REGION");
        let bucket_name = require("GCS_BUCKET_NAME");
        let service_account = require("GCS_SERVICE_ACCOUNT");
        let package_uri = require("GCS_PACKAGE_URI");
        let data_processor_image = require("DATA_PROCESSOR_IMAGE");

        let access_token = lookup(ACCESS_TOKEN_VAR).filter(|token| !token.trim().is_empty());

        if !missing.is_empty() {
            return Err(ConfigError::MissingEnvVars(missing));
        }

        Ok(Self {
            project,
            region,
            bucket_name,
            service_account,
            package_uri,
            data_processor_image,
            access_token,
        })
    }

    /// `gs://` URI of the artifact bucket.
    pub fn bucket_uri(&self) -> String {
        format!("gs://{}", self.bucket_name)
    }

    /// Root path for intermediate pipeline artifacts.
    pub fn pipeline_root(&self) -> String {
        format!("{}/pipeline_root/root", self.bucket_uri())
    }
}
