//! HTTP client for submitting pipeline jobs.
//!
//! Thin wrapper over the regional `aiplatform.googleapis.com` REST
//! surface: one POST creates a job, GET polls it until a terminal
//! state. There is no retry layer; every failure propagates.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::WorkflowConfig;
use crate::error::AipError;

use super::job::{JobState, PipelineJob, SubmittedJob};

/// Interval between job-state polls.
const POLL_INTERVAL: Duration = Duration::from_secs(30);
/// Request timeout for individual API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for one project/region pair of the pipeline-job API.
pub struct AipClient {
    project: String,
    region: String,
    /// Optional OAuth bearer token; without it requests go out
    /// unauthenticated and the service rejects them.
    access_token: Option<String>,
    api_base: String,
    http_client: Client,
}

impl AipClient {
    pub fn new(
        project: impl Into<String>,
        region: impl Into<String>,
        access_token: Option<String>,
    ) -> Self {
        let region = region.into();
        let api_base = format!("https://{region}-aiplatform.googleapis.com/v1");
        Self {
            project: project.into(),
            region,
            access_token,
            api_base,
            http_client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    /// Create a client from the launcher configuration.
    pub fn init(config: &WorkflowConfig) -> Self {
        Self::new(&config.project, &config.region, config.access_token.clone())
    }

    /// Submit `job` to run as `service_account`, returning once the
    /// service has accepted it. The remote run continues asynchronously.
    pub async fn submit(
        &self,
        job: &PipelineJob,
        service_account: &str,
    ) -> Result<SubmittedJob, AipError> {
        let mut pipeline_spec = load_pipeline_spec(job.template_path())?;
        if !job.enable_caching() {
            disable_caching(&mut pipeline_spec);
        }

        let request = CreateJobRequest {
            display_name: job.display_name().to_string(),
            pipeline_spec,
            runtime_config: RuntimeConfig {
                gcs_output_directory: job.pipeline_root().to_string(),
            },
            service_account: service_account.to_string(),
        };

        let url = format!(
            "{}/projects/{}/locations/{}/pipelineJobs",
            self.api_base, self.project, self.region
        );
        info!(display_name = job.display_name(), "Submitting pipeline job");

        let mut http_request = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json");
        if let Some(ref token) = self.access_token {
            http_request = http_request.header("Authorization", format!("Bearer {token}"));
        }

        let http_response = http_request
            .json(&request)
            .send()
            .await
            .map_err(|e| AipError::RequestFailed(e.to_string()))?;

        let resource: JobResource = read_response(http_response).await?;
        Ok(SubmittedJob {
            display_name: resource
                .display_name
                .unwrap_or_else(|| job.display_name().to_string()),
            state: resource.state.unwrap_or(JobState::Queued),
            name: resource.name,
        })
    }

    /// Fetch the current state of a submitted job by resource name.
    pub async fn get_job(&self, name: &str) -> Result<SubmittedJob, AipError> {
        let url = format!("{}/{}", self.api_base, name);

        let mut http_request = self.http_client.get(&url);
        if let Some(ref token) = self.access_token {
            http_request = http_request.header("Authorization", format!("Bearer {token}"));
        }

        let http_response = http_request
            .send()
            .await
            .map_err(|e| AipError::RequestFailed(e.to_string()))?;

        let resource: JobResource = read_response(http_response).await?;
        Ok(SubmittedJob {
            display_name: resource.display_name.unwrap_or_default(),
            state: resource.state.unwrap_or(JobState::Unspecified),
            name: resource.name,
        })
    }

    /// Submit `job` and block until the remote run reaches a terminal
    /// state. A failed or cancelled run is an error.
    pub async fn run(
        &self,
        job: &PipelineJob,
        service_account: &str,
    ) -> Result<SubmittedJob, AipError> {
        let submitted = self.submit(job, service_account).await?;
        info!(name = %submitted.name, "Pipeline job created");

        loop {
            let current = self.get_job(&submitted.name).await?;
            if current.state.is_terminal() {
                if current.state.is_success() {
                    info!(name = %current.name, "Pipeline job succeeded");
                    return Ok(current);
                }
                return Err(AipError::JobFailed {
                    name: current.name,
                    state: current.state.to_string(),
                });
            }
            debug!(name = %current.name, state = %current.state, "Pipeline job in progress");
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

/// Read a compiled manifest and re-encode it as the JSON pipeline spec
/// the REST API expects.
fn load_pipeline_spec(path: &Path) -> Result<Value, AipError> {
    let text = std::fs::read_to_string(path)?;
    let yaml: serde_yaml::Value = serde_yaml::from_str(&text)?;
    serde_json::to_value(yaml).map_err(|e| AipError::InvalidManifest {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Mark every task in the spec as non-cacheable so each submission
/// re-executes all stages.
fn disable_caching(pipeline_spec: &mut Value) {
    let Some(tasks) = pipeline_spec
        .pointer_mut("/root/dag/tasks")
        .and_then(Value::as_object_mut)
    else {
        return;
    };
    for task in tasks.values_mut() {
        if let Some(task) = task.as_object_mut() {
            task.insert(
                "cachingOptions".to_string(),
                serde_json::json!({ "enableCache": false }),
            );
        }
    }
}

async fn read_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, AipError> {
    let status = response.status();
    if !status.is_success() {
        let code = status.as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error response".to_string());

        // Prefer the structured error message when the body carries one
        if let Ok(error_response) = serde_json::from_str::<ApiErrorResponse>(&body) {
            if code == 429 {
                return Err(AipError::RateLimited(error_response.error.message));
            }
            return Err(AipError::ApiError {
                code,
                message: error_response.error.message,
            });
        }

        return Err(AipError::ApiError {
            code,
            message: body,
        });
    }

    response
        .json()
        .await
        .map_err(|e| AipError::ParseError(e.to_string()))
}

/// Request body for job creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateJobRequest {
    display_name: String,
    pipeline_spec: Value,
    runtime_config: RuntimeConfig,
    service_account: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RuntimeConfig {
    gcs_output_directory: String,
}

/// Job resource as returned by the service.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobResource {
    name: String,
    display_name: Option<String>,
    state: Option<JobState>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)] // Fields kept for complete API error deserialization
struct ApiErrorDetail {
    message: String,
    code: Option<i32>,
    status: Option<String>,
}
