//! Pipeline job request and state types.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A pipeline job submission request.
///
/// Caching is disabled on construction and cannot be enabled: every
/// submitted run re-executes all stages.
#[derive(Debug, Clone)]
pub struct PipelineJob {
    display_name: String,
    template_path: PathBuf,
    pipeline_root: String,
    enable_caching: bool,
}

impl PipelineJob {
    pub fn new(
        display_name: impl Into<String>,
        template_path: impl Into<PathBuf>,
        pipeline_root: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            template_path: template_path.into(),
            pipeline_root: pipeline_root.into(),
            enable_caching: false,
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Path of the compiled manifest this job submits.
    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    /// Storage root for intermediate artifacts.
    pub fn pipeline_root(&self) -> &str {
        &self.pipeline_root
    }

    pub fn enable_caching(&self) -> bool {
        self.enable_caching
    }
}

/// Remote lifecycle states reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    #[serde(rename = "PIPELINE_STATE_QUEUED")]
    Queued,
    #[serde(rename = "PIPELINE_STATE_PENDING")]
    Pending,
    #[serde(rename = "PIPELINE_STATE_RUNNING")]
    Running,
    #[serde(rename = "PIPELINE_STATE_SUCCEEDED")]
    Succeeded,
    #[serde(rename = "PIPELINE_STATE_FAILED")]
    Failed,
    #[serde(rename = "PIPELINE_STATE_CANCELLING")]
    Cancelling,
    #[serde(rename = "PIPELINE_STATE_CANCELLED")]
    Cancelled,
    #[serde(rename = "PIPELINE_STATE_PAUSED")]
    Paused,
    #[serde(other, rename = "PIPELINE_STATE_UNSPECIFIED")]
    Unspecified,
}

impl JobState {
    /// Whether the remote service will not advance the job any further.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobState::Succeeded | JobState::Failed | JobState::Cancelled
        )
    }

    pub fn is_success(self) -> bool {
        self == JobState::Succeeded
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobState::Queued => "QUEUED",
            JobState::Pending => "PENDING",
            JobState::Running => "RUNNING",
            JobState::Succeeded => "SUCCEEDED",
            JobState::Failed => "FAILED",
            JobState::Cancelling => "CANCELLING",
            JobState::Cancelled => "CANCELLED",
            JobState::Paused => "PAUSED",
            JobState::Unspecified => "UNSPECIFIED",
        };
        f.write_str(name)
    }
}

/// Handle to a job accepted by the remote service. The resource name is
/// the only thing that outlives the launcher process.
#[derive(Debug, Clone)]
pub struct SubmittedJob {
    /// Fully-qualified resource name
    /// (`projects/{p}/locations/{r}/pipelineJobs/{id}`).
    pub name: String,
    pub display_name: String,
    pub state: JobState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caching_is_always_disabled() {
        let job = PipelineJob::new(
            "platepals-data-processor-abc123xy",
            "data_processor.yaml",
            "gs://platepals-data/pipeline_root/root",
        );
        assert!(!job.enable_caching());
    }

    #[test]
    fn test_job_accessors() {
        let job = PipelineJob::new(
            "platepals-app-pipeline-abc123xy",
            "pipeline.yaml",
            "gs://platepals-data/pipeline_root/root",
        );
        assert_eq!(job.display_name(), "platepals-app-pipeline-abc123xy");
        assert_eq!(job.template_path(), Path::new("pipeline.yaml"));
        assert_eq!(
            job.pipeline_root(),
            "gs://platepals-data/pipeline_root/root"
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(JobState::Succeeded.is_terminal());
        assert!(JobState::Failed.is_terminal());
        assert!(JobState::Cancelled.is_terminal());
        assert!(!JobState::Queued.is_terminal());
        assert!(!JobState::Running.is_terminal());
        assert!(!JobState::Pending.is_terminal());
    }

    #[test]
    fn test_state_parses_from_wire_names() {
        let state: JobState = serde_json::from_str("\"PIPELINE_STATE_RUNNING\"").unwrap();
        assert_eq!(state, JobState::Running);

        // Unknown states degrade to Unspecified instead of failing.
        let state: JobState = serde_json::from_str("\"PIPELINE_STATE_BRAND_NEW\"").unwrap();
        assert_eq!(state, JobState::Unspecified);
    }
}
