//! Integration tests for the Vertex AI submission client.
//!
//! These tests make real API calls to Vertex AI and create remote
//! pipeline-job resources. Run with the six launcher environment
//! variables plus GCP_ACCESS_TOKEN set:
//! cargo test --test submit_integration -- --ignored

use platepals_workflow::aip::{AipClient, PipelineJob};
use platepals_workflow::config::WorkflowConfig;
use platepals_workflow::pipeline;
use platepals_workflow::utils::job_id;

fn test_config() -> WorkflowConfig {
    WorkflowConfig::from_env()
        .expect("launcher environment variables must be set for integration tests")
}

#[tokio::test]
#[ignore] // Run with: cargo test --test submit_integration -- --ignored
async fn test_submit_data_processor_job() {
    let config = test_config();
    assert!(
        config.access_token.is_some(),
        "GCP_ACCESS_TOKEN must be set for integration tests"
    );

    let graph = pipeline::data_processor_pipeline(&config).expect("graph should assemble");

    let dir = tempfile::tempdir().expect("should create temp dir");
    let manifest = pipeline::compile(&graph, dir.path().join("data_processor.yaml"))
        .expect("compilation should succeed");

    let client = AipClient::init(&config);
    let display_name = format!("platepals-data-processor-{}", job_id::generate_default());
    let job = PipelineJob::new(display_name.clone(), manifest, config.pipeline_root());

    let submitted = client
        .submit(&job, &config.service_account)
        .await
        .expect("submission should be accepted");

    assert!(
        submitted.name.contains("/pipelineJobs/"),
        "unexpected resource name: {}",
        submitted.name
    );
    assert_eq!(submitted.display_name, display_name);
}

#[tokio::test]
#[ignore]
async fn test_submitted_job_is_queryable() {
    let config = test_config();
    let graph = pipeline::model_deploy_pipeline(&config).expect("graph should assemble");

    let dir = tempfile::tempdir().expect("should create temp dir");
    let manifest = pipeline::compile(&graph, dir.path().join("model_deploy.yaml"))
        .expect("compilation should succeed");

    let client = AipClient::init(&config);
    let display_name = format!("platepals-app-model-deploy-{}", job_id::generate_default());
    let job = PipelineJob::new(display_name, manifest, config.pipeline_root());

    let submitted = client
        .submit(&job, &config.service_account)
        .await
        .expect("submission should be accepted");

    let fetched = client
        .get_job(&submitted.name)
        .await
        .expect("job should be queryable after submission");
    assert_eq!(fetched.name, submitted.name);
}
