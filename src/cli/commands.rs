//! CLI surface for the workflow launcher.
//!
//! Four mutually-independent boolean flags select which jobs to submit.
//! Several may be combined; the selected modes run sequentially in a
//! fixed order, each submission completing before the next begins.

use clap::Parser;
use tracing::info;

use crate::aip::{AipClient, PipelineJob};
use crate::config::WorkflowConfig;
use crate::pipeline::{self, PipelineGraph};
use crate::utils::job_id;

/// Manifest output paths, one per mode, written to the working directory.
const DATA_PROCESSOR_MANIFEST: &str = "data_processor.yaml";
const MODEL_TRAINING_MANIFEST: &str = "model_training.yaml";
const MODEL_DEPLOY_MANIFEST: &str = "model_deploy.yaml";
const PIPELINE_MANIFEST: &str = "pipeline.yaml";

/// PlatePals workflow launcher.
#[derive(Parser, Debug)]
#[command(name = "platepals-workflow")]
#[command(about = "Assemble and submit PlatePals ML pipelines to Vertex AI")]
#[command(version)]
pub struct Cli {
    /// Run just the Data Processor.
    #[arg(short = 'p', long, alias = "data_processor")]
    pub data_processor: bool,

    /// Run just Model Training.
    #[arg(short = 't', long, alias = "model_training")]
    pub model_training: bool,

    /// Run just Model Deployment.
    #[arg(short = 'd', long, alias = "model_deploy")]
    pub model_deploy: bool,

    /// Run the full PlatePals app pipeline.
    #[arg(short = 'w', long)]
    pub pipeline: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

/// Parse CLI arguments from the process arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI with parsed arguments and resolved configuration.
///
/// This is the main entry point for the launcher.
pub async fn run_with_cli(cli: Cli, config: WorkflowConfig) -> anyhow::Result<()> {
    info!(
        data_processor = cli.data_processor,
        model_training = cli.model_training,
        model_deploy = cli.model_deploy,
        pipeline = cli.pipeline,
        "CLI arguments"
    );

    if cli.data_processor {
        run_data_processor(&config).await?;
    }
    if cli.model_training {
        run_model_training(&config).await?;
    }
    if cli.model_deploy {
        run_model_deploy(&config).await?;
    }
    if cli.pipeline {
        run_pipeline(&config).await?;
    }

    Ok(())
}

async fn run_data_processor(config: &WorkflowConfig) -> anyhow::Result<()> {
    info!("Data Processor");
    let graph = pipeline::data_processor_pipeline(config)?;
    submit(config, &graph, DATA_PROCESSOR_MANIFEST, "platepals-data-processor").await
}

async fn run_model_training(config: &WorkflowConfig) -> anyhow::Result<()> {
    info!("Model Training");
    let graph = pipeline::model_training_pipeline(config)?;
    submit(config, &graph, MODEL_TRAINING_MANIFEST, "platepals-model-training").await
}

async fn run_model_deploy(config: &WorkflowConfig) -> anyhow::Result<()> {
    info!("Model Deploy");
    let graph = pipeline::model_deploy_pipeline(config)?;
    submit(config, &graph, MODEL_DEPLOY_MANIFEST, "platepals-app-model-deploy").await
}

async fn run_pipeline(config: &WorkflowConfig) -> anyhow::Result<()> {
    info!("PlatePals App Pipeline");
    let graph = pipeline::ml_pipeline(config)?;
    submit(config, &graph, PIPELINE_MANIFEST, "platepals-app-pipeline").await
}

/// Display name for a submitted job: the mode label plus a random
/// suffix to disambiguate repeated runs.
fn display_name(label: &str) -> String {
    format!("{label}-{}", job_id::generate_default())
}

/// Compile `graph` to `manifest_path` and submit it as a fresh pipeline
/// job, waiting for the remote run to finish.
async fn submit(
    config: &WorkflowConfig,
    graph: &PipelineGraph,
    manifest_path: &str,
    label: &str,
) -> anyhow::Result<()> {
    let manifest = pipeline::compile(graph, manifest_path)?;

    let client = AipClient::init(config);
    let job = PipelineJob::new(display_name(label), manifest, config.pipeline_root());

    let finished = client.run(&job, &config.service_account).await?;
    info!(name = %finished.name, state = %finished.state, "Pipeline job finished");
    Ok(())
}
