//! Pipeline assembly for the four run modes.
//!
//! Each mode builds its graph fresh per invocation. The standalone
//! training mode and the full pipeline intentionally run the trainer
//! with different hyperparameters, and only the full pipeline forwards
//! the bucket name to the data processor; both divergences are pinned
//! by the regression tests below.

use crate::config::WorkflowConfig;
use crate::error::PipelineError;

use super::components::{data_processor, model_deploy, model_training, TrainingParams};
use super::graph::{GraphBuilder, PipelineGraph};

/// Epoch count for the standalone training mode.
const STANDALONE_EPOCHS: u32 = 3;

/// Hyperparameters pinned by the full pipeline.
const PIPELINE_EPOCHS: u32 = 1;
const PIPELINE_BATCH_SIZE: u32 = 32;
const PIPELINE_MODEL_NAME: &str = "EfficientNetV2B0";

/// Single-stage pipeline running only the data processor.
pub fn data_processor_pipeline(config: &WorkflowConfig) -> Result<PipelineGraph, PipelineError> {
    let mut builder = GraphBuilder::new("data-processor-pipeline");
    // Standalone runs do not forward the bucket name; only the full
    // pipeline binds it.
    builder.add_stage(data_processor(&config.data_processor_image, None));
    builder.build()
}

/// Single-stage pipeline running only model training.
pub fn model_training_pipeline(config: &WorkflowConfig) -> Result<PipelineGraph, PipelineError> {
    let mut builder = GraphBuilder::new("model-training-pipeline");
    builder.add_stage(model_training(TrainingParams::new(
        &config.project,
        &config.region,
        &config.package_uri,
        &config.bucket_name,
        STANDALONE_EPOCHS,
    )));
    builder.build()
}

/// Single-stage pipeline running only model deployment.
pub fn model_deploy_pipeline(config: &WorkflowConfig) -> Result<PipelineGraph, PipelineError> {
    let mut builder = GraphBuilder::new("model-deploy-pipeline");
    builder.add_stage(model_deploy(&config.bucket_name));
    builder.build()
}

/// Full three-stage pipeline: data processor, then model training, then
/// model deployment, chained strictly in sequence.
pub fn ml_pipeline(config: &WorkflowConfig) -> Result<PipelineGraph, PipelineError> {
    let mut builder = GraphBuilder::new("ml-pipeline");

    let processor = builder.add_stage(data_processor(
        &config.data_processor_image,
        Some(&config.bucket_name),
    ));
    let training = builder.add_stage(model_training(
        TrainingParams::new(
            &config.project,
            &config.region,
            &config.package_uri,
            &config.bucket_name,
            PIPELINE_EPOCHS,
        )
        .with_batch_size(PIPELINE_BATCH_SIZE)
        .with_model_name(PIPELINE_MODEL_NAME)
        .with_train_base(false),
    ));
    let deploy = builder.add_stage(model_deploy(&config.bucket_name));

    builder.after(training, processor);
    builder.after(deploy, training);
    builder.build()
}
