//! Pipeline graph construction, assembly and manifest compilation.

pub mod assembler;
pub mod compiler;
pub mod components;
pub mod graph;

pub use assembler::{
    data_processor_pipeline, ml_pipeline, model_deploy_pipeline, model_training_pipeline,
};
pub use compiler::compile;
pub use graph::{GraphBuilder, ParamValue, PipelineGraph, Stage, StageExecutable, StageRef};
