//! Stage constructors for the three PlatePals workflow stages.
//!
//! `model_training` and `model_deploy` wrap the pre-built trainer
//! components; `data_processor` wraps the preprocessing container image.

use super::graph::{ParamValue, Stage, StageExecutable};

/// Display names used for the three stages.
pub const DATA_PROCESSOR_STAGE: &str = "Data Processor";
pub const MODEL_TRAINING_STAGE: &str = "Model Training";
pub const MODEL_DEPLOY_STAGE: &str = "Model Deploy";

/// Hyperparameters for the model-training component.
///
/// The standalone training mode only fixes the epoch count; the full
/// pipeline additionally pins batch size, architecture and base-layer
/// freezing. Both shapes are expressed through the optional fields and
/// only set parameters are forwarded to the component.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingParams {
    pub project: String,
    pub location: String,
    pub staging_bucket: String,
    pub bucket_name: String,
    pub epochs: u32,
    pub batch_size: Option<u32>,
    pub model_name: Option<String>,
    pub train_base: Option<bool>,
}

impl TrainingParams {
    pub fn new(
        project: impl Into<String>,
        location: impl Into<String>,
        staging_bucket: impl Into<String>,
        bucket_name: impl Into<String>,
        epochs: u32,
    ) -> Self {
        Self {
            project: project.into(),
            location: location.into(),
            staging_bucket: staging_bucket.into(),
            bucket_name: bucket_name.into(),
            epochs,
            batch_size: None,
            model_name: None,
            train_base: None,
        }
    }

    /// Set the training batch size.
    pub fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Set the model architecture name.
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }

    /// Set whether the base layers are trained.
    pub fn with_train_base(mut self, train_base: bool) -> Self {
        self.train_base = Some(train_base);
        self
    }
}

/// Container stage for the preprocessing image.
///
/// `bucket` is only forwarded when given: the standalone mode runs the
/// image without it, the full pipeline passes the artifact bucket.
pub fn data_processor(image: impl Into<String>, bucket: Option<&str>) -> Stage {
    let mut args = vec!["cli.py".to_string()];
    if let Some(bucket) = bucket {
        args.push(format!("--bucket {bucket}"));
    }
    Stage {
        display_name: DATA_PROCESSOR_STAGE.to_string(),
        executable: StageExecutable::Container {
            image: image.into(),
            command: Vec::new(),
            args,
        },
    }
}

/// Component stage invoking the pre-built trainer.
pub fn model_training(params: TrainingParams) -> Stage {
    let mut component_params: Vec<(String, ParamValue)> = vec![
        ("project".to_string(), params.project.into()),
        ("location".to_string(), params.location.into()),
        ("staging_bucket".to_string(), params.staging_bucket.into()),
        ("bucket_name".to_string(), params.bucket_name.into()),
        ("epochs".to_string(), params.epochs.into()),
    ];
    if let Some(batch_size) = params.batch_size {
        component_params.push(("batch_size".to_string(), batch_size.into()));
    }
    if let Some(model_name) = params.model_name {
        component_params.push(("model_name".to_string(), model_name.into()));
    }
    if let Some(train_base) = params.train_base {
        component_params.push(("train_base".to_string(), train_base.into()));
    }

    Stage {
        display_name: MODEL_TRAINING_STAGE.to_string(),
        executable: StageExecutable::Component {
            name: "model_training".to_string(),
            params: component_params,
        },
    }
}

/// Component stage invoking the pre-built deployer.
pub fn model_deploy(bucket_name: impl Into<String>) -> Stage {
    Stage {
        display_name: MODEL_DEPLOY_STAGE.to_string(),
        executable: StageExecutable::Component {
            name: "model_deploy".to_string(),
            params: vec![(
                "bucket_name".to_string(),
                ParamValue::String(bucket_name.into()),
            )],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_processor_without_bucket() {
        let stage = data_processor("platepals/preprocess-image", None);
        assert_eq!(stage.display_name, DATA_PROCESSOR_STAGE);
        match stage.executable {
            StageExecutable::Container {
                image,
                command,
                args,
            } => {
                assert_eq!(image, "platepals/preprocess-image");
                assert!(command.is_empty());
                assert_eq!(args, vec!["cli.py".to_string()]);
            }
            other => panic!("unexpected executable: {other:?}"),
        }
    }

    #[test]
    fn test_data_processor_with_bucket() {
        let stage = data_processor("platepals/preprocess-image", Some("platepals-data"));
        match stage.executable {
            StageExecutable::Container { args, .. } => {
                assert_eq!(
                    args,
                    vec![
                        "cli.py".to_string(),
                        "--bucket platepals-data".to_string(),
                    ]
                );
            }
            other => panic!("unexpected executable: {other:?}"),
        }
    }

    #[test]
    fn test_model_training_minimal_params() {
        let stage = model_training(TrainingParams::new(
            "proj",
            "us-east1",
            "gs://staging",
            "bucket",
            3,
        ));
        match stage.executable {
            StageExecutable::Component { name, params } => {
                assert_eq!(name, "model_training");
                let names: Vec<&str> = params.iter().map(|(n, _)| n.as_str()).collect();
                assert_eq!(
                    names,
                    vec![
                        "project",
                        "location",
                        "staging_bucket",
                        "bucket_name",
                        "epochs"
                    ]
                );
                assert_eq!(params[4].1, ParamValue::Int(3));
            }
            other => panic!("unexpected executable: {other:?}"),
        }
    }

    #[test]
    fn test_model_training_with_overrides() {
        let stage = model_training(
            TrainingParams::new("proj", "us-east1", "gs://staging", "bucket", 1)
                .with_batch_size(32)
                .with_model_name("EfficientNetV2B0")
                .with_train_base(false),
        );
        match stage.executable {
            StageExecutable::Component { params, .. } => {
                assert!(params.contains(&("batch_size".to_string(), ParamValue::Int(32))));
                assert!(params.contains(&(
                    "model_name".to_string(),
                    ParamValue::String("EfficientNetV2B0".to_string())
                )));
                assert!(params.contains(&("train_base".to_string(), ParamValue::Bool(false))));
            }
            other => panic!("unexpected executable: {other:?}"),
        }
    }

    #[test]
    fn test_model_deploy_params() {
        let stage = model_deploy("platepals-data");
        assert_eq!(stage.display_name, MODEL_DEPLOY_STAGE);
        match stage.executable {
            StageExecutable::Component { name, params } => {
                assert_eq!(name, "model_deploy");
                assert_eq!(
                    params,
                    vec![(
                        "bucket_name".to_string(),
                        ParamValue::String("platepals-data".to_string())
                    )]
                );
            }
            other => panic!("unexpected executable: {other:?}"),
        }
    }
}
