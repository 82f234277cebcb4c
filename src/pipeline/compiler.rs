//! Manifest compilation.
//!
//! Serializes a validated [`PipelineGraph`] into the declarative YAML
//! document the remote orchestration service consumes and writes it to
//! the requested path. Compiled manifests are left on disk after
//! submission.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

use super::graph::{ParamValue, PipelineGraph, StageExecutable};

/// Pipeline-spec schema revision written into every manifest.
const SCHEMA_VERSION: &str = "2.1.0";
const SDK_VERSION: &str = concat!("platepals-workflow-", env!("CARGO_PKG_VERSION"));

/// Compile `graph` to a manifest file at `path`, returning the path.
///
/// The graph is re-validated first so hand-assembled graphs fail here
/// rather than at submission.
pub fn compile(graph: &PipelineGraph, path: impl AsRef<Path>) -> Result<PathBuf, PipelineError> {
    graph.validate()?;

    let manifest = Manifest::from_graph(graph);
    let yaml = serde_yaml::to_string(&manifest)?;

    let path = path.as_ref();
    fs::write(path, yaml)?;
    Ok(path.to_path_buf())
}

/// Task key used in the manifest DAG: lowercased display name with
/// non-alphanumeric runs collapsed to dashes.
fn task_key(display_name: &str) -> String {
    let mut key = String::with_capacity(display_name.len());
    let mut last_dash = false;
    for c in display_name.chars() {
        if c.is_ascii_alphanumeric() {
            key.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            key.push('-');
            last_dash = true;
        }
    }
    key.trim_matches('-').to_string()
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Manifest {
    pipeline_info: PipelineInfo,
    root: Root,
    deployment_spec: DeploymentSpec,
    schema_version: String,
    sdk_version: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct PipelineInfo {
    name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Root {
    dag: Dag,
}

#[derive(Debug, Serialize, Deserialize)]
struct Dag {
    tasks: BTreeMap<String, Task>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Task {
    task_info: TaskInfo,
    component_ref: ComponentRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    dependent_tasks: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    parameters: BTreeMap<String, ParamValue>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TaskInfo {
    name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ComponentRef {
    name: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentSpec {
    executors: BTreeMap<String, Executor>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
enum Executor {
    Container {
        image: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        command: Vec<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<String>,
    },
    ComponentRef {
        name: String,
    },
}

impl Manifest {
    fn from_graph(graph: &PipelineGraph) -> Self {
        let mut tasks = BTreeMap::new();
        let mut executors = BTreeMap::new();

        for (index, stage) in graph.stages.iter().enumerate() {
            let key = task_key(&stage.display_name);
            let executor_key = format!("exec-{key}");

            let (executor, parameters) = match &stage.executable {
                StageExecutable::Container {
                    image,
                    command,
                    args,
                } => (
                    Executor::Container {
                        image: image.clone(),
                        command: command.clone(),
                        args: args.clone(),
                    },
                    BTreeMap::new(),
                ),
                StageExecutable::Component { name, params } => (
                    Executor::ComponentRef { name: name.clone() },
                    params.iter().cloned().collect(),
                ),
            };

            let mut dependent_tasks: Vec<String> = graph
                .dependencies_of(index)
                .into_iter()
                .map(task_key)
                .collect();
            dependent_tasks.sort();

            tasks.insert(
                key,
                Task {
                    task_info: TaskInfo {
                        name: stage.display_name.clone(),
                    },
                    component_ref: ComponentRef {
                        name: executor_key.clone(),
                    },
                    dependent_tasks,
                    parameters,
                },
            );
            executors.insert(executor_key, executor);
        }

        Self {
            pipeline_info: PipelineInfo {
                name: graph.name.clone(),
            },
            root: Root {
                dag: Dag { tasks },
            },
            deployment_spec: DeploymentSpec { executors },
            schema_version: SCHEMA_VERSION.to_string(),
            sdk_version: SDK_VERSION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorkflowConfig;
    use crate::pipeline::{data_processor_pipeline, ml_pipeline};

    fn test_config() -> WorkflowConfig {
        WorkflowConfig {
            project: "platepals-project".to_string(),
            region: "us-east1".to_string(),
            bucket_name: "platepals-data".to_string(),
            service_account: "runner@platepals-project.iam.gserviceaccount.com".to_string(),
            package_uri: "gs://platepals-trainer/trainer.tar.gz".to_string(),
            data_processor_image: "platepals/preprocess-image".to_string(),
            access_token: None,
        }
    }

    #[test]
    fn test_task_key_normalization() {
        assert_eq!(task_key("Data Processor"), "data-processor");
        assert_eq!(task_key("Model Training"), "model-training");
        assert_eq!(task_key("already-keyed"), "already-keyed");
    }

    #[test]
    fn test_compile_writes_manifest_file() {
        let graph = data_processor_pipeline(&test_config()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data_processor.yaml");

        let written = compile(&graph, &path).unwrap();
        assert_eq!(written, path);
        assert!(path.exists());
    }

    #[test]
    fn test_compiled_manifest_round_trips() {
        let graph = ml_pipeline(&test_config()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.yaml");
        compile(&graph, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let manifest: Manifest = serde_yaml::from_str(&text).unwrap();

        assert_eq!(manifest.pipeline_info.name, "ml-pipeline");
        assert_eq!(manifest.root.dag.tasks.len(), 3);
        assert_eq!(manifest.deployment_spec.executors.len(), 3);
        assert_eq!(manifest.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn test_full_pipeline_dependent_tasks() {
        let graph = ml_pipeline(&test_config()).unwrap();
        let manifest = Manifest::from_graph(&graph);
        let tasks = &manifest.root.dag.tasks;

        assert!(tasks["data-processor"].dependent_tasks.is_empty());
        assert_eq!(
            tasks["model-training"].dependent_tasks,
            vec!["data-processor".to_string()]
        );
        assert_eq!(
            tasks["model-deploy"].dependent_tasks,
            vec!["model-training".to_string()]
        );
    }

    #[test]
    fn test_container_stage_becomes_container_executor() {
        let graph = data_processor_pipeline(&test_config()).unwrap();
        let manifest = Manifest::from_graph(&graph);

        match &manifest.deployment_spec.executors["exec-data-processor"] {
            Executor::Container { image, args, .. } => {
                assert_eq!(image, "platepals/preprocess-image");
                assert_eq!(args, &vec!["cli.py".to_string()]);
            }
            other => panic!("unexpected executor: {other:?}"),
        }
    }

    #[test]
    fn test_component_stage_parameters_survive() {
        let graph = ml_pipeline(&test_config()).unwrap();
        let manifest = Manifest::from_graph(&graph);
        let training = &manifest.root.dag.tasks["model-training"];

        assert_eq!(training.parameters["epochs"], ParamValue::Int(1));
        assert_eq!(training.parameters["batch_size"], ParamValue::Int(32));
        assert_eq!(
            training.parameters["model_name"],
            ParamValue::String("EfficientNetV2B0".to_string())
        );
        assert_eq!(training.parameters["train_base"], ParamValue::Bool(false));
    }

    #[test]
    fn test_compile_rejects_invalid_graph() {
        let graph = PipelineGraph {
            name: "broken".to_string(),
            stages: Vec::new(),
            edges: Vec::new(),
        };
        let dir = tempfile::tempdir().unwrap();
        let err = compile(&graph, dir.path().join("broken.yaml")).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyPipeline(_)));
        assert!(!dir.path().join("broken.yaml").exists());
    }
}
