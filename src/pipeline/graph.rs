//! In-memory pipeline graph model.
//!
//! A pipeline is an ordered collection of named stages plus directed
//! "must complete before" edges. Graphs are assembled through
//! [`GraphBuilder`] and validated on `build`: stage names must be unique,
//! edges must reference registered stages and the result must be acyclic.
//! A graph with zero edges is legal and means all stages may run
//! concurrently.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Parameter value passed to a component stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    String(String),
    Int(i64),
    Bool(bool),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

/// How a stage's work is executed on the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StageExecutable {
    /// An external container image run as-is.
    Container {
        image: String,
        command: Vec<String>,
        args: Vec<String>,
    },
    /// A pre-built pipeline component invoked with named parameters,
    /// in declaration order.
    Component {
        name: String,
        params: Vec<(String, ParamValue)>,
    },
}

/// A named unit of work within a pipeline graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    /// Human-readable display name; unique within a graph.
    pub display_name: String,
    /// Executable backing the stage.
    pub executable: StageExecutable,
}

/// Handle to a stage registered in a [`GraphBuilder`], used to declare
/// sequencing edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageRef(usize);

/// Immutable, validated pipeline graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineGraph {
    /// Pipeline name, carried into the compiled manifest.
    pub name: String,
    /// Stages in registration order.
    pub stages: Vec<Stage>,
    /// `(earlier, later)` stage-index pairs: `later` must not start until
    /// `earlier` has completed.
    pub edges: Vec<(usize, usize)>,
}

impl PipelineGraph {
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Display names of the stages the stage at `index` depends on.
    pub fn dependencies_of(&self, index: usize) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|(_, later)| *later == index)
            .map(|(earlier, _)| self.stages[*earlier].display_name.as_str())
            .collect()
    }

    /// Check the structural invariants: at least one stage, unique stage
    /// names, edge endpoints in bounds and no cycles.
    ///
    /// The builder runs this on `build`; the manifest compiler runs it
    /// again so hand-assembled graphs fail at compile time rather than
    /// at submission.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.stages.is_empty() {
            return Err(PipelineError::EmptyPipeline(self.name.clone()));
        }

        let mut seen = HashSet::new();
        for stage in &self.stages {
            if !seen.insert(stage.display_name.as_str()) {
                return Err(PipelineError::DuplicateStage(stage.display_name.clone()));
            }
        }

        for &(earlier, later) in &self.edges {
            let out_of_bounds = earlier.max(later);
            if out_of_bounds >= self.stages.len() {
                return Err(PipelineError::UnknownStage(format!("#{out_of_bounds}")));
            }
        }

        self.check_acyclic()
    }

    fn check_acyclic(&self) -> Result<(), PipelineError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Visit {
            Unvisited,
            Visiting,
            Visited,
        }

        let mut adjacency = vec![Vec::new(); self.stages.len()];
        for &(earlier, later) in &self.edges {
            adjacency[earlier].push(later);
        }

        fn dfs(
            node: usize,
            adjacency: &[Vec<usize>],
            state: &mut [Visit],
            stages: &[Stage],
        ) -> Result<(), PipelineError> {
            state[node] = Visit::Visiting;
            for &next in &adjacency[node] {
                match state[next] {
                    Visit::Visiting => {
                        return Err(PipelineError::CycleDetected(
                            stages[next].display_name.clone(),
                        ));
                    }
                    Visit::Unvisited => dfs(next, adjacency, state, stages)?,
                    Visit::Visited => {}
                }
            }
            state[node] = Visit::Visited;
            Ok(())
        }

        let mut state = vec![Visit::Unvisited; self.stages.len()];
        for start in 0..self.stages.len() {
            if state[start] == Visit::Unvisited {
                dfs(start, &adjacency, &mut state, &self.stages)?;
            }
        }
        Ok(())
    }
}

/// Explicit mutable builder for [`PipelineGraph`] values.
///
/// Stages are registered with [`add_stage`](Self::add_stage); sequencing
/// is declared with [`after`](Self::after) on the returned handles.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    name: String,
    stages: Vec<Stage>,
    edges: Vec<(usize, usize)>,
}

impl GraphBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Register a stage, returning a handle for edge declarations.
    pub fn add_stage(&mut self, stage: Stage) -> StageRef {
        self.stages.push(stage);
        StageRef(self.stages.len() - 1)
    }

    /// Declare that `later` must not start until `earlier` has completed.
    pub fn after(&mut self, later: StageRef, earlier: StageRef) -> &mut Self {
        self.edges.push((earlier.0, later.0));
        self
    }

    /// Validate and freeze the graph.
    pub fn build(self) -> Result<PipelineGraph, PipelineError> {
        let graph = PipelineGraph {
            name: self.name,
            stages: self.stages,
            edges: self.edges,
        };
        graph.validate()?;
        Ok(graph)
    }
}
