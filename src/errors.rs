// src/errors.rs

//! Crate-wide error types.
//!
//! - [`GraphError`]: misuse of the graph builder, reported by `Graph::add` and
//!   `Graph::compile`.
//! - [`TaskError`] / [`FlowError`]: failures of task bodies during a run,
//!   aggregated per flow.
//! - [`ReconflowError`]: application-level error used by config loading and
//!   the CLI.

use std::fmt;

use thiserror::Error;

use crate::dag::TaskId;
use crate::engine::Stats;

/// Errors raised while building or compiling a graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GraphError {
    #[error("task name must not be empty")]
    EmptyName,

    #[error("duplicate task '{0}'")]
    DuplicateTask(TaskId),

    #[error("task '{task}' depends on unknown task '{dependency}'")]
    UnknownDependency { task: TaskId, dependency: TaskId },

    #[error("task '{0}' cannot depend on itself")]
    SelfDependency(TaskId),

    #[error("cycle detected in graph '{graph}' involving task '{task}'")]
    CycleDetected { graph: String, task: TaskId },
}

/// A single task failure, tagged with the id of the task that produced it.
#[derive(Error, Debug)]
#[error("task '{id}' failed: {source:#}")]
pub struct TaskError {
    pub id: TaskId,
    #[source]
    pub source: anyhow::Error,
}

impl TaskError {
    pub fn new(id: TaskId, source: anyhow::Error) -> Self {
        Self { id, source }
    }
}

/// Every task failure of one flow run.
///
/// Failures are collected, not short-circuited: independent branches keep
/// running after a sibling fails. Tasks downstream of a failure never run and
/// show up only in [`FlowError::starved`].
#[derive(Debug)]
pub struct FlowError {
    flow: String,
    errors: Vec<TaskError>,
    stats: Stats,
}

impl FlowError {
    pub(crate) fn new(flow: impl Into<String>, errors: Vec<TaskError>, stats: Stats) -> Self {
        Self {
            flow: flow.into(),
            errors,
            stats,
        }
    }

    /// Name of the flow that failed.
    pub fn flow(&self) -> &str {
        &self.flow
    }

    /// Per-task failures, in the order the coordinator observed them.
    pub fn errors(&self) -> &[TaskError] {
        &self.errors
    }

    /// The underlying error of every failed task.
    pub fn causes(&self) -> Vec<&anyhow::Error> {
        self.errors.iter().map(|e| &e.source).collect()
    }

    /// Final state of the run.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Tasks that never ran because a dependency did not succeed.
    pub fn starved(&self) -> &crate::dag::TaskIdSet {
        &self.stats.pending
    }
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "flow '{}' failed: {} task(s) failed",
            self.flow,
            self.errors.len()
        )?;
        for err in &self.errors {
            write!(f, "; {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FlowError {}

/// Find a [`FlowError`] anywhere in an error chain.
fn find_flow_error(err: &anyhow::Error) -> Option<&FlowError> {
    err.chain().find_map(|e| e.downcast_ref::<FlowError>())
}

/// Per-task failures carried by `err`, if it is (or wraps) a [`FlowError`].
pub fn task_errors(err: &anyhow::Error) -> &[TaskError] {
    find_flow_error(err).map(FlowError::errors).unwrap_or(&[])
}

/// Underlying causes carried by `err`, if it is (or wraps) a [`FlowError`].
pub fn causes(err: &anyhow::Error) -> Vec<&anyhow::Error> {
    find_flow_error(err)
        .map(FlowError::causes)
        .unwrap_or_default()
}

/// Application-level errors (config loading, CLI).
#[derive(Error, Debug)]
pub enum ReconflowError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Cycle detected in DAG: {0}")]
    DagCycle(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ReconflowError>;
