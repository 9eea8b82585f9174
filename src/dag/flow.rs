// src/dag/flow.rs

use std::collections::HashMap;
use std::fmt;

use crate::dag::task::TaskFn;
use crate::dag::task_id::{TaskId, TaskIdSet};
use crate::engine::{Execution, RunOptions};
use crate::errors::FlowError;

/// A compiled task.
#[derive(Clone)]
pub struct Node {
    /// Tasks that list this node as a dependency.
    pub(crate) targets: TaskIdSet,
    /// Number of distinct dependencies that must succeed before this node runs.
    pub(crate) required: usize,
    pub(crate) func: TaskFn,
}

impl Node {
    pub fn targets(&self) -> &TaskIdSet {
        &self.targets
    }

    pub fn required(&self) -> usize {
        self.required
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("targets", &self.targets)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

/// An immutable, validated DAG of tasks, ready to run.
///
/// Produced by [`Graph::compile`](crate::dag::Graph::compile). Running a flow
/// never mutates it, so the same flow can be run repeatedly.
#[derive(Clone)]
pub struct Flow {
    name: String,
    nodes: HashMap<TaskId, Node>,
    roots: TaskIdSet,
}

impl Flow {
    pub(crate) fn new(name: String, nodes: HashMap<TaskId, Node>, roots: TaskIdSet) -> Self {
        Self { name, nodes, roots }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Tasks without dependencies.
    pub fn roots(&self) -> &TaskIdSet {
        &self.roots
    }

    pub fn node(&self, id: &TaskId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn task_ids(&self) -> TaskIdSet {
        self.nodes.keys().collect()
    }

    /// Run every task, respecting dependency order, until no work is left.
    ///
    /// Returns `Ok(())` only if every task ran and succeeded.
    pub async fn run(&self, options: RunOptions) -> Result<(), FlowError> {
        Execution::new(self, options).run().await
    }
}

impl fmt::Debug for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flow")
            .field("name", &self.name)
            .field("nodes", &self.nodes)
            .field("roots", &self.roots)
            .finish()
    }
}
