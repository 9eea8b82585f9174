// src/engine/core.rs

//! Pure execution state machine.
//!
//! [`ExecutionCore`] owns all bookkeeping of one flow run (stats, trigger
//! counts, collected failures) and turns completion events into "launch
//! these tasks next" decisions. It performs no IO and knows nothing about
//! Tokio, so it can be stepped by hand in tests.
//!
//! The async shell in [`runtime`](crate::engine::runtime) feeds it
//! completions from the task channel and spawns what it asks for.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::dag::{Flow, TaskId, TaskResult};
use crate::engine::stats::Stats;
use crate::engine::step::CoreStep;
use crate::errors::{FlowError, TaskError};

/// Bookkeeping for a single run of a [`Flow`].
#[derive(Debug)]
pub struct ExecutionCore<'a> {
    flow: &'a Flow,
    stats: Stats,
    /// Dependency successes received so far, per downstream task.
    triggers: HashMap<TaskId, usize>,
    errors: Vec<TaskError>,
}

impl<'a> ExecutionCore<'a> {
    pub fn new(flow: &'a Flow) -> Self {
        Self {
            flow,
            stats: Stats::initial(flow.task_ids()),
            triggers: HashMap::new(),
            errors: Vec::new(),
        }
    }

    pub fn flow(&self) -> &'a Flow {
        self.flow
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// No task is running, so no further completion can arrive.
    pub fn is_finished(&self) -> bool {
        self.stats.running.is_empty()
    }

    /// Mark every root Running and return them for launching.
    pub fn start(&mut self) -> Vec<TaskId> {
        let roots: Vec<TaskId> = self.flow.roots().iter().cloned().collect();

        for id in &roots {
            self.stats.start(id);
            info!(task = %id, "launching root task");
        }

        roots
    }

    /// Record the outcome of a running task.
    ///
    /// - On success, every target gets one trigger; a target whose trigger
    ///   count reaches its `required` count becomes Running and is returned.
    /// - On failure, the error is kept for the final report and no target is
    ///   triggered, so everything downstream stays Pending.
    ///
    /// A completion for a task that is not Running is ignored, so each
    /// dependency success is counted at most once.
    pub fn complete(&mut self, id: TaskId, result: TaskResult) -> CoreStep {
        if !self.stats.running.contains(&id) {
            warn!(task = %id, "completion for task that is not running; ignoring");
            return CoreStep {
                run_finished: self.is_finished(),
                ..CoreStep::default()
            };
        }

        let mut step = CoreStep::default();

        match result {
            Ok(()) => {
                self.stats.succeed(&id);
                debug!(task = %id, "task succeeded");
                step.newly_launched = self.trigger_targets(&id);
            }
            Err(err) => {
                self.stats.fail(&id);
                warn!(
                    task = %id,
                    error = %format!("{err:#}"),
                    "task failed; dependents will not run"
                );
                self.errors.push(TaskError::new(id.clone(), err));
                step.newly_failed = Some(id);
            }
        }

        step.run_finished = self.is_finished();
        step
    }

    fn trigger_targets(&mut self, id: &TaskId) -> Vec<TaskId> {
        let flow = self.flow;
        let Some(node) = flow.node(id) else {
            warn!(task = %id, "completed task missing from flow");
            return Vec::new();
        };

        let mut ready = Vec::new();

        for target in node.targets() {
            let Some(target_node) = flow.node(target) else {
                warn!(task = %id, target = %target, "target missing from flow");
                continue;
            };

            let count = self.triggers.entry(target.clone()).or_insert(0);
            *count += 1;

            debug!(
                task = %target,
                triggered = *count,
                required = target_node.required(),
                "dependency satisfied"
            );

            if *count == target_node.required() && self.stats.start(target) {
                info!(task = %target, "all dependencies succeeded; launching task");
                ready.push(target.clone());
            }
        }

        ready
    }

    /// Final result of the run.
    ///
    /// Tasks still Pending at this point were starved by an upstream failure;
    /// they are reported through the stats only, never as errors.
    pub fn into_outcome(self) -> Result<(), FlowError> {
        if self.errors.is_empty() {
            return Ok(());
        }
        Err(FlowError::new(self.flow.name(), self.errors, self.stats))
    }
}
