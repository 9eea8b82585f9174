// src/engine/step.rs

//! Result type for a single coordinator step.

use crate::dag::TaskId;

/// What changed after the core processed one completion.
///
/// Tests use this to step an execution by hand and assert on the effects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreStep {
    /// Tasks whose last dependency just succeeded; they are now Running and
    /// must be launched by the caller.
    pub newly_launched: Vec<TaskId>,
    /// The task that failed in this step, if any.
    pub newly_failed: Option<TaskId>,
    /// Whether no task is running any more.
    pub run_finished: bool,
}
