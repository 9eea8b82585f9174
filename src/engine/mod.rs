// src/engine/mod.rs

//! Flow execution engine.
//!
//! A run has exactly one coordinator. Task bodies execute concurrently in
//! their own Tokio tasks and report back only through a completion channel;
//! the coordinator alone touches the run's bookkeeping.
//!
//! The pure state machine lives in [`core`]; the async shell that spawns
//! task bodies and reports progress is implemented in [`runtime`].

use std::fmt;
use std::sync::Arc;

use crate::dag::{TaskId, TaskResult};

/// Callback receiving a snapshot after every launch and completion event.
pub type ProgressFn = Arc<dyn Fn(Stats) + Send + Sync + 'static>;

/// Message sent by a finished task body to the coordinator.
#[derive(Debug)]
pub struct Completion {
    pub task: TaskId,
    pub result: TaskResult,
}

/// Options for a single [`Flow::run`](crate::dag::Flow::run).
#[derive(Clone, Default)]
pub struct RunOptions {
    /// Parent span for everything the run logs. Defaults to the current span.
    pub span: Option<tracing::Span>,
    /// Observer for progress snapshots.
    pub progress: Option<ProgressFn>,
    pub concurrency: Concurrency,
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_progress<F>(mut self, progress: F) -> Self
    where
        F: Fn(Stats) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(progress));
        self
    }

    pub fn with_concurrency(mut self, concurrency: Concurrency) -> Self {
        self.concurrency = concurrency;
        self
    }
}

impl fmt::Debug for RunOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunOptions")
            .field("span", &self.span)
            .field("progress", &self.progress.is_some())
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

pub mod core;
pub mod runtime;
pub mod stats;
pub mod step;

pub use self::core::ExecutionCore;
pub use crate::types::Concurrency;
pub use runtime::Execution;
pub use stats::Stats;
pub use step::CoreStep;
