// src/dag/task.rs

//! Builder-time task descriptors.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::anyhow;

use crate::dag::task_id::{TaskId, TaskIdSet};

/// Result of a single task body.
pub type TaskResult = anyhow::Result<()>;

/// Future returned by a task body.
pub type TaskFuture = Pin<Box<dyn Future<Output = TaskResult> + Send + 'static>>;

/// A unit of fallible work.
///
/// Each call produces a fresh future, so one compiled flow can be run any
/// number of times.
pub type TaskFn = Arc<dyn Fn() -> TaskFuture + Send + Sync + 'static>;

/// A named task plus the ids of the tasks it depends on.
///
/// ```ignore
/// let mut graph = Graph::new("teardown");
/// let dns = graph.add(Task::new("dns", || async { Ok(()) }))?;
/// graph.add(Task::blocking("network", || Ok(())).after(&dns))?;
/// ```
#[derive(Clone)]
pub struct Task {
    pub(crate) name: String,
    pub(crate) func: TaskFn,
    pub(crate) dependencies: TaskIdSet,
}

impl Task {
    /// Task whose body is an async function.
    pub fn new<F, Fut>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TaskResult> + Send + 'static,
    {
        Self::from_fn(name, Arc::new(move || Box::pin(func()) as TaskFuture))
    }

    /// Task whose body is a plain synchronous operation.
    ///
    /// The body runs on the blocking thread pool so it may do blocking IO
    /// without stalling other tasks.
    pub fn blocking<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn() -> TaskResult + Send + Sync + 'static,
    {
        let func = Arc::new(func);
        Self::new(name, move || {
            let func = Arc::clone(&func);
            async move {
                tokio::task::spawn_blocking(move || func())
                    .await
                    .map_err(|e| anyhow!("blocking task did not complete: {e}"))?
            }
        })
    }

    /// Task built from an already type-erased [`TaskFn`].
    pub fn from_fn(name: impl Into<String>, func: TaskFn) -> Self {
        Self {
            name: name.into(),
            func,
            dependencies: TaskIdSet::new(),
        }
    }

    /// Declare a dependency on a previously added task.
    pub fn after(mut self, dependency: impl Into<TaskId>) -> Self {
        self.dependencies.insert(dependency);
        self
    }

    /// Declare dependencies on several previously added tasks.
    pub fn after_all<I, T>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TaskId>,
    {
        self.dependencies.extend(dependencies);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dependencies(&self) -> &TaskIdSet {
        &self.dependencies
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}
