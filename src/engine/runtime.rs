// src/engine/runtime.rs

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::{Semaphore, mpsc};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::dag::{Flow, TaskFn, TaskId};
use crate::errors::FlowError;

use super::core::ExecutionCore;
use super::{Completion, Concurrency, RunOptions};

/// One run of a [`Flow`].
///
/// This is the async shell around [`ExecutionCore`]: it spawns one Tokio task
/// per runnable node, waits on the completion channel, forwards each
/// completion to the core and reports progress. The core is only ever touched
/// from the `run` future itself.
pub struct Execution<'a> {
    core: ExecutionCore<'a>,
    options: RunOptions,
    completion_tx: mpsc::Sender<Completion>,
    completion_rx: mpsc::Receiver<Completion>,
    permits: Option<Arc<Semaphore>>,
}

impl fmt::Debug for Execution<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Execution")
            .field("core", &self.core)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<'a> Execution<'a> {
    pub fn new(flow: &'a Flow, options: RunOptions) -> Self {
        // Every task sends exactly one completion, so this never fills up.
        let (completion_tx, completion_rx) = mpsc::channel(flow.len().max(1));

        let permits = match options.concurrency {
            Concurrency::Unbounded => None,
            Concurrency::Bounded(n) => Some(Arc::new(Semaphore::new(n.get()))),
        };

        Self {
            core: ExecutionCore::new(flow),
            options,
            completion_tx,
            completion_rx,
            permits,
        }
    }

    /// Drive the flow until no task is running.
    pub async fn run(self) -> Result<(), FlowError> {
        let flow = self.core.flow();
        let span = match &self.options.span {
            Some(parent) => info_span!(parent: parent, "flow", name = %flow.name()),
            None => info_span!("flow", name = %flow.name()),
        };

        self.run_inner().instrument(span).await
    }

    async fn run_inner(mut self) -> Result<(), FlowError> {
        info!(
            tasks = self.core.flow().len(),
            concurrency = %self.options.concurrency,
            "flow started"
        );

        self.report_progress();

        let roots = self.core.start();
        let mut finished = self.core.is_finished();
        self.launch(roots);
        self.report_progress();

        while !finished {
            let Some(completion) = self.completion_rx.recv().await else {
                // Unreachable while we hold a sender; bail out rather than spin.
                warn!("completion channel closed while tasks were running");
                break;
            };

            debug!(task = %completion.task, ok = completion.result.is_ok(), "task completed");

            let step = self.core.complete(completion.task, completion.result);
            if let Some(failed) = &step.newly_failed {
                debug!(task = %failed, "failure recorded");
            }
            finished = step.run_finished;

            self.launch(step.newly_launched);
            self.report_progress();
        }

        let stats = self.core.stats();
        if stats.pending.is_empty() {
            info!(%stats, "flow finished");
        } else {
            warn!(%stats, starved = %stats.pending, "flow finished with tasks that never ran");
        }

        self.core.into_outcome()
    }

    fn report_progress(&self) {
        let stats = self.core.stats();
        debug!(progress = stats.progress_percent(), %stats, "progress");

        if let Some(progress) = &self.options.progress {
            progress(stats.clone());
        }
    }

    fn launch(&self, ids: Vec<TaskId>) {
        let flow = self.core.flow();
        for id in ids {
            match flow.node(&id) {
                Some(node) => self.spawn_task(id, &node.func),
                None => warn!(task = %id, "scheduled task missing from flow; not launching"),
            }
        }
    }

    fn spawn_task(&self, id: TaskId, func: &TaskFn) {
        let func = Arc::clone(func);
        let tx = self.completion_tx.clone();
        let permits = self.permits.clone();
        let span = info_span!("task", task = %id);

        tokio::spawn(
            async move {
                // Held until the body returns.
                let _permit = match permits {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };

                debug!("task body started");

                // Call inside the inner task: a panic while building the
                // future surfaces at the join point too.
                let body = async move { func().await }.in_current_span();
                let result = match tokio::spawn(body).await {
                    Ok(result) => result,
                    Err(err) if err.is_panic() => Err(anyhow!(
                        "task panicked: {}",
                        panic_message(err.into_panic())
                    )),
                    Err(err) => Err(anyhow!("task was cancelled: {err}")),
                };

                if tx.send(Completion { task: id, result }).await.is_err() {
                    debug!("coordinator gone; dropping completion");
                }
            }
            .instrument(span),
        );
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
