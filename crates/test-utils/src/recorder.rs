use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use reconflow::{Stats, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Started,
    Finished,
}

#[derive(Default)]
struct Inner {
    /// Task names in the order their bodies finished.
    log: Mutex<Vec<String>>,
    /// Start and finish of every body, interleaved as they happened.
    events: Mutex<Vec<(Event, String)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// Produces tasks that append their name to a shared, ordered log.
///
/// A name is appended to [`Recorder::log`] when the body *finishes*, so
/// "x appears before y" means x returned before y returned. Starts are kept
/// separately in the event timeline, see [`Recorder::started`].
#[derive(Clone, Default)]
pub struct Recorder {
    inner: Arc<Inner>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Task that succeeds immediately.
    pub fn task(&self, name: &str) -> Task {
        self.build(name, Duration::ZERO, None)
    }

    /// Task that sleeps for `delay` before succeeding.
    pub fn slow_task(&self, name: &str, delay: Duration) -> Task {
        self.build(name, delay, None)
    }

    /// Task that fails with `message`.
    pub fn failing(&self, name: &str, message: &str) -> Task {
        self.build(name, Duration::ZERO, Some(message.to_string()))
    }

    fn build(&self, name: &str, delay: Duration, failure: Option<String>) -> Task {
        let inner = Arc::clone(&self.inner);
        let label = name.to_string();

        Task::new(name, move || {
            let inner = Arc::clone(&inner);
            let label = label.clone();
            let failure = failure.clone();
            async move {
                inner.record(Event::Started, &label);
                let now = inner.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                inner.max_in_flight.fetch_max(now, Ordering::SeqCst);

                if delay.is_zero() {
                    tokio::task::yield_now().await;
                } else {
                    tokio::time::sleep(delay).await;
                }

                inner.in_flight.fetch_sub(1, Ordering::SeqCst);
                inner.record(Event::Finished, &label);
                inner.log.lock().unwrap().push(label);

                match failure {
                    Some(message) => Err(anyhow!(message)),
                    None => Ok(()),
                }
            }
        })
    }

    /// Snapshot of the completion log.
    pub fn log(&self) -> Vec<String> {
        self.inner.log.lock().unwrap().clone()
    }

    /// Whether a task with this name ran at all.
    pub fn ran(&self, name: &str) -> bool {
        self.log().iter().any(|n| n == name)
    }

    /// Index in the event timeline where `name`'s body started.
    pub fn started(&self, name: &str) -> Option<usize> {
        self.inner.index_of(Event::Started, name)
    }

    /// Index in the event timeline where `name`'s body finished.
    pub fn finished(&self, name: &str) -> Option<usize> {
        self.inner.index_of(Event::Finished, name)
    }

    /// Highest number of bodies that were executing at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.inner.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Inner {
    fn record(&self, event: Event, name: &str) {
        self.events.lock().unwrap().push((event, name.to_string()));
    }

    fn index_of(&self, event: Event, name: &str) -> Option<usize> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .position(|(e, n)| *e == event && n == name)
    }
}

/// Collects every progress snapshot a run delivers.
#[derive(Clone, Default)]
pub struct SnapshotLog {
    snapshots: Arc<Mutex<Vec<Stats>>>,
}

impl SnapshotLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Progress callback to pass to `RunOptions::with_progress`.
    pub fn callback(&self) -> impl Fn(Stats) + Send + Sync + 'static {
        let snapshots = Arc::clone(&self.snapshots);
        move |stats| snapshots.lock().unwrap().push(stats)
    }

    pub fn snapshots(&self) -> Vec<Stats> {
        self.snapshots.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Stats> {
        self.snapshots.lock().unwrap().last().cloned()
    }
}
