// src/engine/stats.rs

//! Point-in-time view of a flow run.

use std::fmt;

use tracing::warn;

use crate::dag::{TaskId, TaskIdSet};

/// Which tasks of a run are in which state.
///
/// `all` is always the disjoint union of the four state sets. Only the
/// execution coordinator mutates a live `Stats`; observers receive clones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub all: TaskIdSet,
    pub succeeded: TaskIdSet,
    pub failed: TaskIdSet,
    pub running: TaskIdSet,
    pub pending: TaskIdSet,
}

impl Stats {
    /// Every task pending, nothing started.
    pub fn initial(all: TaskIdSet) -> Self {
        Self {
            pending: all.clone(),
            all,
            ..Self::default()
        }
    }

    /// Percentage of tasks that succeeded, rounded down.
    ///
    /// An empty flow is complete by definition and reports 100.
    pub fn progress_percent(&self) -> u8 {
        if self.all.is_empty() {
            return 100;
        }
        (100 * self.succeeded.len() / self.all.len()) as u8
    }

    /// Whether every task succeeded.
    pub fn is_complete(&self) -> bool {
        self.succeeded.len() == self.all.len()
    }

    /// Check the partition invariant: the four state sets are pairwise
    /// disjoint and together make up `all`.
    pub fn is_consistent(&self) -> bool {
        let parts = [&self.succeeded, &self.failed, &self.running, &self.pending];

        for (i, a) in parts.iter().enumerate() {
            for b in &parts[i + 1..] {
                if !a.is_disjoint(b) {
                    return false;
                }
            }
        }

        let mut union = TaskIdSet::new();
        for part in parts {
            union.union(part);
        }
        union == self.all
    }

    /// Pending -> Running.
    pub(crate) fn start(&mut self, id: &TaskId) -> bool {
        Self::transition(id, &mut self.pending, &mut self.running)
    }

    /// Running -> Succeeded.
    pub(crate) fn succeed(&mut self, id: &TaskId) -> bool {
        Self::transition(id, &mut self.running, &mut self.succeeded)
    }

    /// Running -> Failed.
    pub(crate) fn fail(&mut self, id: &TaskId) -> bool {
        Self::transition(id, &mut self.running, &mut self.failed)
    }

    fn transition(id: &TaskId, from: &mut TaskIdSet, to: &mut TaskIdSet) -> bool {
        if !from.remove(id) {
            warn!(task = %id, "illegal task state transition; ignoring");
            return false;
        }
        to.insert(id.clone());
        true
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}% ({}/{} succeeded, {} failed, {} running, {} pending)",
            self.progress_percent(),
            self.succeeded.len(),
            self.all.len(),
            self.failed.len(),
            self.running.len(),
            self.pending.len()
        )
    }
}
