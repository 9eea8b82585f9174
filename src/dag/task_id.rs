// src/dag/task_id.rs

//! Task identifiers and sets of them.

use std::collections::BTreeSet;
use std::collections::btree_set;
use std::fmt;

/// Identifier of a task within one graph.
///
/// Derived from the task's declared name. Uniqueness is only enforced by the
/// [`Graph`](crate::dag::Graph) the task is added to.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TaskId({})", self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&String> for TaskId {
    fn from(s: &String) -> Self {
        Self(s.clone())
    }
}

impl From<&TaskId> for TaskId {
    fn from(id: &TaskId) -> Self {
        id.clone()
    }
}

/// A set of [`TaskId`]s.
///
/// Membership is what matters; the ordered backing store only keeps logs and
/// `Debug` output stable between runs. `Clone` is a deep copy.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TaskIdSet {
    ids: BTreeSet<TaskId>,
}

impl TaskIdSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an id. Returns `false` if it was already present.
    pub fn insert(&mut self, id: impl Into<TaskId>) -> bool {
        self.ids.insert(id.into())
    }

    /// Add every member of `other` to this set.
    pub fn union(&mut self, other: &TaskIdSet) {
        self.ids.extend(other.ids.iter().cloned());
    }

    /// Remove an id. Returns `false` if it was not present.
    pub fn remove(&mut self, id: &TaskId) -> bool {
        self.ids.remove(id)
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, TaskId> {
        self.ids.iter()
    }

    /// Whether the two sets share no member.
    pub fn is_disjoint(&self, other: &TaskIdSet) -> bool {
        self.ids.is_disjoint(&other.ids)
    }
}

impl fmt::Debug for TaskIdSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.ids.iter().map(TaskId::as_str)).finish()
    }
}

impl fmt::Display for TaskIdSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.ids.iter().map(TaskId::as_str).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

impl<T: Into<TaskId>> FromIterator<T> for TaskIdSet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<T: Into<TaskId>> Extend<T> for TaskIdSet {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.ids.extend(iter.into_iter().map(Into::into));
    }
}

impl IntoIterator for TaskIdSet {
    type Item = TaskId;
    type IntoIter = btree_set::IntoIter<TaskId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.into_iter()
    }
}

impl<'a> IntoIterator for &'a TaskIdSet {
    type Item = &'a TaskId;
    type IntoIter = btree_set::Iter<'a, TaskId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}
