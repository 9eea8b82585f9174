// src/dag/mod.rs

//! Task graph construction.
//!
//! - [`task_id`] holds task identifiers and id sets.
//! - [`task`] defines the builder-time [`Task`] descriptor.
//! - [`graph`] accumulates tasks and compiles them.
//! - [`flow`] is the compiled, immutable form handed to the engine.

pub mod flow;
pub mod graph;
pub mod task;
pub mod task_id;

pub use flow::{Flow, Node};
pub use graph::Graph;
pub use task::{Task, TaskFn, TaskFuture, TaskResult};
pub use task_id::{TaskId, TaskIdSet};
