// src/config/mod.rs

//! Flow files: TOML-declared graphs of shell commands.
//!
//! - [`model`] defines the TOML-backed data model.
//! - [`loader`] reads a flow file from disk.
//! - [`validate`] checks dependencies and acyclicity and computes the order
//!   in which tasks can be added to a [`Graph`].

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, parse_raw};
pub use model::{ConfigFile, FlowSection, RawConfigFile, TaskConfig};

use tracing::debug;

use crate::dag::{Graph, Task};
use crate::errors::Result;
use crate::exec::shell_task;

/// Build a [`Graph`] with one shell-command task per `[task.<name>]`.
pub fn build_graph(cfg: &ConfigFile) -> Result<Graph> {
    let mut graph = Graph::new(cfg.flow.name.clone());

    for name in cfg.order() {
        let Some(tc) = cfg.task.get(name) else {
            continue;
        };

        let task = Task::from_fn(name.clone(), shell_task(name, &tc.cmd)).after_all(&tc.after);
        let id = graph.add(task)?;
        debug!(task = %id, cmd = %tc.cmd, "added shell task");
    }

    Ok(graph)
}
