// src/config/model.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::Concurrency;

/// Flow file exactly as read from TOML, before validation.
///
/// ```toml
/// [flow]
/// name = "provision-cluster"
/// concurrency = 4
///
/// [task.network]
/// cmd = "./steps/network.sh"
///
/// [task.certificates]
/// cmd = "./steps/certs.sh"
/// after = ["network"]
/// ```
///
/// All sections are optional and have reasonable defaults, but validation
/// requires at least one task.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub flow: FlowSection,

    /// All tasks from `[task.<name>]`, keyed by task name.
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
}

/// A validated flow file.
///
/// Only obtainable through `TryFrom<RawConfigFile>`, so holding one means the
/// dependency graph is known to be acyclic and complete.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub flow: FlowSection,
    pub task: BTreeMap<String, TaskConfig>,
    order: Vec<String>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        flow: FlowSection,
        task: BTreeMap<String, TaskConfig>,
        order: Vec<String>,
    ) -> Self {
        Self { flow, task, order }
    }

    /// Task names in an order where every task comes after its dependencies.
    pub fn order(&self) -> &[String] {
        &self.order
    }
}

/// `[flow]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowSection {
    /// Name used in logs and in the error report of a failed run.
    #[serde(default = "default_flow_name")]
    pub name: String,

    /// Maximum number of task commands running at once; unbounded if absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,
}

fn default_flow_name() -> String {
    "flow".to_string()
}

impl Default for FlowSection {
    fn default() -> Self {
        Self {
            name: default_flow_name(),
            concurrency: None,
        }
    }
}

impl FlowSection {
    /// Concurrency policy; `None` and invalid values (rejected by validation)
    /// map to unbounded.
    pub fn concurrency(&self) -> Concurrency {
        self.concurrency
            .and_then(Concurrency::bounded)
            .unwrap_or_default()
    }
}

/// `[task.<name>]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Shell command to execute.
    pub cmd: String,

    /// Tasks that must succeed before this one starts.
    #[serde(default)]
    pub after: Vec<String>,

    /// Free-form description shown in dry-run output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
