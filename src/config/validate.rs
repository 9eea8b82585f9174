// src/config/validate.rs

use std::collections::BTreeMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{ConfigFile, FlowSection, RawConfigFile, TaskConfig};
use crate::errors::{ReconflowError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = ReconflowError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        check_flow_section(&raw.flow)?;
        let order = dependency_order(&raw.task)?;
        Ok(ConfigFile::new_unchecked(raw.flow, raw.task, order))
    }
}

fn config_error(msg: impl Into<String>) -> ReconflowError {
    ReconflowError::ConfigError(msg.into())
}

fn check_flow_section(flow: &FlowSection) -> Result<()> {
    if flow.name.trim().is_empty() {
        return Err(config_error("[flow].name must not be empty"));
    }
    if flow.concurrency == Some(0) {
        return Err(config_error("[flow].concurrency must be >= 1 (got 0)"));
    }
    Ok(())
}

/// Check every `[task.<name>]` entry and return the task names ordered so
/// that each comes after everything in its `after` list.
fn dependency_order(tasks: &BTreeMap<String, TaskConfig>) -> Result<Vec<String>> {
    if tasks.is_empty() {
        return Err(config_error(
            "flow file declares no tasks; add at least one [task.<name>] section",
        ));
    }

    // Edge direction: dependency -> dependent.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::with_capacity(tasks.len(), 0);
    for name in tasks.keys() {
        graph.add_node(name.as_str());
    }

    for (name, task) in tasks {
        if task.cmd.trim().is_empty() {
            return Err(config_error(format!("task '{name}' has an empty `cmd`")));
        }

        for dep in &task.after {
            if dep == name {
                return Err(config_error(format!(
                    "task '{name}' cannot depend on itself in `after`"
                )));
            }
            if !tasks.contains_key(dep) {
                return Err(config_error(format!(
                    "task '{name}' has unknown dependency '{dep}' in `after`"
                )));
            }
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
    }

    toposort(&graph, None)
        .map(|order| order.into_iter().map(str::to_owned).collect())
        .map_err(|cycle| {
            ReconflowError::DagCycle(format!(
                "cycle detected in task DAG involving task '{}'",
                cycle.node_id()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(entries: &[(&str, &str, &[&str])]) -> RawConfigFile {
        let mut raw = RawConfigFile::default();
        for (name, cmd, after) in entries {
            raw.task.insert(
                name.to_string(),
                TaskConfig {
                    cmd: cmd.to_string(),
                    after: after.iter().map(|s| s.to_string()).collect(),
                    description: None,
                },
            );
        }
        raw
    }

    fn config_error_message(raw: RawConfigFile) -> String {
        match ConfigFile::try_from(raw) {
            Err(ReconflowError::ConfigError(msg)) => msg,
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn order_puts_dependencies_first() {
        let cfg = ConfigFile::try_from(raw(&[
            ("a", "echo a", &["c"]),
            ("b", "echo b", &["a"]),
            ("c", "echo c", &[]),
        ]))
        .unwrap();

        assert_eq!(cfg.order(), &["c", "a", "b"]);
    }

    #[test]
    fn empty_command_is_rejected() {
        let msg = config_error_message(raw(&[("a", "  ", &[])]));
        assert!(msg.contains("empty `cmd`"), "{msg}");
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let mut cfg = raw(&[("a", "echo a", &[])]);
        cfg.flow.concurrency = Some(0);
        assert!(config_error_message(cfg).contains("concurrency"));
    }

    #[test]
    fn blank_flow_name_is_rejected() {
        let mut cfg = raw(&[("a", "echo a", &[])]);
        cfg.flow.name = " ".to_string();
        assert!(config_error_message(cfg).contains("[flow].name"));
    }

    #[test]
    fn self_dependency_is_rejected() {
        let msg = config_error_message(raw(&[("a", "echo a", &["a"])]));
        assert!(msg.contains("itself"), "{msg}");
    }

    #[test]
    fn three_task_cycle_is_rejected() {
        let result = ConfigFile::try_from(raw(&[
            ("a", "echo a", &["c"]),
            ("b", "echo b", &["a"]),
            ("c", "echo c", &["b"]),
        ]));
        assert!(matches!(result, Err(ReconflowError::DagCycle(_))));
    }
}
