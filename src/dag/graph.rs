// src/dag/graph.rs

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::debug;

use crate::dag::flow::{Flow, Node};
use crate::dag::task::Task;
use crate::dag::task_id::{TaskId, TaskIdSet};
use crate::errors::GraphError;

/// Accumulates named tasks and their dependency edges.
///
/// A dependency can only name a task that was added earlier, so declarations
/// arrive in a valid topological order. [`Graph::compile`] still checks for
/// cycles explicitly before producing a [`Flow`].
#[derive(Debug, Clone)]
pub struct Graph {
    name: String,
    tasks: Vec<Task>,
    index: HashMap<TaskId, usize>,
}

impl Graph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.index.contains_key(id)
    }

    /// Register a task and return the id later tasks use to depend on it.
    pub fn add(&mut self, task: Task) -> Result<TaskId, GraphError> {
        if task.name.is_empty() {
            return Err(GraphError::EmptyName);
        }

        let id = TaskId::new(task.name.clone());
        if self.index.contains_key(&id) {
            return Err(GraphError::DuplicateTask(id));
        }

        for dep in task.dependencies.iter() {
            if *dep == id {
                return Err(GraphError::SelfDependency(id));
            }
            if !self.index.contains_key(dep) {
                return Err(GraphError::UnknownDependency {
                    task: id,
                    dependency: dep.clone(),
                });
            }
        }

        debug!(
            graph = %self.name,
            task = %id,
            deps = %task.dependencies,
            "task added"
        );

        self.index.insert(id.clone(), self.tasks.len());
        self.tasks.push(task);
        Ok(id)
    }

    /// Validate the graph and turn it into an executable [`Flow`].
    pub fn compile(self) -> Result<Flow, GraphError> {
        self.ensure_acyclic()?;

        let mut nodes: HashMap<TaskId, Node> = HashMap::with_capacity(self.tasks.len());
        let mut roots = TaskIdSet::new();

        // First pass: one node per task, `required` = number of distinct deps.
        for task in &self.tasks {
            let id = TaskId::new(task.name.clone());
            let required = task.dependencies.len();
            if required == 0 {
                roots.insert(id.clone());
            }
            nodes.insert(
                id,
                Node {
                    targets: TaskIdSet::new(),
                    required,
                    func: task.func.clone(),
                },
            );
        }

        // Second pass: each edge "task depends on dep" makes task a target of dep.
        for task in &self.tasks {
            for dep in task.dependencies.iter() {
                match nodes.get_mut(dep) {
                    Some(node) => {
                        node.targets.insert(task.name.as_str());
                    }
                    None => {
                        return Err(GraphError::UnknownDependency {
                            task: TaskId::new(task.name.clone()),
                            dependency: dep.clone(),
                        });
                    }
                }
            }
        }

        debug!(
            flow = %self.name,
            tasks = nodes.len(),
            roots = %roots,
            "graph compiled"
        );

        Ok(Flow::new(self.name, nodes, roots))
    }

    fn ensure_acyclic(&self) -> Result<(), GraphError> {
        // Edge direction: dep -> task.
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

        for task in &self.tasks {
            graph.add_node(task.name.as_str());
        }

        for task in &self.tasks {
            for dep in task.dependencies.iter() {
                graph.add_edge(dep.as_str(), task.name.as_str(), ());
            }
        }

        match toposort(&graph, None) {
            Ok(_order) => Ok(()),
            Err(cycle) => Err(GraphError::CycleDetected {
                graph: self.name.clone(),
                task: TaskId::new(cycle.node_id()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(name: &str) -> Task {
        Task::new(name, || async { Ok(()) })
    }

    #[test]
    fn add_returns_id_named_after_task() {
        let mut graph = Graph::new("g");
        let id = graph.add(noop("network")).unwrap();
        assert_eq!(id.as_str(), "network");
        assert!(graph.contains(&id));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut graph = Graph::new("g");
        assert_eq!(graph.add(noop("")), Err(GraphError::EmptyName));
        assert!(graph.is_empty());
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut graph = Graph::new("g");
        graph.add(noop("a")).unwrap();
        assert_eq!(
            graph.add(noop("a")),
            Err(GraphError::DuplicateTask(TaskId::from("a")))
        );
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn forward_reference_is_rejected() {
        let mut graph = Graph::new("g");
        let err = graph.add(noop("b").after("a")).unwrap_err();
        assert_eq!(
            err,
            GraphError::UnknownDependency {
                task: "b".into(),
                dependency: "a".into(),
            }
        );
    }

    #[test]
    fn self_dependency_is_rejected() {
        let mut graph = Graph::new("g");
        assert_eq!(
            graph.add(noop("a").after("a")),
            Err(GraphError::SelfDependency("a".into()))
        );
    }

    #[test]
    fn compile_computes_targets_required_and_roots() {
        let mut graph = Graph::new("g");
        let x1 = graph.add(noop("x1")).unwrap();
        let x2 = graph.add(noop("x2")).unwrap();
        let y = graph.add(noop("y").after(&x1).after(&x2)).unwrap();
        graph.add(noop("z").after(&y).after(&x1)).unwrap();

        let flow = graph.compile().unwrap();

        assert_eq!(flow.name(), "g");
        assert_eq!(flow.len(), 4);
        assert_eq!(flow.roots().to_string(), "[x1, x2]");
        assert_eq!(flow.node(&"y".into()).unwrap().required(), 2);
        assert_eq!(flow.node(&"z".into()).unwrap().required(), 2);
        assert_eq!(flow.node(&"x1".into()).unwrap().targets().to_string(), "[y, z]");
        assert_eq!(flow.node(&"x2".into()).unwrap().targets().to_string(), "[y]");
        assert!(flow.node(&"z".into()).unwrap().targets().is_empty());
    }

    #[test]
    fn repeated_dependency_counts_once() {
        let mut graph = Graph::new("g");
        let a = graph.add(noop("a")).unwrap();
        graph.add(noop("b").after(&a).after(&a)).unwrap();

        let flow = graph.compile().unwrap();
        assert_eq!(flow.node(&"b".into()).unwrap().required(), 1);
    }

    #[test]
    fn compile_rejects_cycles() {
        // `add` cannot produce a cycle, so build one behind its back.
        let mut graph = Graph::new("g");
        graph.add(noop("a")).unwrap();
        graph.add(noop("b").after("a")).unwrap();
        graph.tasks[0].dependencies.insert("b");

        match graph.compile() {
            Err(GraphError::CycleDetected { graph, task }) => {
                assert_eq!(graph, "g");
                assert!(task.as_str() == "a" || task.as_str() == "b");
            }
            other => panic!("expected CycleDetected, got {other:?}"),
        }
    }

    #[test]
    fn empty_graph_compiles_to_empty_flow() {
        let flow = Graph::new("empty").compile().unwrap();
        assert!(flow.is_empty());
        assert!(flow.roots().is_empty());
    }
}
