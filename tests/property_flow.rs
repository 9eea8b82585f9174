// tests/property_flow.rs

mod common;
use crate::common::{Recorder, SnapshotLog};

use std::collections::BTreeSet;

use proptest::prelude::*;
use reconflow::{Flow, Graph, RunOptions, Stats, TaskId};

/// One generated task: the indices of earlier tasks it depends on, and
/// whether its body fails.
#[derive(Debug, Clone)]
struct GenTask {
    deps: BTreeSet<usize>,
    fails: bool,
}

// Acyclic by construction: task N may only depend on tasks 0..N-1.
fn dag_strategy(max_tasks: usize) -> impl Strategy<Value = Vec<GenTask>> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        proptest::collection::vec(
            (
                proptest::collection::vec(any::<usize>(), 0..num_tasks),
                proptest::bool::weighted(0.2),
            ),
            num_tasks,
        )
        .prop_map(|raw| {
            raw.into_iter()
                .enumerate()
                .map(|(i, (potential, fails))| GenTask {
                    deps: if i == 0 {
                        BTreeSet::new()
                    } else {
                        potential.into_iter().map(|d| d % i).collect()
                    },
                    fails,
                })
                .collect()
        })
    })
}

fn name(i: usize) -> String {
    format!("task_{i}")
}

fn build(tasks: &[GenTask], recorder: &Recorder) -> Flow {
    let mut graph = Graph::new("generated");
    for (i, generated) in tasks.iter().enumerate() {
        let task = if generated.fails {
            recorder.failing(&name(i), "generated failure")
        } else {
            recorder.task(&name(i))
        };
        let deps: Vec<String> = generated.deps.iter().map(|&d| name(d)).collect();
        graph.add(task.after_all(deps)).unwrap();
    }
    graph.compile().unwrap()
}

/// A task runs iff every dependency ran and succeeded.
fn expected_runs(tasks: &[GenTask]) -> Vec<bool> {
    let mut runs: Vec<bool> = Vec::with_capacity(tasks.len());
    for task in tasks {
        let ready = task.deps.iter().all(|&d| runs[d] && !tasks[d].fails);
        runs.push(ready);
    }
    runs
}

/// Run to completion, returning the final stats and every snapshot delivered.
fn run_flow(flow: &Flow) -> (Stats, Vec<Stats>) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    let log = SnapshotLog::new();
    let options = RunOptions::new().with_progress(log.callback());

    let stats = match runtime.block_on(flow.run(options)) {
        Ok(()) => log.last().expect("no progress reported"),
        Err(err) => err.stats().clone(),
    };
    (stats, log.snapshots())
}

proptest! {
    #[test]
    fn dependencies_always_complete_first(tasks in dag_strategy(8)) {
        let recorder = Recorder::new();
        let flow = build(&tasks, &recorder);

        run_flow(&flow);

        for (i, task) in tasks.iter().enumerate() {
            let Some(start) = recorder.started(&name(i)) else {
                continue;
            };
            for &d in &task.deps {
                let dep_end = recorder.finished(&name(d));
                prop_assert!(
                    dep_end.is_some_and(|end| end < start),
                    "task_{} started before task_{} finished", i, d
                );
                prop_assert!(!tasks[d].fails, "task_{} ran after failed task_{}", i, d);
            }
        }
    }

    #[test]
    fn exactly_the_unblocked_tasks_run(tasks in dag_strategy(8)) {
        let recorder = Recorder::new();
        let flow = build(&tasks, &recorder);

        let (stats, snapshots) = run_flow(&flow);
        let runs = expected_runs(&tasks);

        prop_assert!(snapshots.iter().all(Stats::is_consistent));
        prop_assert_eq!(snapshots.last(), Some(&stats));
        prop_assert!(stats.is_consistent());
        prop_assert!(stats.running.is_empty());

        for (i, task) in tasks.iter().enumerate() {
            let id = TaskId::from(name(i));
            prop_assert_eq!(recorder.ran(&name(i)), runs[i]);
            prop_assert_eq!(stats.pending.contains(&id), !runs[i]);
            prop_assert_eq!(stats.failed.contains(&id), runs[i] && task.fails);
            prop_assert_eq!(stats.succeeded.contains(&id), runs[i] && !task.fails);
        }

        prop_assert_eq!(recorder.log().len(), runs.iter().filter(|r| **r).count());
    }
}
