// src/lib.rs

//! `reconflow`: dependency-ordered task flows with maximum safe parallelism.
//!
//! Build a [`Graph`] of [`Task`]s, compile it into a [`Flow`] and run it:
//!
//! ```no_run
//! use reconflow::{Graph, RunOptions, Task};
//!
//! # async fn provision() -> anyhow::Result<()> {
//! let mut graph = Graph::new("provision-cluster");
//! let network = graph.add(Task::new("network", || async { Ok(()) }))?;
//! let certs = graph.add(Task::new("certificates", || async { Ok(()) }).after(&network))?;
//! graph.add(Task::new("control-plane", || async { Ok(()) }).after(&certs))?;
//!
//! let flow = graph.compile()?;
//! flow.run(RunOptions::new().with_progress(|stats| println!("{stats}"))).await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;

pub use dag::{Flow, Graph, Task, TaskFn, TaskId, TaskIdSet};
pub use engine::{Concurrency, RunOptions, Stats};
pub use errors::{FlowError, GraphError, TaskError, causes, task_errors};

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::ConfigFile;
use crate::config::loader::load_and_validate;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - flow file loading and validation
/// - graph construction and compilation
/// - execution with progress logging
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_and_validate(&args.config)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let concurrency = args.concurrency.unwrap_or_else(|| cfg.flow.concurrency());
    let flow = config::build_graph(&cfg)?.compile()?;

    let options = RunOptions::new()
        .with_concurrency(concurrency)
        .with_progress(|stats| {
            info!(
                progress = stats.progress_percent(),
                running = %stats.running,
                "flow progress"
            );
        });

    flow.run(options).await?;

    info!(flow = %flow.name(), "all tasks succeeded");
    Ok(())
}

/// Simple dry-run output: print the flow, its tasks, commands and deps.
fn print_dry_run(cfg: &ConfigFile) {
    println!("reconflow dry-run");
    println!("  flow.name = {}", cfg.flow.name);
    println!("  flow.concurrency = {}", cfg.flow.concurrency());
    println!();

    println!("tasks ({}, in dependency order):", cfg.order().len());
    for name in cfg.order() {
        let Some(task) = cfg.task.get(name) else {
            continue;
        };
        println!("  - {name}");
        if let Some(ref description) = task.description {
            println!("      description: {description}");
        }
        println!("      cmd: {}", task.cmd);
        if !task.after.is_empty() {
            println!("      after: {:?}", task.after);
        }
    }

    let roots: Vec<&str> = cfg
        .order()
        .iter()
        .filter(|name| cfg.task.get(*name).is_some_and(|t| t.after.is_empty()))
        .map(String::as_str)
        .collect();
    println!();
    println!("roots: {roots:?}");

    debug!("dry-run complete (no execution)");
}
