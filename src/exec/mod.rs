// src/exec/mod.rs

//! Process execution for flow files.
//!
//! [`command`] turns a shell command string into a [`TaskFn`](crate::dag::TaskFn)
//! using `tokio::process::Command`. Task bodies written in Rust don't need
//! this module at all.

pub mod command;

pub use command::{run_command, shell_task};
