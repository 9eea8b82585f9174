// src/exec/command.rs

use std::process::Stdio;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::dag::{TaskFn, TaskFuture};

/// Task body that runs `cmd` through the platform shell.
///
/// The task fails if the process cannot be spawned or exits unsuccessfully.
/// Output lines are logged at `debug` as they arrive.
pub fn shell_task(name: &str, cmd: &str) -> TaskFn {
    let name: Arc<str> = Arc::from(name);
    let cmd: Arc<str> = Arc::from(cmd);

    Arc::new(move || {
        let name = Arc::clone(&name);
        let cmd = Arc::clone(&cmd);
        Box::pin(async move { run_command(&name, &cmd).await }) as TaskFuture
    })
}

/// Run a single shell command to completion.
pub async fn run_command(name: &str, cmd: &str) -> Result<()> {
    info!(task = %name, cmd = %cmd, "starting task process");

    // Build a shell command appropriate for the platform.
    let mut command = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    };

    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command
        .spawn()
        .with_context(|| format!("spawning process for task '{name}'"))?;

    // Always consume both pipes so the child never blocks on a full buffer.
    let stdout = child.stdout.take().map(|s| forward_lines(name, "stdout", s));
    let stderr = child.stderr.take().map(|s| forward_lines(name, "stderr", s));

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of task '{name}'"))?;

    for handle in [stdout, stderr].into_iter().flatten() {
        if let Err(err) = handle.await {
            warn!(task = %name, error = %err, "output forwarder did not finish cleanly");
        }
    }

    let code = status.code().unwrap_or(-1);
    info!(
        task = %name,
        exit_code = code,
        success = status.success(),
        "task process exited"
    );

    if !status.success() {
        bail!("command `{cmd}` exited with code {code}");
    }
    Ok(())
}

fn forward_lines<R>(name: &str, stream: &'static str, reader: R) -> tokio::task::JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let name = name.to_string();
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            debug!(task = %name, stream, "{}", line);
        }
    })
}
