// src/exec/process.rs

use std::path::Path;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use crate::errors::{ComposerError, Result};
use crate::exec::options::ExecutionOptions;

/// Spawn `program` with `args` in the configured working directory.
///
/// - The environment overlay is applied on top of the inherited environment
///   for this child only; nothing in the parent is mutated.
/// - Stdin is piped only when a payload is supplied, otherwise it is not
///   connected. Stdout and stderr are always piped.
/// - The child is killed if its handle is dropped before it exits.
pub fn spawn(program: &Path, args: &[String], options: &ExecutionOptions) -> Result<Child> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(&options.working_directory)
        .envs(&options.extra_env)
        .stdin(if options.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd
        .spawn()
        .map_err(|e| ComposerError::launch(&program.display().to_string(), e))?;

    info!(
        program = %program.display(),
        args = ?args,
        cwd = %options.working_directory.display(),
        pid = child.id(),
        "spawned composer process"
    );

    Ok(child)
}

/// Detach both output pipes from a freshly spawned child.
pub(crate) fn take_pipes(child: &mut Child) -> Result<(ChildStdout, ChildStderr)> {
    match (child.stdout.take(), child.stderr.take()) {
        (Some(stdout), Some(stderr)) => Ok((stdout, stderr)),
        _ => Err(ComposerError::Other(anyhow::anyhow!(
            "Failed to get stdout or stderr from composer process."
        ))),
    }
}

/// Write `payload` to the child's stdin in the background and close it.
///
/// Returns the writer task's abort handle so the caller can register it as
/// an observer, or `None` if the child has no stdin pipe.
pub(crate) fn feed_stdin(child: &mut Child, payload: Vec<u8>) -> Option<AbortHandle> {
    let Some(mut stdin) = child.stdin.take() else {
        warn!("stdin payload supplied but the child has no stdin pipe");
        return None;
    };

    let task = tokio::spawn(async move {
        if let Err(e) = stdin.write_all(&payload).await {
            // The child may exit without reading its input.
            debug!(error = %e, "failed to write stdin payload");
        }
        drop(stdin);
    });
    Some(task.abort_handle())
}
