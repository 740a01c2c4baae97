// src/exec/join.rs

//! Three-way join of a child's exit status with its two output readers.

use std::io;

use tokio::process::Child;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};

use crate::errors::{ComposerError, Result};
use crate::exec::options::{CancelSignal, ExecutionResult, wait_for_cancel};
use crate::lifecycle::{Disposable, DisposableSet};

/// Reader task for one pipe, yielding the decoded text once the pipe closes.
pub(crate) type PipeReader = JoinHandle<io::Result<String>>;

/// Wait for exit, stdout EOF and stderr EOF together.
///
/// `observers` holds every background task attached to this child (the two
/// readers and, if present, the stdin writer). It is released once the join
/// settles on any path: success, read failure or cancellation.
///
/// On cancellation the child is killed and no result is produced.
pub(crate) async fn join_observed(
    mut child: Child,
    stdout: PipeReader,
    stderr: PipeReader,
    mut observers: DisposableSet,
    cancel: Option<CancelSignal>,
) -> Result<ExecutionResult> {
    observers.push(stdout.abort_handle());
    observers.push(stderr.abort_handle());

    let joined = tokio::select! {
        joined = async { tokio::join!(child.wait(), stdout, stderr) } => Some(joined),
        () = wait_for_cancel(cancel) => None,
    };

    let Some((status, stdout, stderr)) = joined else {
        info!(pid = child.id(), "cancellation requested; killing composer process");
        if let Err(e) = child.kill().await {
            warn!(error = %e, "failed to kill composer process on cancellation");
        }
        release(&mut observers);
        return Err(ComposerError::Cancelled);
    };

    release(&mut observers);

    let status = status?;
    let stdout = flatten(stdout)?;
    let stderr = flatten(stderr)?;

    debug!(
        exit_code = ?status.code(),
        stdout_len = stdout.len(),
        stderr_len = stderr.len(),
        "composer process finished"
    );

    Ok(ExecutionResult {
        exit_code: status.code(),
        stdout,
        stderr,
    })
}

fn release(observers: &mut DisposableSet) {
    if let Err(e) = observers.release() {
        warn!(error = %e, "failed to release process observers");
    }
}

fn flatten(joined: std::result::Result<io::Result<String>, JoinError>) -> Result<String> {
    match joined {
        Ok(read) => Ok(read?),
        Err(e) => Err(ComposerError::Other(anyhow::Error::new(e).context("output reader task failed"))),
    }
}
