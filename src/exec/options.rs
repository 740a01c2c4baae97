// src/exec/options.rs

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::exec::decode::TextEncoding;
use crate::types::OutputChannel;

/// Per-call execution settings. Built fresh for every invocation.
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    /// Directory the child runs in.
    pub working_directory: PathBuf,
    /// Encoding used to decode the primary pipe (both pipes when streaming).
    pub encoding: TextEncoding,
    /// Variables layered over the inherited environment for this spawn only.
    pub extra_env: BTreeMap<String, String>,
    /// Skip the header and result lines normally sent to the output log.
    pub suppress_logging: bool,
    /// Written to the child's stdin, which is then closed. When `None` stdin
    /// is not connected.
    pub stdin: Option<Vec<u8>>,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            working_directory: PathBuf::from("."),
            encoding: TextEncoding::default(),
            extra_env: BTreeMap::new(),
            suppress_logging: false,
            stdin: None,
        }
    }
}

impl ExecutionOptions {
    pub fn in_dir(working_directory: impl Into<PathBuf>) -> Self {
        Self {
            working_directory: working_directory.into(),
            ..Self::default()
        }
    }
}

/// Outcome of one finished process.
///
/// Only built once the process has exited and both pipes reached
/// end-of-stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// A piece of decoded output delivered while streaming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputChunk {
    pub channel: OutputChannel,
    pub text: String,
}

/// Progress callback used by the streaming helper.
pub type ProgressFn = Arc<dyn Fn(&OutputChunk) + Send + Sync>;

/// Fires a [`CancelSignal`]. Dropping the handle without calling
/// [`CancelHandle::cancel`] never cancels anything.
#[derive(Debug)]
pub struct CancelHandle {
    tx: oneshot::Sender<()>,
}

impl CancelHandle {
    pub fn cancel(self) {
        // Receiver gone means the execution already finished.
        let _ = self.tx.send(());
    }
}

/// Receiving half threaded into an execution.
#[derive(Debug)]
pub struct CancelSignal {
    rx: oneshot::Receiver<()>,
}

impl CancelSignal {
    /// Resolves when the paired handle fires; pends forever if the handle is
    /// dropped instead.
    pub(crate) async fn fired(self) {
        if self.rx.await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Create a linked cancellation pair.
pub fn cancellation() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = oneshot::channel();
    (CancelHandle { tx }, CancelSignal { rx })
}

pub(crate) async fn wait_for_cancel(signal: Option<CancelSignal>) {
    match signal {
        Some(signal) => signal.fired().await,
        None => std::future::pending::<()>().await,
    }
}
