// src/exec/collect.rs

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Child;

use crate::errors::Result;
use crate::exec::decode::TextEncoding;
use crate::exec::join::{PipeReader, join_observed};
use crate::exec::options::{CancelSignal, ExecutionOptions, ExecutionResult};
use crate::exec::process::{feed_stdin, take_pipes};
use crate::lifecycle::DisposableSet;

/// Run an already spawned child to completion and return its output.
///
/// Stdout is decoded with `options.encoding`. Stderr is always decoded as
/// UTF-8: it carries human-readable diagnostics regardless of the output
/// encoding.
///
/// A non-zero exit is not an error; it is reported in
/// [`ExecutionResult::exit_code`].
pub async fn run_to_completion(
    mut child: Child,
    options: &ExecutionOptions,
    cancel: Option<CancelSignal>,
) -> Result<ExecutionResult> {
    let (stdout, stderr) = take_pipes(&mut child)?;

    let mut observers = DisposableSet::new();
    if let Some(payload) = options.stdin.clone() {
        if let Some(writer) = feed_stdin(&mut child, payload) {
            observers.push(writer);
        }
    }

    let stdout = read_decoded(stdout, options.encoding);
    let stderr = read_decoded(stderr, TextEncoding::utf8());

    join_observed(child, stdout, stderr, observers, cancel).await
}

fn read_decoded<R>(mut pipe: R, encoding: TextEncoding) -> PipeReader
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf).await?;
        Ok(encoding.decode(&buf))
    })
}
