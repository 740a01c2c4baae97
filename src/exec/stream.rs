// src/exec/stream.rs

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Child;
use tracing::trace;

use crate::errors::Result;
use crate::exec::decode::StreamDecoder;
use crate::exec::join::{PipeReader, join_observed};
use crate::exec::options::{CancelSignal, ExecutionOptions, ExecutionResult, OutputChunk, ProgressFn};
use crate::exec::process::{feed_stdin, take_pipes};
use crate::lifecycle::DisposableSet;
use crate::types::OutputChannel;

const READ_BUFFER: usize = 8 * 1024;

/// Run an already spawned child, forwarding output to `progress` as it
/// arrives, and return the aggregated output once it has exited.
///
/// - Both pipes are decoded with `options.encoding`.
/// - Chunks on one pipe reach `progress` in arrival order; there is no
///   ordering between the two pipes.
/// - The aggregated text of a pipe is exactly the concatenation of the chunks
///   delivered for it.
/// - Chunk boundaries follow the OS reads, not lines.
pub async fn run_with_progress(
    mut child: Child,
    options: &ExecutionOptions,
    progress: ProgressFn,
    cancel: Option<CancelSignal>,
) -> Result<ExecutionResult> {
    let (stdout, stderr) = take_pipes(&mut child)?;

    let mut observers = DisposableSet::new();
    if let Some(payload) = options.stdin.clone() {
        if let Some(writer) = feed_stdin(&mut child, payload) {
            observers.push(writer);
        }
    }

    let stdout = forward(
        stdout,
        OutputChannel::Primary,
        options.encoding.decoder(),
        progress.clone(),
    );
    let stderr = forward(
        stderr,
        OutputChannel::Diagnostic,
        options.encoding.decoder(),
        progress,
    );

    join_observed(child, stdout, stderr, observers, cancel).await
}

fn forward<R>(
    mut pipe: R,
    channel: OutputChannel,
    mut decoder: StreamDecoder,
    progress: ProgressFn,
) -> PipeReader
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = vec![0u8; READ_BUFFER];
        let mut aggregated = String::new();

        loop {
            let n = pipe.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            trace!(%channel, bytes = n, "output chunk");
            deliver(&progress, channel, decoder.push(&buf[..n]), &mut aggregated);
        }
        deliver(&progress, channel, decoder.finish(), &mut aggregated);

        Ok(aggregated)
    })
}

fn deliver(progress: &ProgressFn, channel: OutputChannel, text: String, aggregated: &mut String) {
    if text.is_empty() {
        return;
    }
    aggregated.push_str(&text);
    progress(&OutputChunk { channel, text });
}
