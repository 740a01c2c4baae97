use std::collections::VecDeque;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use composer_bridge::errors::Result;
use composer_bridge::exec::{
    ExecutionOptions, ExecutionResult, Invocation, Launcher, OutputChunk, ProgressFn,
};
use composer_bridge::types::OutputChannel;

/// What the fake saw for one launch.
#[derive(Debug, Clone)]
pub struct RecordedLaunch {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub options: ExecutionOptions,
    pub streamed: bool,
}

/// Canned reply for one launch.
#[derive(Debug, Clone)]
pub struct Reply {
    pub exit_code: Option<i32>,
    pub chunks: Vec<OutputChunk>,
}

impl Reply {
    pub fn ok(stdout: &str) -> Self {
        Self::exit(0).stdout(stdout)
    }

    pub fn exit(code: i32) -> Self {
        Self {
            exit_code: Some(code),
            chunks: Vec::new(),
        }
    }

    pub fn stdout(mut self, text: &str) -> Self {
        self.chunks.push(OutputChunk {
            channel: OutputChannel::Primary,
            text: text.to_string(),
        });
        self
    }

    pub fn stderr(mut self, text: &str) -> Self {
        self.chunks.push(OutputChunk {
            channel: OutputChannel::Diagnostic,
            text: text.to_string(),
        });
        self
    }
}

/// A fake launcher that:
/// - records every invocation it receives
/// - replays queued replies in order (an empty queue answers `exit 0`)
/// - feeds reply chunks through the progress callback when streaming.
#[derive(Debug, Clone, Default)]
pub struct FakeLauncher {
    launches: Arc<Mutex<Vec<RecordedLaunch>>>,
    replies: Arc<Mutex<VecDeque<Reply>>>,
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reply(&self, reply: Reply) -> &Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn launches(&self) -> Vec<RecordedLaunch> {
        self.launches.lock().unwrap().clone()
    }

    /// Argument vectors of every launch so far.
    pub fn argv(&self) -> Vec<Vec<String>> {
        self.launches().into_iter().map(|l| l.args).collect()
    }
}

impl Launcher for FakeLauncher {
    fn launch(
        &self,
        invocation: Invocation,
        progress: Option<ProgressFn>,
    ) -> Pin<Box<dyn Future<Output = Result<ExecutionResult>> + Send + '_>> {
        Box::pin(async move {
            self.launches.lock().unwrap().push(RecordedLaunch {
                program: invocation.program,
                args: invocation.args,
                options: invocation.options,
                streamed: progress.is_some(),
            });

            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Reply::exit(0));

            let mut stdout = String::new();
            let mut stderr = String::new();
            for chunk in &reply.chunks {
                match chunk.channel {
                    OutputChannel::Primary => stdout.push_str(&chunk.text),
                    OutputChannel::Diagnostic => stderr.push_str(&chunk.text),
                }
                if let Some(progress) = &progress {
                    progress(chunk);
                }
            }

            Ok(ExecutionResult {
                exit_code: reply.exit_code,
                stdout,
                stderr,
            })
        })
    }
}
