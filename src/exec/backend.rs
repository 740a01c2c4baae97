// src/exec/backend.rs

//! Pluggable launcher abstraction.
//!
//! The client talks to a `Launcher` instead of spawning processes itself.
//! This makes it easy to swap in a fake launcher in tests while keeping the
//! production implementation in [`ProcessLauncher`].
//!
//! - `ProcessLauncher` spawns the real executable and hands the child to
//!   [`run_to_completion`] or [`run_with_progress`].
//! - Tests can provide their own `Launcher` that, for example, records the
//!   argument vectors and replays canned output.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use crate::errors::Result;
use crate::exec::collect::run_to_completion;
use crate::exec::options::{CancelSignal, ExecutionOptions, ExecutionResult, ProgressFn};
use crate::exec::process::spawn;
use crate::exec::stream::run_with_progress;

/// Everything needed to start one process.
#[derive(Debug)]
pub struct Invocation {
    pub program: PathBuf,
    /// Final argument vector, after any rewriting.
    pub args: Vec<String>,
    pub options: ExecutionOptions,
    pub cancel: Option<CancelSignal>,
}

/// Trait abstracting how an invocation is executed.
///
/// Production code uses [`ProcessLauncher`]; tests can provide their own
/// implementation that doesn't spawn real processes.
pub trait Launcher: Send + Sync {
    /// Execute the invocation.
    ///
    /// With `progress` set, output is streamed through it while running;
    /// otherwise it is only collected.
    fn launch(
        &self,
        invocation: Invocation,
        progress: Option<ProgressFn>,
    ) -> Pin<Box<dyn Future<Output = Result<ExecutionResult>> + Send + '_>>;
}

/// Real launcher used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(
        &self,
        invocation: Invocation,
        progress: Option<ProgressFn>,
    ) -> Pin<Box<dyn Future<Output = Result<ExecutionResult>> + Send + '_>> {
        Box::pin(async move {
            let Invocation {
                program,
                args,
                options,
                cancel,
            } = invocation;

            let child = spawn(&program, &args, &options)?;
            match progress {
                Some(progress) => run_with_progress(child, &options, progress, cancel).await,
                None => run_to_completion(child, &options, cancel).await,
            }
        })
    }
}
