// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the composer executable
//! with `tokio::process::Command` and joining its exit status with both of
//! its output pipes into a single [`ExecutionResult`].
//!
//! - [`options`] holds the per-call [`ExecutionOptions`], the result type,
//!   output chunks and the cancellation pair.
//! - [`decode`] resolves text encodings and provides the incremental
//!   [`StreamDecoder`] used while streaming.
//! - [`process`] spawns the child and classifies launch failures.
//! - [`join`] is the three-way join of exit + stdout + stderr shared by both
//!   helpers, including observer teardown.
//! - [`collect`] runs to completion; [`stream`] forwards chunks as they
//!   arrive.
//! - [`backend`] provides the [`Launcher`] trait and the production
//!   [`ProcessLauncher`], which tests can replace with a fake.

pub mod backend;
pub mod collect;
pub mod decode;
pub mod join;
pub mod options;
pub mod process;
pub mod stream;

pub use backend::{Invocation, Launcher, ProcessLauncher};
pub use collect::run_to_completion;
pub use decode::{StreamDecoder, TextEncoding};
pub use options::{
    CancelHandle, CancelSignal, ExecutionOptions, ExecutionResult, OutputChunk, ProgressFn,
    cancellation,
};
pub use process::spawn;
pub use stream::run_with_progress;
