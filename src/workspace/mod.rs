// src/workspace/mod.rs

//! Command dispatch across workspace roots.
//!
//! This module plays the editor host's part:
//! - one [`crate::context::ComposerContext`] per root, created only while the
//!   window-scope `enabled` setting is on,
//! - routing every client's output into a [`LogSink`],
//! - completion markers and error notifications around each dispatched
//!   operation,
//! - re-initialisation whenever the settings file changes
//!   ([`watcher::spawn_settings_watcher`]).
//!
//! The session loop in `lib.rs` feeds [`WorkspaceEvent`]s into a
//! [`Workspace`].

pub mod dispatcher;
pub mod sink;
pub mod watcher;

pub use dispatcher::{Workspace, WorkspaceOptions};
pub use sink::{LogSink, MemorySink, StdoutSink};
pub use watcher::{SettingsWatcherHandle, spawn_settings_watcher};

/// Events flowing into the session loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceEvent {
    /// The settings file was created, modified or removed.
    SettingsChanged,
    /// A command line typed by the user (`<operation> [args...]`).
    Command(String),
    /// Input ended or Ctrl-C was pressed.
    ShutdownRequested,
}
