// src/context/mod.rs

//! Per-workspace-root sessions.
//!
//! A [`ComposerContext`] binds one root directory to a settings snapshot and
//! a lazily built [`crate::client::ComposerClient`]. Both are replaced
//! wholesale, never mutated, and every replacement is announced on the
//! context's change emitters.

pub mod paths;
pub mod session;

pub use paths::{PROJECT_MARKER, resolve_working_path};
pub use session::{ClientChanged, ComposerContext, SettingsChanged};
