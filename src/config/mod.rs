// src/config/mod.rs

//! Settings loading and validation for composer-bridge.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a settings file from disk (`loader.rs`).
//! - Validate basic invariants (`validate.rs`).
//! - Resolve window- or folder-scoped [`ComposerSettings`] snapshots.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_settings_path, load_and_validate, load_from_path, load_or_default};
pub use model::{ComposerSettings, RawSettingsFile, SettingsFile, SettingsLayer};
