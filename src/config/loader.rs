// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{RawSettingsFile, SettingsFile};
use crate::errors::Result;

/// Load a settings file from a given path and return the raw `RawSettingsFile`.
///
/// This only performs TOML deserialization; it does **not** perform
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawSettingsFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let raw: RawSettingsFile = toml::from_str(&contents)?;

    Ok(raw)
}

/// Load a settings file from path and run basic validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<SettingsFile> {
    let raw = load_from_path(&path)?;
    SettingsFile::try_from(raw)
}

/// Like [`load_and_validate`], but a missing file yields default settings.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<SettingsFile> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(path = %path.display(), "settings file not found; using defaults");
        return Ok(SettingsFile::default());
    }
    load_and_validate(path)
}

/// Settings file looked up in the current working directory when no
/// `--settings` flag is given.
pub fn default_settings_path() -> PathBuf {
    PathBuf::from("composer-bridge.toml")
}
