// src/config/model.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::exec::TextEncoding;

/// Settings file as read from TOML, before validation.
///
/// ```toml
/// enabled = true
/// executable_path = "/usr/local/bin/composer"
/// working_path = "app"
/// encoding = "utf-8"
///
/// [folder."/home/me/project"]
/// working_path = "/home/me/project/backend"
/// ```
///
/// Top-level keys form the window scope; each `[folder."<root>"]` table
/// overrides them for one workspace root.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSettingsFile {
    #[serde(flatten)]
    pub window: SettingsLayer,

    #[serde(default)]
    pub folder: BTreeMap<PathBuf, SettingsLayer>,
}

/// One scope's worth of settings. Unset fields defer to the outer scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SettingsLayer {
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Path to the composer executable.
    #[serde(default)]
    pub executable_path: Option<PathBuf>,

    /// Working directory override; relative paths join the workspace root.
    #[serde(default)]
    pub working_path: Option<PathBuf>,

    /// Output encoding label.
    #[serde(default)]
    pub encoding: Option<String>,
}

impl SettingsLayer {
    /// Fields set in `over` replace the ones in `self`.
    pub fn overlay(&self, over: &SettingsLayer) -> SettingsLayer {
        SettingsLayer {
            enabled: over.enabled.or(self.enabled),
            executable_path: over
                .executable_path
                .clone()
                .or_else(|| self.executable_path.clone()),
            working_path: over
                .working_path
                .clone()
                .or_else(|| self.working_path.clone()),
            encoding: over.encoding.clone().or_else(|| self.encoding.clone()),
        }
    }
}

/// Validated settings file.
///
/// Constructed via `TryFrom<RawSettingsFile>` (see `validate.rs`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsFile {
    window: SettingsLayer,
    folders: BTreeMap<PathBuf, SettingsLayer>,
    overrides: SettingsLayer,
}

impl SettingsFile {
    pub(crate) fn new_unchecked(
        window: SettingsLayer,
        folders: BTreeMap<PathBuf, SettingsLayer>,
    ) -> Self {
        Self {
            window,
            folders,
            overrides: SettingsLayer::default(),
        }
    }

    /// Apply a layer (typically from CLI flags) that wins over every scope.
    pub fn with_overrides(mut self, overrides: SettingsLayer) -> Self {
        self.overrides = overrides;
        self
    }

    /// Resolve the settings for a scope.
    ///
    /// `None` reads the window scope only; `Some(root)` additionally applies
    /// the `[folder."<root>"]` table for that root, if any.
    pub fn scoped(&self, root: Option<&Path>) -> ComposerSettings {
        let mut layer = self.window.clone();
        if let Some(folder) = root.and_then(|r| self.folders.get(r)) {
            layer = layer.overlay(folder);
        }
        ComposerSettings::from(layer.overlay(&self.overrides))
    }
}

/// Immutable snapshot of the settings that apply to one scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposerSettings {
    pub enabled: bool,
    pub executable_path: Option<PathBuf>,
    pub working_path: Option<PathBuf>,
    pub encoding: TextEncoding,
}

impl Default for ComposerSettings {
    fn default() -> Self {
        Self::from(SettingsLayer::default())
    }
}

impl From<SettingsLayer> for ComposerSettings {
    fn from(layer: SettingsLayer) -> Self {
        Self {
            enabled: layer.enabled.unwrap_or(true),
            executable_path: layer.executable_path,
            working_path: layer.working_path,
            encoding: layer
                .encoding
                .as_deref()
                .map(TextEncoding::for_label)
                .unwrap_or_default(),
        }
    }
}
