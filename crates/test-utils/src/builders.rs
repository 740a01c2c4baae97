#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use composer_bridge::config::{RawSettingsFile, SettingsFile, SettingsLayer};

/// Builder for `SettingsFile` to simplify test setup.
pub struct SettingsFileBuilder {
    raw: RawSettingsFile,
}

impl SettingsFileBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawSettingsFile {
                window: SettingsLayer::default(),
                folder: BTreeMap::new(),
            },
        }
    }

    pub fn executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.raw.window.executable_path = Some(path.into());
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.raw.window.enabled = Some(enabled);
        self
    }

    pub fn working_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.raw.window.working_path = Some(path.into());
        self
    }

    pub fn encoding(mut self, label: &str) -> Self {
        self.raw.window.encoding = Some(label.to_string());
        self
    }

    pub fn folder(mut self, root: impl Into<PathBuf>, layer: SettingsLayer) -> Self {
        self.raw.folder.insert(root.into(), layer);
        self
    }

    pub fn build(self) -> SettingsFile {
        SettingsFile::try_from(self.raw).expect("Failed to build valid settings from builder")
    }
}

impl Default for SettingsFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Write an executable shell script named `composer` into `dir` and return
/// its path. The body runs under `/bin/sh` with the usual `"$@"`.
#[cfg(unix)]
pub fn fake_composer(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("composer");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write fake composer");
    let mut perms = std::fs::metadata(&path)
        .expect("stat fake composer")
        .permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod fake composer");
    path
}
