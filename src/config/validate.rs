// src/config/validate.rs

use tracing::warn;

use crate::config::model::{RawSettingsFile, SettingsFile, SettingsLayer};
use crate::errors::{ComposerError, Result};
use crate::exec::TextEncoding;

impl TryFrom<RawSettingsFile> for SettingsFile {
    type Error = ComposerError;

    fn try_from(raw: RawSettingsFile) -> std::result::Result<Self, Self::Error> {
        validate_layer("window", &raw.window)?;
        for (root, layer) in raw.folder.iter() {
            validate_layer(&format!("folder \"{}\"", root.display()), layer)?;
        }
        Ok(SettingsFile::new_unchecked(raw.window, raw.folder))
    }
}

/// Validate a single scope.
///
/// - An empty `executable_path` is rejected; omit the key instead.
/// - An unknown `encoding` is only warned about; it resolves to UTF-8.
pub fn validate_layer(scope: &str, layer: &SettingsLayer) -> Result<()> {
    if let Some(path) = &layer.executable_path {
        if path.as_os_str().is_empty() {
            return Err(ComposerError::Configuration(format!(
                "{scope}: executable_path must not be empty"
            )));
        }
    }

    if let Some(label) = &layer.encoding {
        if TextEncoding::lookup(label).is_none() {
            warn!(
                scope,
                encoding = %label,
                "unknown encoding in settings; utf-8 will be used"
            );
        }
    }

    Ok(())
}
