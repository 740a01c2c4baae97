// src/context/paths.rs

use std::path::{Path, PathBuf};

/// File whose presence marks a directory as a composer project.
pub const PROJECT_MARKER: &str = "composer.json";

/// Combine a workspace root with an optional working-path setting.
///
/// An absolute setting replaces the root; a relative one is joined onto it.
pub fn resolve_working_path(root: &Path, setting: Option<&Path>) -> PathBuf {
    match setting {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => root.join(path),
        None => root.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn relative_setting_joins_root() {
        assert_eq!(
            resolve_working_path(Path::new("/ws"), Some(Path::new("sub/dir"))),
            PathBuf::from("/ws/sub/dir")
        );
    }

    #[cfg(unix)]
    #[test]
    fn absolute_setting_wins() {
        assert_eq!(
            resolve_working_path(Path::new("/ws"), Some(Path::new("/abs/dir"))),
            PathBuf::from("/abs/dir")
        );
    }

    #[test]
    fn no_setting_uses_root() {
        assert_eq!(
            resolve_working_path(Path::new("ws"), None),
            PathBuf::from("ws")
        );
    }
}
