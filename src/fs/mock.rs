// src/fs/mock.rs

use super::FileSystem;
use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MockEntry {
    File,
    Dir,
}

/// In-memory filesystem for tests. Paths are taken literally; parents of
/// added entries are registered as directories.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>) {
        self.insert(path.as_ref(), MockEntry::File);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        self.insert(path.as_ref(), MockEntry::Dir);
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        self.lock().remove(path.as_ref());
    }

    fn insert(&self, path: &Path, entry: MockEntry) {
        let mut entries = self.lock();
        entries.insert(path.to_path_buf(), entry);
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            entries.entry(ancestor.to_path_buf()).or_insert(MockEntry::Dir);
        }
    }

    fn get(&self, path: &Path) -> Option<MockEntry> {
        self.lock().get(path).copied()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, MockEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FileSystem for MockFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        self.get(path) == Some(MockEntry::File)
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        // No symlinks in the mock; existing paths are already canonical.
        if self.get(path).is_some() {
            Ok(path.to_path_buf())
        } else {
            Err(anyhow!("File not found: {:?}", path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parents_become_directories() {
        let fs = MockFileSystem::new();
        fs.add_file("/ws/app/composer.json");

        assert!(fs.is_file(Path::new("/ws/app/composer.json")));
        assert_eq!(fs.get(Path::new("/ws/app")), Some(MockEntry::Dir));
        assert_eq!(fs.get(Path::new("/ws")), Some(MockEntry::Dir));
        assert_eq!(fs.get(Path::new("/ws/other")), None);
    }

    #[test]
    fn canonicalize_requires_existence() {
        let fs = MockFileSystem::new();
        fs.add_dir("/ws");
        assert!(fs.canonicalize(Path::new("/ws")).is_ok());
        assert!(fs.canonicalize(Path::new("/nope")).is_err());
    }
}
