// src/workspace/watcher.rs

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::errors::{ComposerError, Result};
use crate::workspace::WorkspaceEvent;

/// Handle for the settings watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive for
/// as long as needed. Dropping this handle will stop watching.
pub struct SettingsWatcherHandle {
    _inner: RecommendedWatcher,
    path: PathBuf,
}

impl SettingsWatcherHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for SettingsWatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsWatcherHandle")
            .field("path", &self.path)
            .finish()
    }
}

/// Watch `settings_path` and send [`WorkspaceEvent::SettingsChanged`] when it
/// is created, modified or removed.
///
/// The parent directory is watched (non-recursively) so the file may appear
/// later or be replaced by an editor's atomic save. Bursts of events are
/// coalesced into one notification.
pub fn spawn_settings_watcher(
    settings_path: impl Into<PathBuf>,
    events_tx: mpsc::Sender<WorkspaceEvent>,
) -> Result<SettingsWatcherHandle> {
    let settings_path = settings_path.into();
    let file_name = settings_path
        .file_name()
        .map(OsString::from)
        .ok_or_else(|| {
            ComposerError::Configuration(format!(
                "settings path {:?} has no file name",
                settings_path
            ))
        })?;
    let dir = match settings_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    // Channel from the blocking notify callback into the async world.
    let (raw_tx, mut raw_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = raw_tx.send(event) {
                    // We can't log via tracing here easily, so fallback to stderr.
                    eprintln!("composer-bridge: failed to forward settings event: {err}");
                }
            }
            Err(err) => {
                eprintln!("composer-bridge: settings watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    info!(path = %settings_path.display(), "watching settings file");

    tokio::spawn(async move {
        while let Some(event) = raw_rx.recv().await {
            if !touches(&event, &file_name) {
                continue;
            }
            // Drain whatever else is already queued; one reload covers it.
            while raw_rx.try_recv().is_ok() {}

            debug!(?event.kind, "settings file changed");
            if events_tx.send(WorkspaceEvent::SettingsChanged).await.is_err() {
                break;
            }
        }
        debug!("settings watcher loop finished");
    });

    Ok(SettingsWatcherHandle {
        _inner: watcher,
        path: settings_path,
    })
}

fn touches(event: &Event, file_name: &OsString) -> bool {
    let relevant_kind = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    relevant_kind
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name.as_os_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind};

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn only_settings_file_changes_count() {
        let name = OsString::from("composer-bridge.toml");
        assert!(touches(
            &event(EventKind::Modify(ModifyKind::Any), "/ws/composer-bridge.toml"),
            &name
        ));
        assert!(touches(
            &event(EventKind::Create(CreateKind::File), "/ws/composer-bridge.toml"),
            &name
        ));
        assert!(!touches(
            &event(EventKind::Modify(ModifyKind::Any), "/ws/other.toml"),
            &name
        ));
        assert!(!touches(
            &event(EventKind::Access(AccessKind::Any), "/ws/composer-bridge.toml"),
            &name
        ));
    }
}
