// src/context/session.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::client::ComposerClient;
use crate::config::{ComposerSettings, SettingsFile};
use crate::context::paths::{PROJECT_MARKER, resolve_working_path};
use crate::errors::{ComposerError, Result};
use crate::exec::Launcher;
use crate::fs::{FileSystem, RealFileSystem};
use crate::lifecycle::{EventEmitter, Subscription};

/// Fired whenever a context installs a new settings snapshot.
#[derive(Debug, Clone)]
pub struct SettingsChanged {
    pub settings: Arc<ComposerSettings>,
}

/// Fired whenever a context installs a new client.
#[derive(Debug, Clone)]
pub struct ClientChanged {
    pub client: Arc<ComposerClient>,
}

/// Session for one workspace root.
///
/// Settings and client are built on demand by [`ComposerContext::resolve_settings`]
/// and [`ComposerContext::resolve`], and replaced by
/// [`ComposerContext::rebuild`]. Subscribers receive the new instances; they
/// never hold the context itself.
pub struct ComposerContext {
    folder: PathBuf,
    source: Arc<SettingsFile>,
    settings: Option<Arc<ComposerSettings>>,
    client: Option<Arc<ComposerClient>>,
    launcher: Arc<dyn Launcher>,
    fs: Arc<dyn FileSystem>,
    settings_changed: EventEmitter<SettingsChanged>,
    client_changed: EventEmitter<ClientChanged>,
}

impl ComposerContext {
    pub fn new(
        folder: impl Into<PathBuf>,
        source: Arc<SettingsFile>,
        launcher: Arc<dyn Launcher>,
    ) -> Self {
        Self {
            folder: folder.into(),
            source,
            settings: None,
            client: None,
            launcher,
            fs: Arc::new(RealFileSystem),
            settings_changed: EventEmitter::new(),
            client_changed: EventEmitter::new(),
        }
    }

    pub fn with_file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn on_did_change_settings(
        &self,
        listener: impl Fn(&SettingsChanged) + Send + Sync + 'static,
    ) -> Subscription<SettingsChanged> {
        self.settings_changed.subscribe(listener)
    }

    pub fn on_did_change_client(
        &self,
        listener: impl Fn(&ClientChanged) + Send + Sync + 'static,
    ) -> Subscription<ClientChanged> {
        self.client_changed.subscribe(listener)
    }

    /// Current settings snapshot, building it from the settings source on
    /// first use.
    pub fn resolve_settings(&mut self) -> Arc<ComposerSettings> {
        if let Some(settings) = &self.settings {
            return Arc::clone(settings);
        }

        let settings = Arc::new(self.source.scoped(Some(&self.folder)));
        debug!(folder = %self.folder.display(), ?settings, "resolved settings");
        self.settings = Some(Arc::clone(&settings));
        self.settings_changed.fire(&SettingsChanged {
            settings: Arc::clone(&settings),
        });
        settings
    }

    /// The client built so far, without building one.
    pub fn current_client(&self) -> Option<Arc<ComposerClient>> {
        self.client.clone()
    }

    /// Current client, building it on first use.
    ///
    /// Fails with a configuration error when no executable path is set.
    pub fn resolve(&mut self) -> Result<Arc<ComposerClient>> {
        if let Some(client) = &self.client {
            return Ok(Arc::clone(client));
        }

        let settings = self.resolve_settings();
        let Some(executable) = settings.executable_path.clone() else {
            return Err(ComposerError::Configuration(
                "Please set executable_path in your settings in order to access composer features."
                    .to_string(),
            ));
        };

        let working_path = resolve_working_path(&self.folder, settings.working_path.as_deref());
        let client = Arc::new(
            ComposerClient::new(Some(executable), working_path, Arc::clone(&self.launcher))
                .with_encoding(settings.encoding),
        );

        info!(
            folder = %self.folder.display(),
            working_path = %client.working_path().display(),
            "composer client ready"
        );
        self.client = Some(Arc::clone(&client));
        self.client_changed.fire(&ClientChanged {
            client: Arc::clone(&client),
        });
        Ok(client)
    }

    /// Replace the settings source.
    ///
    /// The old snapshot and client are discarded. A new snapshot is installed
    /// straight away; a new client is built straight away only if one existed
    /// before, otherwise on the next [`ComposerContext::resolve`].
    pub fn rebuild(&mut self, source: Arc<SettingsFile>) -> Result<Option<Arc<ComposerClient>>> {
        self.source = source;
        self.settings = None;
        let had_client = self.client.take().is_some();

        self.resolve_settings();
        if had_client {
            self.resolve().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Directory composer runs in for this root.
    pub fn working_path(&mut self) -> PathBuf {
        let settings = self.resolve_settings();
        resolve_working_path(&self.folder, settings.working_path.as_deref())
    }

    /// Canonical path of the project marker, or `None` if there isn't one.
    pub fn composer_json_path(&mut self) -> Option<PathBuf> {
        let candidate = self.working_path().join(PROJECT_MARKER);
        let resolved = self.fs.canonicalize(&candidate).ok()?;
        self.fs.is_file(&resolved).then_some(resolved)
    }

    pub fn is_composer_project(&mut self) -> bool {
        self.composer_json_path().is_some()
    }
}

impl std::fmt::Debug for ComposerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposerContext")
            .field("folder", &self.folder)
            .field("settings", &self.settings)
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}
