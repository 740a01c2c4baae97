// src/workspace/dispatcher.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{error, info, warn};

use crate::client::{ComposerClient, Operation};
use crate::config::{SettingsFile, SettingsLayer, load_or_default};
use crate::context::{ClientChanged, ComposerContext};
use crate::errors::{ComposerError, Result};
use crate::exec::{ExecutionResult, Launcher};
use crate::fs::{FileSystem, RealFileSystem};
use crate::lifecycle::{Disposable, DisposableSet};
use crate::workspace::sink::LogSink;

const COMPLETED_OK: &str = "Command completed successfully.\n";
const COMPLETED_WITH_ERRORS: &str = "Command completed with errors.\n";

/// What a [`Workspace`] is built from.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceOptions {
    /// Workspace roots, one context each.
    pub roots: Vec<PathBuf>,
    /// Settings file; `None` means defaults plus `overrides` only.
    pub settings_path: Option<PathBuf>,
    /// Layer applied over every settings scope (CLI flags).
    pub overrides: SettingsLayer,
}

/// The dispatcher: contexts per root plus the log routing between their
/// clients and the sink.
pub struct Workspace {
    options: WorkspaceOptions,
    launcher: Arc<dyn Launcher>,
    fs: Arc<dyn FileSystem>,
    sink: Arc<dyn LogSink>,
    contexts: BTreeMap<PathBuf, ComposerContext>,
    routes: Arc<Mutex<DisposableSet>>,
}

impl Workspace {
    /// Build a workspace and initialise its contexts.
    pub fn new(
        options: WorkspaceOptions,
        launcher: Arc<dyn Launcher>,
        sink: Arc<dyn LogSink>,
    ) -> Result<Self> {
        Self::with_file_system(options, launcher, sink, Arc::new(RealFileSystem))
    }

    pub fn with_file_system(
        options: WorkspaceOptions,
        launcher: Arc<dyn Launcher>,
        sink: Arc<dyn LogSink>,
        fs: Arc<dyn FileSystem>,
    ) -> Result<Self> {
        let mut workspace = Self {
            options,
            launcher,
            fs,
            sink,
            contexts: BTreeMap::new(),
            routes: Arc::new(Mutex::new(DisposableSet::new())),
        };
        workspace.initialize()?;
        Ok(workspace)
    }

    /// Roots that currently have a context.
    pub fn roots(&self) -> impl Iterator<Item = &Path> {
        self.contexts.keys().map(PathBuf::as_path)
    }

    /// Number of live log-routing registrations.
    pub fn route_count(&self) -> usize {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn load_settings(&self) -> Result<SettingsFile> {
        let file = match &self.options.settings_path {
            Some(path) => load_or_default(path)?,
            None => SettingsFile::default(),
        };
        Ok(file.with_overrides(self.options.overrides.clone()))
    }

    fn initialize(&mut self) -> Result<()> {
        let source = Arc::new(self.load_settings()?);
        self.install(source);
        Ok(())
    }

    /// Replace every context with fresh ones reading from `source`.
    fn install(&mut self, source: Arc<SettingsFile>) {
        self.contexts.clear();
        if !source.scoped(None).enabled {
            info!("composer features disabled by settings");
            return;
        }

        for root in self.options.roots.clone() {
            let context =
                ComposerContext::new(root.clone(), Arc::clone(&source), Arc::clone(&self.launcher))
                    .with_file_system(Arc::clone(&self.fs));

            // Each new client gets its output routed to the sink; the route
            // lives until the next re-initialisation.
            let sink = Arc::clone(&self.sink);
            let routes = Arc::clone(&self.routes);
            let subscription = context.on_did_change_client(move |event: &ClientChanged| {
                let sink = Arc::clone(&sink);
                let route = event.client.on_output(move |text: &String| sink.append(text));
                routes
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(route);
            });
            self.routes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(subscription);

            self.contexts.insert(root, context);
        }

        info!(roots = self.contexts.len(), "workspace initialised");
    }

    /// Drop every context and route, then initialise again from freshly
    /// loaded settings.
    ///
    /// If the settings cannot be loaded the current contexts and routes are
    /// kept and the error is returned.
    pub fn reinitialize(&mut self) -> Result<()> {
        let source = Arc::new(self.load_settings()?);
        let mut previous = std::mem::take(
            &mut *self.routes.lock().unwrap_or_else(PoisonError::into_inner),
        );
        if let Err(e) = previous.release() {
            warn!(error = %e, "failed to release previous log routes");
        }
        self.install(source);
        Ok(())
    }

    /// Run `operation` for `root` (or the only root when `None`), reporting
    /// the outcome to the sink.
    ///
    /// Once the operation reaches a client, a completion marker is appended
    /// whatever the outcome. Requests rejected before that get no marker.
    pub async fn dispatch(
        &mut self,
        root: Option<&Path>,
        operation: Operation,
        args: &[String],
    ) -> Result<ExecutionResult> {
        let client = match self.client_for(root, operation, args) {
            Ok(client) => client,
            Err(e) => {
                self.report_error(operation, &e);
                return Err(e);
            }
        };

        let outcome = client.execute(operation, args).await;
        match &outcome {
            Ok(result) if result.success() => self.sink.append(COMPLETED_OK),
            Ok(_) => self.sink.append(COMPLETED_WITH_ERRORS),
            Err(e) => {
                self.sink.append(COMPLETED_WITH_ERRORS);
                self.report_error(operation, e);
            }
        }
        outcome
    }

    fn client_for(
        &mut self,
        root: Option<&Path>,
        operation: Operation,
        args: &[String],
    ) -> Result<Arc<ComposerClient>> {
        if operation.requires_args() && args.is_empty() {
            return Err(ComposerError::MissingArguments(operation.name().to_string()));
        }

        let context = match root {
            Some(root) => self.contexts.get_mut(root),
            None if self.contexts.len() == 1 => self.contexts.values_mut().next(),
            None => None,
        }
        .ok_or(ComposerError::ContextRequired)?;

        if operation.requires_project() && !context.is_composer_project() {
            return Err(ComposerError::ProjectRequired(context.working_path()));
        }

        context.resolve()
    }

    fn report_error(&self, operation: Operation, error: &ComposerError) {
        error!(%operation, error = %error, "composer command failed");
        self.sink.show_error(&error.to_string());
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = routes.release() {
            warn!(error = %e, "failed to release log routes");
        }
    }
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("options", &self.options)
            .field("contexts", &self.contexts.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
