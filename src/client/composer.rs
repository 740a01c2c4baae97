// src/client/composer.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::client::args::rewrite_args;
use crate::client::catalog::Operation;
use crate::errors::{ComposerError, ComposerErrorCode, Result};
use crate::exec::{
    CancelSignal, ExecutionOptions, ExecutionResult, Invocation, Launcher, OutputChunk,
    ProgressFn, TextEncoding,
};
use crate::lifecycle::{EventEmitter, Subscription};
use crate::types::ExecutionMode;

/// Client bound to one executable and one working directory.
///
/// Every operation ends up in [`ComposerClient::run`] or
/// [`ComposerClient::stream`]. Header lines, streamed chunks and results are
/// published on the output emitter; subscribe with
/// [`ComposerClient::on_output`].
pub struct ComposerClient {
    executable_path: Option<PathBuf>,
    working_path: PathBuf,
    encoding: TextEncoding,
    env: BTreeMap<String, String>,
    launcher: Arc<dyn Launcher>,
    output: EventEmitter<String>,
}

impl ComposerClient {
    pub fn new(
        executable_path: Option<PathBuf>,
        working_path: impl Into<PathBuf>,
        launcher: Arc<dyn Launcher>,
    ) -> Self {
        Self {
            executable_path,
            working_path: working_path.into(),
            encoding: TextEncoding::default(),
            env: BTreeMap::new(),
            launcher,
            output: EventEmitter::new(),
        }
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Variables added to every spawn. They win over per-call variables.
    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }

    pub fn executable_path(&self) -> Option<&Path> {
        self.executable_path.as_deref()
    }

    pub fn working_path(&self) -> &Path {
        &self.working_path
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Listen to everything this client writes to its output log.
    pub fn on_output(
        &self,
        listener: impl Fn(&String) + Send + Sync + 'static,
    ) -> Subscription<String> {
        self.output.subscribe(listener)
    }

    fn log(&self, text: impl Into<String>) {
        self.output.fire(&text.into());
    }

    /// Per-call options pre-filled with this client's directory and encoding.
    pub fn default_options(&self) -> ExecutionOptions {
        ExecutionOptions {
            working_directory: self.working_path.clone(),
            encoding: self.encoding,
            ..ExecutionOptions::default()
        }
    }

    /// Execute a catalog operation with the caller's extra arguments.
    pub async fn execute(&self, operation: Operation, args: &[String]) -> Result<ExecutionResult> {
        self.execute_with(operation, args, self.default_options(), None)
            .await
    }

    /// Like [`ComposerClient::execute`], with explicit options and an
    /// optional cancellation signal.
    pub async fn execute_with(
        &self,
        operation: Operation,
        args: &[String],
        options: ExecutionOptions,
        cancel: Option<CancelSignal>,
    ) -> Result<ExecutionResult> {
        let command_line = operation.command_line(args);
        match operation.mode() {
            ExecutionMode::NotImplemented => {
                Err(ComposerError::NotImplemented(operation.name().to_string()))
            }
            ExecutionMode::Run => self.run(command_line, options, cancel).await,
            ExecutionMode::Stream => self.stream(command_line, options, cancel).await,
        }
    }

    /// Run to completion, then log diagnostics (on failure or when present)
    /// or the primary output.
    pub async fn run(
        &self,
        args: Vec<String>,
        options: ExecutionOptions,
        cancel: Option<CancelSignal>,
    ) -> Result<ExecutionResult> {
        let log = !options.suppress_logging;
        let result = self.launch(args, options, cancel, None).await?;

        if log {
            let failed = result.exit_code.is_some_and(|code| code != 0);
            if failed || !result.stderr.is_empty() {
                self.log(format!("{}\n", result.stderr));
            } else {
                self.log(format!("{}\n", result.stdout));
            }
        }

        Ok(result)
    }

    /// Run while forwarding every output chunk to the log as it arrives.
    pub async fn stream(
        &self,
        args: Vec<String>,
        options: ExecutionOptions,
        cancel: Option<CancelSignal>,
    ) -> Result<ExecutionResult> {
        let log = !options.suppress_logging;
        let progress: ProgressFn = if log {
            let output = self.output.clone();
            Arc::new(move |chunk: &OutputChunk| output.fire(&chunk.text))
        } else {
            Arc::new(|_: &OutputChunk| {})
        };

        let result = self.launch(args, options, cancel, Some(progress)).await?;

        if log {
            self.log("\n");
        }
        Ok(result)
    }

    async fn launch(
        &self,
        args: Vec<String>,
        mut options: ExecutionOptions,
        cancel: Option<CancelSignal>,
        progress: Option<ProgressFn>,
    ) -> Result<ExecutionResult> {
        let Some(program) = self.executable_path.clone() else {
            return Err(ComposerError::Configuration(
                "Composer could not be found in the system.".to_string(),
            ));
        };

        // Per-call variables first, then the client's own on top.
        options
            .extra_env
            .extend(self.env.iter().map(|(k, v)| (k.clone(), v.clone())));

        if !options.suppress_logging {
            self.log(format!(
                "Working Directory: {}\n",
                options.working_directory.display()
            ));
            self.log(format!("Executing: composer {}\n\n", args.join(" ")));
        }

        let args = rewrite_args(&args);
        info!(
            program = %program.display(),
            args = ?args,
            streaming = progress.is_some(),
            "executing composer"
        );

        let result = self
            .launcher
            .launch(
                Invocation {
                    program,
                    args,
                    options,
                    cancel,
                },
                progress,
            )
            .await?;

        debug!(
            exit_code = ?result.exit_code,
            code = ?ComposerErrorCode::from_stderr(&result.stderr),
            "composer finished"
        );
        Ok(result)
    }

    /// Short information about Composer.
    pub async fn about(&self) -> Result<ExecutionResult> {
        self.execute(Operation::About, &[]).await
    }

    /// Create an archive of this composer package.
    pub async fn archive(&self, args: &[String]) -> Result<ExecutionResult> {
        self.execute(Operation::Archive, args).await
    }

    /// Open the package's repository URL or homepage in a browser.
    pub async fn browse(&self) -> Result<ExecutionResult> {
        self.execute(Operation::Browse, &[]).await
    }

    /// Clear composer's internal package cache.
    pub async fn clear_cache(&self) -> Result<ExecutionResult> {
        self.execute(Operation::ClearCache, &[]).await
    }

    pub async fn config(&self) -> Result<ExecutionResult> {
        self.execute(Operation::Config, &[]).await
    }

    pub async fn create_project(&self) -> Result<ExecutionResult> {
        self.execute(Operation::CreateProject, &[]).await
    }

    pub async fn depends(&self, package: &str) -> Result<ExecutionResult> {
        self.execute(Operation::Depends, &[package.to_string()])
            .await
    }

    /// Diagnose the system to identify common errors.
    pub async fn diagnose(&self) -> Result<ExecutionResult> {
        self.execute(Operation::Diagnose, &[]).await
    }

    pub async fn dump_autoload(&self, args: &[String]) -> Result<ExecutionResult> {
        self.execute(Operation::DumpAutoload, args).await
    }

    /// Display help for a composer command.
    pub async fn help(&self, command: &str) -> Result<ExecutionResult> {
        self.execute(Operation::Help, &[command.to_string()]).await
    }

    pub async fn home(&self) -> Result<ExecutionResult> {
        self.execute(Operation::Home, &[]).await
    }

    /// Create a basic composer.json in the working directory.
    pub async fn init(&self, args: &[String]) -> Result<ExecutionResult> {
        self.execute(Operation::Init, args).await
    }

    /// Install dependencies from composer.lock, or composer.json if there is
    /// no lock file.
    pub async fn install(&self) -> Result<ExecutionResult> {
        self.execute(Operation::Install, &[]).await
    }

    pub async fn licenses(&self) -> Result<ExecutionResult> {
        self.execute(Operation::Licenses, &[]).await
    }

    /// Show which packages prevent the given package from being installed.
    pub async fn prohibits(&self, args: &[String]) -> Result<ExecutionResult> {
        self.execute(Operation::Prohibits, args).await
    }

    /// Add packages to composer.json and install them.
    pub async fn require(&self, args: &[String]) -> Result<ExecutionResult> {
        self.execute(Operation::Require, args).await
    }

    pub async fn remove(&self, args: &[String]) -> Result<ExecutionResult> {
        self.execute(Operation::Remove, args).await
    }

    /// Run a script defined in composer.json.
    pub async fn run_script(&self, args: &[String]) -> Result<ExecutionResult> {
        self.execute(Operation::RunScript, args).await
    }

    pub async fn search(&self) -> Result<ExecutionResult> {
        self.execute(Operation::Search, &[]).await
    }

    pub async fn self_update(&self) -> Result<ExecutionResult> {
        self.execute(Operation::SelfUpdate, &[]).await
    }

    /// Show information about packages.
    pub async fn show(&self, args: &[String]) -> Result<ExecutionResult> {
        self.execute(Operation::Show, args).await
    }

    /// List locally modified packages.
    pub async fn status(&self) -> Result<ExecutionResult> {
        self.execute(Operation::Status, &[]).await
    }

    pub async fn suggests(&self) -> Result<ExecutionResult> {
        self.execute(Operation::Suggests, &[]).await
    }

    /// Update dependencies and the lock file.
    pub async fn update(&self) -> Result<ExecutionResult> {
        self.execute(Operation::Update, &[]).await
    }

    /// Validate composer.json and composer.lock.
    pub async fn validate(&self) -> Result<ExecutionResult> {
        self.execute(Operation::Validate, &[]).await
    }

    pub async fn version(&self) -> Result<ExecutionResult> {
        self.execute(Operation::Version, &[]).await
    }

    pub async fn why(&self, package: &str) -> Result<ExecutionResult> {
        self.execute(Operation::Why, &[package.to_string()]).await
    }

    pub async fn why_not(&self, package: &str) -> Result<ExecutionResult> {
        self.execute(Operation::WhyNot, &[package.to_string()])
            .await
    }
}

impl std::fmt::Debug for ComposerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposerClient")
            .field("executable_path", &self.executable_path)
            .field("working_path", &self.working_path)
            .field("encoding", &self.encoding)
            .finish_non_exhaustive()
    }
}
