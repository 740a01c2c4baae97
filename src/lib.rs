// src/lib.rs

pub mod cli;
pub mod client;
pub mod config;
pub mod context;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod lifecycle;
pub mod logging;
pub mod types;
pub mod workspace;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::{CliArgs, Command};
use crate::client::Operation;
use crate::config::default_settings_path;
use crate::exec::ProcessLauncher;
use crate::types::ExecutionMode;
use crate::workspace::{
    StdoutSink, Workspace, WorkspaceEvent, WorkspaceOptions, spawn_settings_watcher,
};

/// High-level entry point used by `main.rs`.
///
/// Returns whether the requested work succeeded: for `exec` that is the
/// tool's own exit status, for `session` it is always `true` once input ends.
pub async fn run(args: CliArgs) -> Result<bool> {
    if let Command::Operations { mode } = &args.command {
        print_operations(*mode);
        return Ok(true);
    }

    let settings_path = args.settings.clone().unwrap_or_else(default_settings_path);
    let roots = workspace_roots(&args);
    let options = WorkspaceOptions {
        roots,
        settings_path: Some(settings_path.clone()),
        overrides: args.overrides(),
    };

    let mut workspace = Workspace::new(options, Arc::new(ProcessLauncher), Arc::new(StdoutSink))?;
    let folder = args.folder.as_deref();

    match args.command {
        Command::Exec { operation, args } => {
            let result = workspace.dispatch(folder, operation, &args).await?;
            Ok(result.success())
        }
        Command::Session => {
            run_session(&mut workspace, folder, &settings_path).await?;
            Ok(true)
        }
        Command::Operations { .. } => Ok(true),
    }
}

fn workspace_roots(args: &CliArgs) -> Vec<PathBuf> {
    if args.workspaces.is_empty() {
        vec![std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))]
    } else {
        args.workspaces.clone()
    }
}

/// Session loop: stdin lines and settings changes feed one event channel.
///
/// Commands run one at a time in arrival order.
async fn run_session(
    workspace: &mut Workspace,
    folder: Option<&Path>,
    settings_path: &Path,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<WorkspaceEvent>(64);

    let _watcher = match spawn_settings_watcher(settings_path, tx.clone()) {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "settings changes will not be picked up");
            None
        }
    };

    {
        let tx = tx.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if tx.send(WorkspaceEvent::Command(line)).await.is_err() {
                    return;
                }
            }
            let _ = tx.send(WorkspaceEvent::ShutdownRequested).await;
        });
    }

    // Ctrl-C → graceful shutdown.
    {
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(WorkspaceEvent::ShutdownRequested).await;
        });
    }
    drop(tx);

    info!("session started");
    while let Some(event) = rx.recv().await {
        match event {
            WorkspaceEvent::SettingsChanged => {
                info!("settings changed; re-initialising workspace");
                if let Err(e) = workspace.reinitialize() {
                    warn!(error = %e, "failed to reload settings");
                }
            }
            WorkspaceEvent::Command(line) => {
                let mut words = line.split_whitespace();
                let Some(name) = words.next() else {
                    continue;
                };
                let args: Vec<String> = words.map(str::to_string).collect();
                match name.parse::<Operation>() {
                    // Failures are already reported to the sink.
                    Ok(operation) => {
                        let _ = workspace.dispatch(folder, operation, &args).await;
                    }
                    Err(e) => warn!(error = %e, "ignoring input line"),
                }
            }
            WorkspaceEvent::ShutdownRequested => break,
        }
    }
    debug!("session finished");
    Ok(())
}

fn print_operations(mode: Option<ExecutionMode>) {
    for op in Operation::ALL {
        if mode.is_none_or(|m| m == op.mode()) {
            println!("{:<16} {}", op.name(), op.mode());
        }
    }
}
