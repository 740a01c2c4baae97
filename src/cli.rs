// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::client::Operation;
use crate::config::SettingsLayer;
use crate::types::ExecutionMode;

/// Command-line arguments for `composer-bridge`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "composer-bridge",
    version,
    about = "Run composer commands per workspace root and stream their output.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the settings file (TOML).
    ///
    /// Default: `composer-bridge.toml` in the current working directory.
    /// A missing file means default settings.
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Workspace root. Repeat for several roots; defaults to the current
    /// directory.
    #[arg(long = "workspace", value_name = "DIR")]
    pub workspaces: Vec<PathBuf>,

    /// Root to run against when several workspaces are given.
    #[arg(long, value_name = "DIR")]
    pub folder: Option<PathBuf>,

    /// Composer executable; overrides `executable_path` from settings.
    #[arg(long, value_name = "PATH")]
    pub executable: Option<PathBuf>,

    /// Working directory override; relative paths join the workspace root.
    #[arg(long, value_name = "PATH")]
    pub working_path: Option<PathBuf>,

    /// Output encoding label (e.g. utf-8, windows-1252).
    #[arg(long, value_name = "LABEL")]
    pub encoding: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `COMPOSER_BRIDGE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run one composer operation and exit.
    Exec {
        /// Operation name, e.g. `install`, `require`, `dump-autoload`.
        operation: Operation,

        /// Arguments passed after the operation.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Read `<operation> [args...]` lines from stdin until EOF, reloading
    /// whenever the settings file changes.
    Session,

    /// List the operation catalog.
    Operations {
        /// Only list operations with this mode (run, stream, not-implemented).
        #[arg(long, value_name = "MODE")]
        mode: Option<ExecutionMode>,
    },
}

impl CliArgs {
    /// Settings layer built from the override flags.
    pub fn overrides(&self) -> SettingsLayer {
        SettingsLayer {
            enabled: None,
            executable_path: self.executable.clone(),
            working_path: self.working_path.clone(),
            encoding: self.encoding.clone(),
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exec_keeps_hyphenated_arguments() {
        let args = CliArgs::try_parse_from([
            "composer-bridge",
            "--executable",
            "/usr/bin/composer",
            "exec",
            "require",
            "--dev",
            "phpunit/phpunit",
        ])
        .unwrap();

        match args.command {
            Command::Exec { operation, args } => {
                assert_eq!(operation, Operation::Require);
                assert_eq!(args, vec!["--dev", "phpunit/phpunit"]);
            }
            other => panic!("expected exec, got {other:?}"),
        }
    }

    #[test]
    fn overrides_carry_flags() {
        let args = CliArgs::try_parse_from([
            "composer-bridge",
            "--working-path",
            "app",
            "--encoding",
            "latin1",
            "session",
        ])
        .unwrap();

        let layer = args.overrides();
        assert_eq!(layer.working_path, Some(PathBuf::from("app")));
        assert_eq!(layer.encoding.as_deref(), Some("latin1"));
        assert_eq!(layer.executable_path, None);
    }

    #[test]
    fn unknown_operation_is_a_parse_error() {
        assert!(CliArgs::try_parse_from(["composer-bridge", "exec", "frobnicate"]).is_err());
    }
}
