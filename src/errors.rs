// src/errors.rs

//! Crate-wide error taxonomy.
//!
//! Only launch-level problems are errors here. A tool that runs and exits
//! non-zero still produces an `ExecutionResult`; callers inspect
//! `exit_code` to tell success from tool-reported failure.

use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Recognised failure codes attached to launch errors or derived from the
/// tool's diagnostic output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerErrorCode {
    /// The executable (or the directory it was asked to run in) does not exist.
    ToolNotFound,
    /// The tool reported that the working directory is not a project.
    NotAComposerRepository,
    /// The tool could not parse its configuration file.
    BadConfigFile,
}

static NOT_A_REPOSITORY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Not a composer repository").expect("static regex is valid")
});

static BAD_CONFIG_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"bad config file").expect("static regex is valid"));

impl ComposerErrorCode {
    /// Classify the diagnostic text of a finished invocation.
    pub fn from_stderr(stderr: &str) -> Option<Self> {
        if NOT_A_REPOSITORY.is_match(stderr) {
            Some(Self::NotAComposerRepository)
        } else if BAD_CONFIG_FILE.is_match(stderr) {
            Some(Self::BadConfigFile)
        } else {
            None
        }
    }
}

impl fmt::Display for ComposerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ToolNotFound => "ToolNotFound",
            Self::NotAComposerRepository => "NotAComposerRepository",
            Self::BadConfigFile => "BadConfigFile",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum ComposerError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{message}")]
    Launch {
        code: Option<ComposerErrorCode>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("The composer \"{0}\" command is not implemented")]
    NotImplemented(String),

    #[error("The composer \"{0}\" command needs at least one argument")]
    MissingArguments(String),

    #[error("Unknown composer operation: {0}")]
    UnknownOperation(String),

    #[error("Open a folder with a composer project in order to access composer features ({0:?})")]
    ProjectRequired(PathBuf),

    #[error("Please open a workspace folder in order to access composer features.")]
    ContextRequired,

    #[error("Execution was cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Settings watch error: {0}")]
    Notify(#[from] notify::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ComposerError {
    /// Classify a failed spawn.
    ///
    /// "Not found" failures carry [`ComposerErrorCode::ToolNotFound`]; any
    /// other IO error is passed through as an opaque launch failure.
    pub fn launch(program: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::Launch {
                code: Some(ComposerErrorCode::ToolNotFound),
                message: format!("Failed to execute {program} (ENOENT)"),
                source,
            }
        } else {
            Self::Launch {
                code: None,
                message: format!("Failed to execute {program}: {source}"),
                source,
            }
        }
    }

    /// The recognised error code, if any.
    pub fn code(&self) -> Option<ComposerErrorCode> {
        match self {
            Self::Launch { code, .. } => *code,
            _ => None,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ComposerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_spawn_is_classified() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory");
        let err = ComposerError::launch("composer", io);
        assert_eq!(err.code(), Some(ComposerErrorCode::ToolNotFound));
        assert!(err.to_string().contains("ENOENT"));
    }

    #[test]
    fn other_spawn_failures_pass_through() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ComposerError::launch("composer", io);
        assert_eq!(err.code(), None);
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn stderr_classification() {
        assert_eq!(
            ComposerErrorCode::from_stderr("  [InvalidArgumentException]\n  Not a composer repository"),
            Some(ComposerErrorCode::NotAComposerRepository)
        );
        assert_eq!(
            ComposerErrorCode::from_stderr("found a bad config file"),
            Some(ComposerErrorCode::BadConfigFile)
        );
        assert_eq!(ComposerErrorCode::from_stderr("all good"), None);
    }

    #[test]
    fn not_implemented_names_the_operation() {
        let err = ComposerError::NotImplemented("browse".to_string());
        assert_eq!(
            err.to_string(),
            "The composer \"browse\" command is not implemented"
        );
    }
}
