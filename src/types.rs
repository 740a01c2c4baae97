use std::fmt;
use std::str::FromStr;

/// How an operation runs its process.
///
/// - `Run`: collect output to completion, then log it once.
/// - `Stream`: forward output chunks to the log as they arrive.
/// - `NotImplemented`: fail before anything is spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Run,
    Stream,
    NotImplemented,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExecutionMode::Run => "run",
            ExecutionMode::Stream => "stream",
            ExecutionMode::NotImplemented => "not-implemented",
        };
        f.write_str(s)
    }
}

impl FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "run" => Ok(ExecutionMode::Run),
            "stream" => Ok(ExecutionMode::Stream),
            "not-implemented" => Ok(ExecutionMode::NotImplemented),
            other => Err(format!(
                "invalid execution mode: {other} (expected \"run\", \"stream\" or \"not-implemented\")"
            )),
        }
    }
}

/// Which child pipe a chunk of output came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputChannel {
    /// Primary output (stdout).
    Primary,
    /// Diagnostic output (stderr).
    Diagnostic,
}

impl fmt::Display for OutputChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputChannel::Primary => f.write_str("stdout"),
            OutputChannel::Diagnostic => f.write_str("stderr"),
        }
    }
}
