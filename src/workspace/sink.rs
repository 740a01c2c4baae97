// src/workspace/sink.rs

use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{error, warn};

/// Destination for everything composer prints: the "output panel".
///
/// The sink is append-only; nothing ever clears it.
pub trait LogSink: Send + Sync {
    fn append(&self, text: &str);

    /// Surface a failed operation to the user.
    fn show_error(&self, message: &str) {
        error!("{message}");
    }
}

/// Writes to STDOUT. Logs go to STDERR, so this stays clean tool output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn append(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
            warn!(error = %e, "failed to write composer output");
        }
    }
}

/// Collects output in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    text: Arc<Mutex<String>>,
    errors: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.text
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LogSink for MemorySink {
    fn append(&self, text: &str) {
        self.text
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_str(text);
    }

    fn show_error(&self, message: &str) {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}
