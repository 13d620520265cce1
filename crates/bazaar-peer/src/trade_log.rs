//! Append-only trade record files.

use std::io::Write;
use std::path::{Path, PathBuf};

/// An append-only, one-event-per-line text log.
///
/// Record writing is a side effect of trading, never part of the
/// protocol: failures are logged and swallowed so a full disk cannot
/// take a peer down.
#[derive(Debug, Clone)]
pub struct TradeLog {
    path: PathBuf,
}

impl TradeLog {
    /// Creates a log that appends to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the log's file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record line.
    pub fn append(&self, line: &str) {
        let result = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| writeln!(file, "{line}"));
        if let Err(e) = result {
            tracing::warn!(path = %self.path.display(), error = %e, "trade log write failed");
        }
    }
}
