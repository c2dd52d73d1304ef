//! Error taxonomy for logger construction and file rotation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by logkit.
///
/// Only construction-time errors reach callers of the factory; per-write and
/// backup cleanup failures are reported on the logger's error output.
#[derive(Debug, Error)]
pub enum LogError {
    /// The active log file could not be opened or created.
    #[error("failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Renaming or recreating the active file failed during rotation.
    #[error("failed to rotate log file {path}: {source}")]
    Rotate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A single write is larger than the configured maximum file size.
    #[error("write length {len} exceeds maximum file size {max}")]
    WriteTooLarge { len: u64, max: u64 },

    /// `global::init` or `global::set` was called more than once.
    #[error("global logger already initialized")]
    AlreadyInitialized,

    /// A global tracing subscriber was already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<LogError> for io::Error {
    fn from(err: LogError) -> Self {
        let kind = match &err {
            LogError::Io(e) => return io::Error::new(e.kind(), e.to_string()),
            LogError::Open { source, .. } | LogError::Rotate { source, .. } => source.kind(),
            _ => io::ErrorKind::Other,
        };
        io::Error::new(kind, err.to_string())
    }
}
