//! Error types

use std::io;
use std::path::Path;

/// Errors surfaced by encode, decode and run
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("File '{0}' not found")]
    FileNotFound(String),

    #[error("Permission denied accessing '{0}'")]
    PermissionDenied(String),

    #[error("{command} command only accepts .bck files")]
    InvalidFormat { command: String },

    #[error("No interpreter found for '{0}'")]
    NoInterpreterFound(String),

    #[error("Failed to execute with {command}: {reason}")]
    InterpreterLaunch { command: String, reason: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Classify an I/O error raised while accessing `path`.
    ///
    /// Not-found and permission failures name the file; anything else passes
    /// through with its native message.
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Error::FileNotFound(display_name(path)),
            io::ErrorKind::PermissionDenied => Error::PermissionDenied(display_name(path)),
            _ => Error::Io(err),
        }
    }

    /// Whether this error stems from how the tool was invoked
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::InvalidFormat { .. })
    }
}

/// Final path component for user-facing messages
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Result type alias for backlang operations
pub type Result<T> = std::result::Result<T, Error>;
