//! Error types for session persistence.

use std::path::PathBuf;

use crate::format::DecodeError;

/// Error type for session persistence operations.
///
/// A missing session file is not an error: `load_session_attributes` returns
/// `Ok(None)` and `clear` returns `Ok(())`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The storage directory is missing or not writable.
    #[error("session storage unavailable at {}: {source}", .path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A session file exists but could not be decoded.
    #[error("corrupted session file {}: {reason}", .path.display())]
    Corrupted {
        path: PathBuf,
        #[source]
        reason: DecodeError,
    },

    /// The domain name cannot be mapped to a file in the storage directory.
    #[error("invalid session domain name: {0:?}")]
    InvalidDomain(String),

    /// Any other filesystem failure.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// NaN or an infinity was given as a float attribute.
    #[error("float attribute must be finite, got {0}")]
    NonFiniteFloat(f64),

    /// An attribute value could not be converted to or from JSON.
    #[error("attribute serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error means the file is present but unreadable as sessions.
    pub fn is_corrupted(&self) -> bool {
        matches!(self, Error::Corrupted { .. })
    }
}

/// Result type for session persistence operations.
pub type Result<T> = std::result::Result<T, Error>;
