/// Structured error types for patternbook-core.
///
/// Uses `thiserror` for better API surface and error composition.
/// The server binary can still use `anyhow` for convenience, but library
/// consumers get structured, composable errors.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for patternbook-core operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Configuration value could not be parsed
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// A configured directory is missing or not a directory
    #[error("Path not usable: {path:?}: {reason}")]
    BadPath { path: PathBuf, reason: String },
}

/// Result type alias for patternbook-core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Create a bad-path error
    pub fn bad_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::BadPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CoreError::config("ASSET_PORT is not a number");
        assert_eq!(err.to_string(), "Configuration error: ASSET_PORT is not a number");

        let err = CoreError::bad_path("/tmp/uploads", "not a directory");
        assert!(err.to_string().contains("/tmp/uploads"));
    }

    #[test]
    fn io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: CoreError = io_err.into();
        assert!(matches!(err, CoreError::Io { .. }));
    }
}
