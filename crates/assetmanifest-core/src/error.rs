//! Error types for manifest generation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while scanning, hashing or writing a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Directory traversal failed.
    #[error("Failed to walk {path}: {message}")]
    Walk { path: PathBuf, message: String },

    /// Manifest could not be serialized.
    #[error("Failed to serialize manifest: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
}

impl ManifestError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ManifestError {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize { source }
    }
}

/// Kind of scan warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Permission was denied.
    PermissionDenied,
    /// Error reading a directory listing.
    ReadError,
    /// Error reading metadata.
    MetadataError,
    /// Error hashing file contents.
    HashError,
}

/// Non-fatal warning recorded when a file is skipped under the lenient policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a new scan warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Build a warning from an error that was skipped over.
    pub fn from_error(error: &ManifestError, kind: WarningKind) -> Self {
        let path = match error {
            ManifestError::PermissionDenied { path }
            | ManifestError::NotFound { path }
            | ManifestError::Io { path, .. }
            | ManifestError::NotADirectory { path }
            | ManifestError::Walk { path, .. } => path.clone(),
            _ => PathBuf::new(),
        };
        let kind = match error {
            ManifestError::PermissionDenied { .. } => WarningKind::PermissionDenied,
            _ => kind,
        };
        Self {
            path,
            message: error.to_string(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_error_io() {
        let err = ManifestError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, ManifestError::PermissionDenied { .. }));

        let err = ManifestError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, ManifestError::NotFound { .. }));
        assert!(err.to_string().contains("/test/path"));
    }

    #[test]
    fn test_warning_from_error() {
        let err = ManifestError::io(
            "/assets/mods/a.jar",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let warning = ScanWarning::from_error(&err, WarningKind::HashError);
        assert_eq!(warning.kind, WarningKind::PermissionDenied);
        assert_eq!(warning.path, PathBuf::from("/assets/mods/a.jar"));

        let err = ManifestError::io(
            "/assets/mods/b.jar",
            std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short read"),
        );
        let warning = ScanWarning::from_error(&err, WarningKind::HashError);
        assert_eq!(warning.kind, WarningKind::HashError);
        assert!(warning.message.contains("short read"));
    }
}
