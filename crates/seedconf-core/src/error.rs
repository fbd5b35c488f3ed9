//! Error types for seedconf-core

use std::path::PathBuf;

/// Result type for seedconf-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The team's layered settings file does not exist
    #[error("Settings file not found at {path}")]
    SettingsNotFound { path: PathBuf },

    /// Remote source kind is not one of the supported backends
    #[error("Unsupported remote source: {kind}")]
    UnsupportedSource { kind: String },

    /// A parameter required by the selected remote kind is absent or empty
    #[error("Remote source {kind} requires parameter '{parameter}'")]
    MissingParameter { kind: String, parameter: String },

    #[error("Invalid team key '{key}': {reason}")]
    InvalidTeamKey { key: String, reason: String },

    #[error("Invalid environment name '{name}'")]
    InvalidEnvironment { name: String },

    /// A section of a layered file exists but is not a mapping
    #[error("Section '{section}' in {path} is not a table")]
    InvalidSection { path: PathBuf, section: String },

    /// A structured file parsed, but its top level is not a mapping
    #[error("Expected a table at the top level of {path}")]
    NotATable { path: PathBuf },

    /// Only the vault backend accepts writes
    #[error("Remote source {kind} does not support writing secrets")]
    RemoteWriteUnsupported { kind: String },

    /// A remote backend call failed
    #[error("Remote source {kind} failed: {message}")]
    Remote { kind: String, message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from seedconf-fs
    #[error(transparent)]
    Fs(#[from] seedconf_fs::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn remote(kind: impl std::fmt::Display, message: impl Into<String>) -> Self {
        Self::Remote {
            kind: kind.to_string(),
            message: message.into(),
        }
    }

    /// Whether a caller-side retry could plausibly succeed.
    ///
    /// Remote calls and raw I/O are transient; configuration mistakes, missing
    /// settings files and parse failures are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Remote { .. } | Self::Io(_) => true,
            Self::Fs(seedconf_fs::Error::Io { source, .. }) => !matches!(
                source.kind(),
                std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied
            ),
            Self::Fs(seedconf_fs::Error::LockFailed { .. }) => true,
            _ => false,
        }
    }
}
