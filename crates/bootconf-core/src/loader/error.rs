//! Configuration loading errors.

use crate::merge::MergeError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Stable error codes for configuration loading.
pub mod codes {
    pub const CONFIG_READ_FAILED: &str = "CONFIG_READ_FAILED";
    pub const CONFIG_PARSE_FAILED: &str = "CONFIG_PARSE_FAILED";
    pub const CONFIG_NOT_AN_OBJECT: &str = "CONFIG_NOT_AN_OBJECT";
    pub const CONFIG_LOADER_UNSUPPORTED: &str = "CONFIG_LOADER_UNSUPPORTED";
    pub const CONFIG_SCRIPT_FAILED: &str = "CONFIG_SCRIPT_FAILED";
    pub const CONFIG_MERGE_FAILED: &str = "CONFIG_MERGE_FAILED";
}

/// Configuration loading error.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Config at {path} must contain an object")]
    NotAnObject { path: PathBuf },

    #[error("No loader available for config at {path}")]
    Unsupported { path: PathBuf },

    #[error("Failed to evaluate config script {path}: {message}")]
    Script { path: PathBuf, message: String },

    #[error("Cannot apply {path}: {source}")]
    Merge {
        path: PathBuf,
        #[source]
        source: MergeError,
    },
}

impl ConfigError {
    /// Get the stable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Read { .. } => codes::CONFIG_READ_FAILED,
            Self::Json { .. } | Self::Yaml { .. } => codes::CONFIG_PARSE_FAILED,
            Self::NotAnObject { .. } => codes::CONFIG_NOT_AN_OBJECT,
            Self::Unsupported { .. } => codes::CONFIG_LOADER_UNSUPPORTED,
            Self::Script { .. } => codes::CONFIG_SCRIPT_FAILED,
            Self::Merge { .. } => codes::CONFIG_MERGE_FAILED,
        }
    }

    pub(crate) fn read(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Read { path, source }
    }
}
