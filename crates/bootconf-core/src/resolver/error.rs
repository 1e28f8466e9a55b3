//! Path resolution errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Stable error codes for path resolution.
pub mod codes {
    pub const PATH_NOT_FOUND: &str = "PATH_NOT_FOUND";
    pub const PATH_IO_ERROR: &str = "PATH_IO_ERROR";
}

/// Path resolution error.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The expression did not resolve to anything.
    #[error("Cannot resolve path \"{expression}\"")]
    PathNotFound {
        expression: String,
        /// Candidates probed before giving up (capped).
        tried: Vec<PathBuf>,
    },

    /// A filesystem probe failed for a reason other than "not found".
    #[error("I/O error while resolving \"{expression}\": {source}")]
    Io {
        expression: String,
        #[source]
        source: io::Error,
    },
}

impl ResolveError {
    /// Get the stable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::PathNotFound { .. } => codes::PATH_NOT_FOUND,
            Self::Io { .. } => codes::PATH_IO_ERROR,
        }
    }

    /// The expression that failed to resolve.
    #[must_use]
    pub fn expression(&self) -> &str {
        match self {
            Self::PathNotFound { expression, .. } | Self::Io { expression, .. } => expression,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_quotes_expression() {
        let err = ResolveError::PathNotFound {
            expression: "./missing".to_string(),
            tried: Vec::new(),
        };
        assert_eq!(err.to_string(), "Cannot resolve path \"./missing\"");
        assert_eq!(err.code(), codes::PATH_NOT_FOUND);
        assert_eq!(err.expression(), "./missing");
    }

    #[test]
    fn test_io_keeps_source() {
        let err = ResolveError::Io {
            expression: "boot".to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.code(), codes::PATH_IO_ERROR);
        assert!(std::error::Error::source(&err).is_some());
    }
}
