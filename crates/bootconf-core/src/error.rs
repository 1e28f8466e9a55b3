use crate::loader::ConfigError;
use crate::merge::MergeError;
use crate::resolver::ResolveError;
use thiserror::Error;

/// Core error type for bootconf operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Stable error code of the underlying failure.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Resolve(e) => e.code(),
            Self::Merge(e) => e.code(),
            Self::Config(e) => e.code(),
        }
    }
}
