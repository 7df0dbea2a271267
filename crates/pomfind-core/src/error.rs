//! Error types shared by every pomfind crate.

use thiserror::Error;

/// Failures that can occur while resolving a dependency tree.
///
/// Resolution branches never propagate these past their own boundary: the
/// resolver reports them together with the offending coordinate and keeps
/// traversing sibling branches.
#[derive(Error, Debug)]
pub enum Error {
    #[error("not a valid maven coordinate: '{input}'")]
    InvalidCoordinate { input: String },

    #[error("request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("failed to parse {document}: {message}")]
    DocumentFormat { document: String, message: String },

    #[error("no metadata found: {path}")]
    MetadataNotFound { path: String },

    #[error("no pom found: {path}")]
    PomNotFound { path: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("fetch pool is shut down")]
    PoolClosed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True for errors that only affect a single resolution branch.
    pub fn is_branch_failure(&self) -> bool {
        matches!(
            self,
            Self::Network { .. }
                | Self::DocumentFormat { .. }
                | Self::MetadataNotFound { .. }
                | Self::PomNotFound { .. }
        )
    }
}
