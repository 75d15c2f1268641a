use std::time::Duration;

use thiserror::Error;

/// Failures reported by a [`ContentStore`](crate::ContentStore) backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("content store credentials are missing")]
    MissingCredentials,

    #[error("content store rejected credentials (HTTP {0})")]
    Unauthorized(u16),

    #[error("content not found: {0}")]
    NotFound(String),

    #[error("unsupported content URI: {0}")]
    UnsupportedUri(String),

    #[error("content store request timed out: {0}")]
    Timeout(String),

    #[error("content store unreachable: {0}")]
    Transport(String),

    #[error("content store returned HTTP {status}: {detail}")]
    Http { status: u16, detail: String },

    #[error("invalid content store response: {0}")]
    InvalidResponse(String),
}

impl StoreError {
    /// Whether the same call may succeed if simply repeated.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Transport(_) => true,
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Issuance-side publish failure. Republishing is always safe to retry.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to publish {asset}: {source}")]
    Store {
        asset: String,
        #[source]
        source: StoreError,
    },

    #[error("publishing {asset} timed out after {elapsed:?}")]
    Timeout { asset: String, elapsed: Duration },

    #[error("metadata document is invalid: {0}")]
    InvalidDocument(String),
}

/// Failure to read back a published metadata document.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("fetch failed: {0}")]
    Store(#[from] StoreError),

    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("metadata is not a valid document: {0}")]
    Malformed(String),
}
