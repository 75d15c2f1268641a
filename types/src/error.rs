//! Top-level error type shared across crates.

use thiserror::Error;

/// Errors raised while parsing or validating the shared types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CertumError {
    #[error("unknown product category: {0}")]
    UnknownCategory(String),

    #[error("unknown cluster: {0}")]
    UnknownCluster(String),

    #[error("duplicate trait type in attributes: {0}")]
    DuplicateTrait(String),

    #[error("invalid metadata document: {0}")]
    InvalidMetadata(String),
}
