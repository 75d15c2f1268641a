use thiserror::Error;

use certum_ledger::AnchorError;
use certum_store::PublishError;

/// The brand's submission cannot become a metadata document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("image is empty")]
    EmptyImage,

    #[error("{0}")]
    InvalidDocument(String),
}

#[derive(Debug, Error)]
pub enum IssuanceError {
    #[error("invalid submission: {0}")]
    InvalidSubmission(#[from] AssemblyError),

    #[error("connect a wallet before issuing")]
    SignerUnavailable,

    #[error(transparent)]
    Publish(#[from] PublishError),

    /// Anchoring failed after the metadata document was published.
    #[error("anchoring {metadata_uri} failed: {source}")]
    Anchor {
        metadata_uri: String,
        #[source]
        source: AnchorError,
    },
}

impl IssuanceError {
    /// Whether a token may exist despite the error.
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Anchor { source, .. } if source.is_ambiguous())
    }

    /// Whether the whole issuance can simply be run again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Publish(_) | Self::SignerUnavailable => true,
            Self::Anchor { source, .. } => !source.is_ambiguous(),
            Self::InvalidSubmission(_) => false,
        }
    }
}
