use thiserror::Error;

use certum_store::FetchError;

use crate::VerificationPhase;

/// The input does not name a ledger identifier in any accepted form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Invalid Product ID format.")]
    InvalidIdentifierFormat { input: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClassifierError {
    /// A verdict was already reached; re-verification needs a new request.
    #[error("verification already concluded as {0:?}")]
    AlreadyTerminal(VerificationPhase),
}

/// Why a record's metadata document could not be loaded.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("record carries no metadata uri")]
    MissingUri,

    #[error(transparent)]
    Fetch(#[from] FetchError),
}
