//! Certificate verification.
//!
//! A raw input (typed id, scanned QR payload, deep link) flows through four
//! stages:
//! 1. **Resolution**: [`IdentifierResolver`] turns the input into a canonical
//!    ledger identifier, or rejects it without touching the network.
//! 2. **Lookup**: [`certum_ledger::LedgerLookup`] reads the account and its
//!    certificate record.
//! 3. **Reconciliation**: [`MetadataReconciler`] loads the off-chain metadata
//!    document, falling back to declared defaults when it is unreachable.
//! 4. **Classification**: [`VerificationClassifier`] moves from `Pending` to
//!    exactly one of `Genuine`, `Suspicious` or `Invalid`.
//!
//! [`Verifier`] runs the whole pipeline and always produces a [`Verdict`];
//! verification faults never escape as errors.
//!
//! [`Verdict`]: certum_types::Verdict

pub mod classifier;
pub mod error;
pub mod orchestrator;
pub mod reconciler;
pub mod resolver;

pub use classifier::{ClassifierEvent, VerificationClassifier, VerificationPhase};
pub use error::{ClassifierError, MetadataError, ResolveError};
pub use orchestrator::Verifier;
pub use reconciler::MetadataReconciler;
pub use resolver::{verification_link, IdentifierResolver, DEFAULT_QUERY_PARAMS};
