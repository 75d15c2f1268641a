//! Fundamental types for certum product certificates.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! ledger and content identifiers, the certificate metadata document, the
//! on-ledger token record, verification verdicts, clusters and timestamps.

pub mod content;
pub mod error;
pub mod ledger_id;
pub mod metadata;
pub mod network;
pub mod record;
pub mod time;
pub mod verdict;

pub use content::{ContentId, Published};
pub use error::CertumError;
pub use ledger_id::{LedgerId, TxSignature};
pub use metadata::{
    Attribute, MetadataDocument, MetadataFile, MetadataProperties, ProductCategory, TraitName,
};
pub use network::Cluster;
pub use record::LedgerRecord;
pub use time::Timestamp;
pub use verdict::{CertificateDetails, Verdict, VerificationRequest, VerificationStatus};
