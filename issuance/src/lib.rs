//! Certificate issuance.
//!
//! Issuance is strictly ordered:
//! 1. the brand's submission is validated and the signer's identity checked,
//! 2. the product image (if any) is published,
//! 3. the metadata document referencing the image is assembled and published,
//! 4. exactly one token-creation transaction is anchored on the ledger.
//!
//! Steps 2 and 3 are safe to repeat. Step 4 is not: an ambiguous anchor
//! failure must go through [`Issuer::reconcile`] before any retry.

pub mod assembler;
pub mod error;
pub mod pipeline;
pub mod reconcile;

pub use assembler::{onchain_name, BrandSubmission, MetadataAssembler};
pub use error::{AssemblyError, IssuanceError};
pub use pipeline::{IssuedCertificate, Issuer, IssuerConfig};
pub use reconcile::{reconcile_anchor, MintStatus};
