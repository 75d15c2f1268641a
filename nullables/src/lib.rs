//! Nullable infrastructure for deterministic testing.
//!
//! Every external collaborator of the certificate engine (content store,
//! ledger RPC, wallet signer) sits behind a trait. This crate provides
//! in-memory implementations that:
//! - Return deterministic values
//! - Count and record every call for assertions
//! - Can be scripted to fail or stall on demand
//! - Never touch the network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod ledger;
pub mod signer;
pub mod store;

pub use ledger::NullLedger;
pub use signer::NullSigner;
pub use store::{NullContentStore, StoreCall};
