//! The certum engine.
//!
//! Loads [`EngineConfig`], wires the Solana RPC client, the Pinata content
//! store and the verification/issuance pipelines into a
//! [`CertificateEngine`], and serves the HTTP API.

pub mod config;
pub mod engine;
pub mod error;
pub mod tracing_spans;

pub use config::{ContentStoreConfig, EngineConfig};
pub use engine::{CertificateEngine, SolanaEngine};
pub use error::NodeError;
