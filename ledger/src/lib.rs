//! Ledger access for certum.
//!
//! - [`LedgerRpc`]: the read side of the ledger (accounts, token records,
//!   signature status), implemented over Solana JSON-RPC by
//!   [`SolanaRpcClient`].
//! - [`LedgerLookup`]: resolves a canonical identifier into a certificate
//!   record, separating genuine absence from missing certificate structure
//!   and from transport faults.
//! - [`TransactionSigner`]: the delegated signing capability. The engine
//!   never holds a brand's key; [`RemoteSigner`] bridges to an external
//!   wallet service.
//! - [`LedgerAnchor`]: submits exactly one token-creation transaction and
//!   waits for confirmation.

pub mod anchor;
pub mod error;
pub mod lookup;
pub mod rpc;
pub mod signer;
pub mod solana;
pub mod token_metadata;

pub use anchor::{AnchorConfig, AnchorRequest, Anchored, LedgerAnchor};
pub use error::{AnchorError, LookupError, RpcError, SignerError};
pub use lookup::LedgerLookup;
pub use rpc::{LedgerRpc, RawAccount, SignatureState};
pub use signer::{RemoteSigner, Submission, TokenCreation, TransactionSigner};
pub use solana::{Commitment, SolanaRpcClient};
pub use token_metadata::{TokenMetadata, TokenMetadataError, MAX_NAME_LEN, MAX_SYMBOL_LEN, MAX_URI_LEN};
