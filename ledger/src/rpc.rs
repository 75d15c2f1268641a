//! The read side of the ledger.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use certum_types::{LedgerId, LedgerRecord, TxSignature};

use crate::RpcError;

/// A raw ledger account as returned by `getAccountInfo`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAccount {
    /// Base58 id of the owning program.
    pub owner: String,
    pub lamports: u64,
    pub data: Vec<u8>,
    pub executable: bool,
}

/// Confirmation state of a submitted transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignatureState {
    /// Not yet seen, or seen but below the confirmed commitment.
    Pending,
    Confirmed,
    Finalized,
    /// Landed, but execution failed; nothing was created.
    Failed(String),
}

impl SignatureState {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Finalized)
    }
}

/// Ledger RPC client.
///
/// Not-found is `Ok(None)`; every `Err` is a fault in asking, never an
/// answer about existence.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Fetch the raw account at `id`.
    async fn get_account(&self, id: &LedgerId) -> Result<Option<RawAccount>, RpcError>;

    /// Fetch the structured token record attached to the mint `id`.
    ///
    /// `Ok(None)` when no record account exists. An account that exists but
    /// does not decode as a record is `Err(RpcError::InvalidRecord)`.
    async fn get_token_record(&self, id: &LedgerId) -> Result<Option<LedgerRecord>, RpcError>;

    /// Current status of a submitted transaction.
    async fn signature_status(&self, signature: &TxSignature) -> Result<SignatureState, RpcError>;
}
