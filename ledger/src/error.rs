use thiserror::Error;

use certum_crypto::IdempotencyKey;
use certum_types::{LedgerId, TxSignature};

/// Failures talking to the ledger RPC endpoint.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RpcError {
    #[error("ledger RPC timed out: {0}")]
    Timeout(String),

    #[error("ledger RPC unreachable: {0}")]
    Transport(String),

    #[error("ledger RPC returned HTTP {0}")]
    Http(u16),

    #[error("ledger RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("invalid ledger RPC response: {0}")]
    InvalidResponse(String),

    /// An account exists where a token record should be, but it does not
    /// decode as one.
    #[error("account is not a certificate record: {0}")]
    InvalidRecord(String),
}

impl RpcError {
    /// Transport-level faults that may clear on retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Transport(_) => true,
            Self::Http(status) => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Why a ledger lookup did not produce a certificate record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Nothing exists on the ledger at this identifier.
    #[error("no account {0} on the ledger")]
    NotFound(LedgerId),

    /// The account exists but carries no certificate structure.
    #[error("account {id} exists but has no certificate record: {cause}")]
    RecordMissing { id: LedgerId, cause: String },

    /// The ledger could not be asked; the answer is unknown.
    #[error("ledger lookup for {id} failed: {cause}")]
    Retryable { id: LedgerId, cause: RpcError },
}

/// Failures reported by a [`TransactionSigner`](crate::TransactionSigner).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignerError {
    #[error("no wallet is connected")]
    NotConnected,

    /// The signer refused (user rejection, validation); nothing was sent.
    #[error("signer rejected the transaction: {0}")]
    Rejected(String),

    /// The signer could not be reached; nothing was sent.
    #[error("signer unreachable: {0}")]
    Unreachable(String),

    /// The exchange broke off after the request was handed over; the
    /// transaction may or may not have been broadcast.
    #[error("signer interrupted after submission: {0}")]
    Interrupted(String),
}

impl SignerError {
    /// Whether the transaction may have reached the ledger.
    pub fn may_have_broadcast(&self) -> bool {
        matches!(self, Self::Interrupted(_))
    }
}

/// Issuance-side anchoring failure.
///
/// Only [`AnchorError::Ambiguous`] leaves the ledger state unknown; every
/// other variant means no token was created.
#[derive(Debug, Error)]
pub enum AnchorError {
    #[error("no signing identity is available")]
    SignerUnavailable,

    #[error("invalid token creation request: {0}")]
    InvalidRequest(String),

    #[error("transaction was not submitted: {0}")]
    Rejected(#[source] SignerError),

    #[error("transaction {signature} failed on the ledger: {reason}")]
    Failed {
        signature: TxSignature,
        reason: String,
    },

    /// Submission may have happened but confirmation was never observed.
    /// Must be reconciled against the ledger before any retry.
    #[error("mint outcome unknown (idempotency key {idempotency_key}): {reason}")]
    Ambiguous {
        signature: Option<TxSignature>,
        ledger_id: Option<LedgerId>,
        idempotency_key: IdempotencyKey,
        reason: String,
    },
}

impl AnchorError {
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Ambiguous { .. })
    }
}
