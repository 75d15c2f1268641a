//! Solana JSON-RPC client.
//!
//! Wraps `reqwest::Client` with the cluster's RPC URL and provides the
//! three reads certificate handling needs: `getAccountInfo` for mints and
//! token-metadata accounts, and `getSignatureStatuses` for confirmation.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

use certum_crypto::{base58::decode_base58_fixed, encode_base58, metadata_account, METADATA_PROGRAM_ID};
use certum_types::{LedgerId, LedgerRecord, TxSignature};

use crate::rpc::{LedgerRpc, RawAccount, SignatureState};
use crate::token_metadata::TokenMetadata;
use crate::RpcError;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Commitment level for reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::Confirmed => "confirmed",
            Self::Finalized => "finalized",
        }
    }
}

/// JSON-RPC client for a Solana cluster.
pub struct SolanaRpcClient {
    http: reqwest::Client,
    rpc_url: String,
    commitment: Commitment,
    next_id: AtomicU64,
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct AccountInfoResult {
    value: Option<AccountValue>,
}

#[derive(Debug, Deserialize)]
struct AccountValue {
    /// `[payload, encoding]`
    data: (String, String),
    executable: bool,
    lamports: u64,
    owner: String,
}

#[derive(Debug, Deserialize)]
struct SignatureStatusesResult {
    value: Vec<Option<SignatureStatusValue>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignatureStatusValue {
    #[serde(default)]
    err: Option<serde_json::Value>,
    #[serde(default)]
    confirmation_status: Option<String>,
}

impl SolanaRpcClient {
    /// Create a client for `rpc_url` (e.g. `https://api.devnet.solana.com`).
    pub fn new(
        rpc_url: impl Into<String>,
        commitment: Commitment,
        timeout: Duration,
    ) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| RpcError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            rpc_url: rpc_url.into(),
            commitment,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Send a JSON-RPC request and return the `result` field.
    async fn rpc_call(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!(method, id, "ledger rpc call");

        let response = self
            .http
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RpcError::Timeout(format!("{method}: {e}"))
                } else {
                    RpcError::Transport(format!("{method}: {e}"))
                }
            })?;

        if !response.status().is_success() {
            return Err(RpcError::Http(response.status().as_u16()));
        }

        let envelope: RpcEnvelope = response
            .json()
            .await
            .map_err(|e| RpcError::InvalidResponse(format!("{method}: {e}")))?;

        if let Some(err) = envelope.error {
            return Err(RpcError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        envelope
            .result
            .ok_or_else(|| RpcError::InvalidResponse(format!("{method}: missing result")))
    }

    /// `getAccountInfo` for a base58 address.
    async fn fetch_account(&self, address: &str) -> Result<Option<RawAccount>, RpcError> {
        let result = self
            .rpc_call(
                "getAccountInfo",
                serde_json::json!([
                    address,
                    { "encoding": "base64", "commitment": self.commitment.as_str() }
                ]),
            )
            .await?;

        let info: AccountInfoResult = serde_json::from_value(result)
            .map_err(|e| RpcError::InvalidResponse(format!("getAccountInfo: {e}")))?;
        let Some(value) = info.value else {
            return Ok(None);
        };

        let (payload, encoding) = value.data;
        if encoding != "base64" {
            return Err(RpcError::InvalidResponse(format!(
                "unexpected account encoding {encoding}"
            )));
        }
        let data = BASE64
            .decode(payload.as_bytes())
            .map_err(|e| RpcError::InvalidResponse(format!("account data: {e}")))?;

        Ok(Some(RawAccount {
            owner: value.owner,
            lamports: value.lamports,
            data,
            executable: value.executable,
        }))
    }
}

#[async_trait]
impl LedgerRpc for SolanaRpcClient {
    async fn get_account(&self, id: &LedgerId) -> Result<Option<RawAccount>, RpcError> {
        self.fetch_account(id.as_str()).await
    }

    async fn get_token_record(&self, id: &LedgerId) -> Result<Option<LedgerRecord>, RpcError> {
        let mint = decode_base58_fixed::<32>(id.as_str())
            .ok_or_else(|| RpcError::InvalidRecord(format!("{id} is not a 32-byte address")))?;
        let pda = metadata_account(&mint).map_err(|e| RpcError::InvalidRecord(e.to_string()))?;
        let pda = encode_base58(&pda);

        let Some(account) = self.fetch_account(&pda).await? else {
            return Ok(None);
        };
        let program = encode_base58(&METADATA_PROGRAM_ID);
        if account.owner != program {
            return Err(RpcError::InvalidRecord(format!(
                "record account {pda} is owned by {}",
                account.owner
            )));
        }

        let meta = TokenMetadata::decode(&account.data)
            .map_err(|e| RpcError::InvalidRecord(e.to_string()))?;
        if meta.mint != mint {
            return Err(RpcError::InvalidRecord(format!(
                "record account {pda} names a different mint"
            )));
        }

        Ok(Some(LedgerRecord {
            ledger_id: id.clone(),
            name: meta.name,
            symbol: meta.symbol,
            metadata_uri: meta.uri,
            issuing_authority: LedgerId::new(encode_base58(&meta.update_authority)),
            mutable: meta.is_mutable,
            embedded_metadata: None,
        }))
    }

    async fn signature_status(&self, signature: &TxSignature) -> Result<SignatureState, RpcError> {
        let result = self
            .rpc_call(
                "getSignatureStatuses",
                serde_json::json!([[signature.as_str()], { "searchTransactionHistory": true }]),
            )
            .await?;
        let statuses: SignatureStatusesResult = serde_json::from_value(result)
            .map_err(|e| RpcError::InvalidResponse(format!("getSignatureStatuses: {e}")))?;

        let Some(Some(status)) = statuses.value.into_iter().next() else {
            return Ok(SignatureState::Pending);
        };
        Ok(signature_state(status))
    }
}

fn signature_state(status: SignatureStatusValue) -> SignatureState {
    if let Some(err) = status.err.filter(|e| !e.is_null()) {
        return SignatureState::Failed(err.to_string());
    }
    match status.confirmation_status.as_deref() {
        Some("finalized") => SignatureState::Finalized,
        Some("confirmed") => SignatureState::Confirmed,
        _ => SignatureState::Pending,
    }
}
