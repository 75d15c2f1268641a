//! Delegated transaction signing.
//!
//! The engine never holds a brand's private key. Token creation is handed
//! to a [`TransactionSigner`], which builds, signs and broadcasts the
//! transaction and reports back the new mint and the signature.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use certum_crypto::IdempotencyKey;
use certum_types::{LedgerId, TxSignature};

use crate::SignerError;

/// Everything a signer needs to create one certificate token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCreation {
    pub name: String,
    pub symbol: String,
    pub metadata_uri: String,
    pub seller_fee_basis_points: u16,
    pub is_mutable: bool,
    /// The identity that signs and becomes update authority.
    pub authority: LedgerId,
    pub idempotency_key: IdempotencyKey,
}

/// What the signer reports after broadcasting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub signature: TxSignature,
    pub ledger_id: LedgerId,
}

/// A connected wallet able to sign and submit token creations.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    /// The connected identity, or `None` when no wallet is connected.
    fn identity(&self) -> Option<LedgerId>;

    /// Sign and broadcast `creation`. Called at most once per issuance.
    async fn sign_and_submit(&self, creation: &TokenCreation) -> Result<Submission, SignerError>;
}

#[derive(Deserialize)]
struct IdentityResponse {
    address: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    signature: String,
    mint_address: String,
}

/// HTTP bridge to an external wallet service.
///
/// `GET {base}/identity` returns `{"address": ...}`;
/// `POST {base}/sign-and-submit` takes a [`TokenCreation`] and returns
/// `{"signature": ..., "mintAddress": ...}`.
pub struct RemoteSigner {
    http: reqwest::Client,
    base_url: String,
    identity: Option<LedgerId>,
}

impl RemoteSigner {
    /// Connect to the wallet service and read its identity.
    pub async fn connect(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SignerError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SignerError::Unreachable(format!("failed to create HTTP client: {e}")))?;

        let response = http
            .get(format!("{base_url}/identity"))
            .send()
            .await
            .map_err(|e| SignerError::Unreachable(e.to_string()))?;

        let identity = match response.status().as_u16() {
            200..=299 => {
                let body: IdentityResponse = response
                    .json()
                    .await
                    .map_err(|e| SignerError::Unreachable(format!("bad identity response: {e}")))?;
                Some(LedgerId::new(body.address))
            }
            401 | 404 => None,
            status => {
                return Err(SignerError::Unreachable(format!(
                    "identity request returned HTTP {status}"
                )))
            }
        };
        info!(base_url = %base_url, connected = identity.is_some(), "signer bridge ready");

        Ok(Self {
            http,
            base_url,
            identity,
        })
    }

    /// A signer with no connected wallet.
    pub fn disconnected(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            identity: None,
        }
    }
}

#[async_trait]
impl TransactionSigner for RemoteSigner {
    fn identity(&self) -> Option<LedgerId> {
        self.identity.clone()
    }

    async fn sign_and_submit(&self, creation: &TokenCreation) -> Result<Submission, SignerError> {
        if self.identity.is_none() {
            return Err(SignerError::NotConnected);
        }
        debug!(key = %creation.idempotency_key, "submitting token creation");

        let response = self
            .http
            .post(format!("{}/sign-and-submit", self.base_url))
            .header("Idempotency-Key", creation.idempotency_key.as_str())
            .json(creation)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    SignerError::Unreachable(e.to_string())
                } else {
                    SignerError::Interrupted(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_client_error() {
            let detail = response.text().await.unwrap_or_default();
            return Err(SignerError::Rejected(format!("HTTP {}: {detail}", status.as_u16())));
        }
        if !status.is_success() {
            return Err(SignerError::Interrupted(format!("HTTP {}", status.as_u16())));
        }

        let body: SubmitResponse = response
            .json()
            .await
            .map_err(|e| SignerError::Interrupted(format!("unreadable submit response: {e}")))?;
        Ok(Submission {
            signature: TxSignature::new(body.signature),
            ledger_id: LedgerId::new(body.mint_address),
        })
    }
}
