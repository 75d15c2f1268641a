//! Ledger Anchor: one token-creation transaction per certificate.
//!
//! The anchor is the only step of issuance with an irreversible side
//! effect. It submits exactly once and never retries; any failure after the
//! request may have left the signer is reported as
//! [`AnchorError::Ambiguous`] with enough context to reconcile by hand.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use certum_crypto::IdempotencyKey;
use certum_types::{LedgerId, TxSignature};
use certum_utils::format_millis;

use crate::rpc::{LedgerRpc, SignatureState};
use crate::signer::{TokenCreation, TransactionSigner};
use crate::token_metadata::{MAX_NAME_LEN, MAX_SYMBOL_LEN, MAX_URI_LEN};
use crate::AnchorError;

/// Confirmation behaviour of the anchor.
#[derive(Clone, Debug)]
pub struct AnchorConfig {
    /// How long to wait for confirmation after submission.
    pub confirm_timeout: Duration,
    /// Delay between signature status polls.
    pub poll_interval: Duration,
    /// Token symbol written into every certificate record.
    pub symbol: String,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            confirm_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_millis(500),
            symbol: "CERT".to_string(),
        }
    }
}

/// What to anchor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnchorRequest {
    /// URI of the published metadata document.
    pub metadata_uri: String,
    pub display_name: String,
    /// Product serial; feeds the idempotency key.
    pub serial: String,
}

/// A confirmed token creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Anchored {
    pub ledger_id: LedgerId,
    pub signature: TxSignature,
    pub idempotency_key: IdempotencyKey,
    pub confirmed_in: Duration,
}

pub struct LedgerAnchor<R: LedgerRpc> {
    rpc: Arc<R>,
    config: AnchorConfig,
}

impl<R: LedgerRpc> LedgerAnchor<R> {
    pub fn new(rpc: Arc<R>, config: AnchorConfig) -> Self {
        Self { rpc, config }
    }

    pub fn config(&self) -> &AnchorConfig {
        &self.config
    }

    /// Create the certificate token for `request`, signed by `signer`.
    pub async fn anchor(
        &self,
        request: &AnchorRequest,
        signer: &dyn TransactionSigner,
    ) -> Result<Anchored, AnchorError> {
        let authority = signer.identity().ok_or(AnchorError::SignerUnavailable)?;
        self.validate(request)?;

        let idempotency_key = IdempotencyKey::derive(&authority, &request.serial);
        let creation = TokenCreation {
            name: request.display_name.clone(),
            symbol: self.config.symbol.clone(),
            metadata_uri: request.metadata_uri.clone(),
            seller_fee_basis_points: 0,
            is_mutable: true,
            authority,
            idempotency_key: idempotency_key.clone(),
        };

        let started = Instant::now();
        let submission = match signer.sign_and_submit(&creation).await {
            Ok(submission) => submission,
            Err(e) if e.may_have_broadcast() => {
                warn!(key = %idempotency_key, error = %e, "submission outcome unknown");
                return Err(AnchorError::Ambiguous {
                    signature: None,
                    ledger_id: None,
                    idempotency_key,
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(AnchorError::Rejected(e)),
        };
        info!(
            ledger_id = %submission.ledger_id,
            signature = %submission.signature,
            "token creation submitted"
        );

        let deadline = started + self.config.confirm_timeout;
        let mut last_fault = None;
        loop {
            match self.rpc.signature_status(&submission.signature).await {
                Ok(SignatureState::Failed(reason)) => {
                    warn!(signature = %submission.signature, %reason, "token creation failed");
                    return Err(AnchorError::Failed {
                        signature: submission.signature,
                        reason,
                    });
                }
                Ok(state) if state.is_confirmed() => {
                    let confirmed_in = started.elapsed();
                    info!(
                        ledger_id = %submission.ledger_id,
                        elapsed = %format_millis(confirmed_in),
                        "token creation confirmed"
                    );
                    return Ok(Anchored {
                        ledger_id: submission.ledger_id,
                        signature: submission.signature,
                        idempotency_key,
                        confirmed_in,
                    });
                }
                Ok(_) => debug!(signature = %submission.signature, "awaiting confirmation"),
                Err(e) => {
                    debug!(error = %e, "signature status poll failed");
                    last_fault = Some(e);
                }
            }

            if Instant::now() + self.config.poll_interval > deadline {
                let reason = match last_fault {
                    Some(e) => format!(
                        "not confirmed within {} (last poll error: {e})",
                        format_millis(self.config.confirm_timeout)
                    ),
                    None => format!(
                        "not confirmed within {}",
                        format_millis(self.config.confirm_timeout)
                    ),
                };
                warn!(signature = %submission.signature, %reason, "confirmation timed out");
                return Err(AnchorError::Ambiguous {
                    signature: Some(submission.signature),
                    ledger_id: Some(submission.ledger_id),
                    idempotency_key,
                    reason,
                });
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    fn validate(&self, request: &AnchorRequest) -> Result<(), AnchorError> {
        let checks = [
            ("name", request.display_name.len(), MAX_NAME_LEN),
            ("symbol", self.config.symbol.len(), MAX_SYMBOL_LEN),
            ("uri", request.metadata_uri.len(), MAX_URI_LEN),
        ];
        for (field, len, max) in checks {
            if len > max {
                return Err(AnchorError::InvalidRequest(format!(
                    "{field} is {len} bytes, limit is {max}"
                )));
            }
        }
        if request.metadata_uri.is_empty() {
            return Err(AnchorError::InvalidRequest("metadata uri is empty".into()));
        }
        if request.display_name.trim().is_empty() {
            return Err(AnchorError::InvalidRequest("name is empty".into()));
        }
        Ok(())
    }
}
