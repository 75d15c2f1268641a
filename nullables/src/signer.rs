//! Nullable signer: a wallet that signs locally with deterministic keys.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use certum_crypto::{
    blake2b_256_multi, encode_base58, keypair_from_seed, ledger_id_from_public_key,
    sign_message, KeyPair,
};
use certum_ledger::{SignerError, Submission, TokenCreation, TransactionSigner};
use certum_types::{LedgerId, LedgerRecord, TxSignature};

use crate::NullLedger;

/// A test wallet.
///
/// Each submission derives a fresh mint key from the wallet seed and a
/// counter, so mint ids and signatures are realistic base58 values that
/// repeat across test runs. When attached to a [`NullLedger`] every
/// submission also lands there.
pub struct NullSigner {
    wallet: Option<KeyPair>,
    seed: [u8; 32],
    ledger: Option<Arc<NullLedger>>,
    submissions: Mutex<Vec<TokenCreation>>,
    failure: Mutex<Option<SignerError>>,
}

impl NullSigner {
    /// A connected wallet derived from `seed`.
    pub fn new(seed: [u8; 32]) -> Self {
        Self {
            wallet: Some(keypair_from_seed(&seed)),
            seed,
            ledger: None,
            submissions: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
        }
    }

    /// No wallet connected.
    pub fn disconnected() -> Self {
        Self {
            wallet: None,
            ..Self::new([0; 32])
        }
    }

    /// Land submissions on `ledger`.
    pub fn with_ledger(mut self, ledger: Arc<NullLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// Fail the next submissions with `error` until cleared.
    pub fn fail_with(&self, error: SignerError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn clear_failure(&self) {
        *self.failure.lock().unwrap() = None;
    }

    /// Every creation request received, including failed ones.
    pub fn submissions(&self) -> Vec<TokenCreation> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn submit_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }
}

#[async_trait]
impl TransactionSigner for NullSigner {
    fn identity(&self) -> Option<LedgerId> {
        self.wallet
            .as_ref()
            .map(|kp| ledger_id_from_public_key(&kp.public))
    }

    async fn sign_and_submit(&self, creation: &TokenCreation) -> Result<Submission, SignerError> {
        let nonce = {
            let mut submissions = self.submissions.lock().unwrap();
            submissions.push(creation.clone());
            submissions.len() as u64
        };
        let Some(wallet) = self.wallet.as_ref() else {
            return Err(SignerError::NotConnected);
        };
        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }

        let mint_seed = blake2b_256_multi(&[&self.seed[..], &b"mint"[..], &nonce.to_le_bytes()[..]]);
        let mint = keypair_from_seed(&mint_seed);
        let ledger_id = ledger_id_from_public_key(&mint.public);

        let message = serde_json::to_vec(creation)
            .map_err(|e| SignerError::Rejected(format!("unserialisable request: {e}")))?;
        let signature = sign_message(&message, &wallet.private);
        let signature = TxSignature::new(encode_base58(signature.as_bytes()));

        if let Some(ledger) = &self.ledger {
            ledger.land_submission(
                signature.clone(),
                LedgerRecord {
                    ledger_id: ledger_id.clone(),
                    name: creation.name.clone(),
                    symbol: creation.symbol.clone(),
                    metadata_uri: creation.metadata_uri.clone(),
                    issuing_authority: creation.authority.clone(),
                    mutable: creation.is_mutable,
                    embedded_metadata: None,
                },
            );
        }

        Ok(Submission {
            signature,
            ledger_id,
        })
    }
}
