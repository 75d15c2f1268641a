//! The issuance pipeline.

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use certum_crypto::IdempotencyKey;
use certum_ledger::{
    AnchorConfig, AnchorError, AnchorRequest, LedgerAnchor, LedgerLookup, LedgerRpc,
    TransactionSigner,
};
use certum_store::{ContentStore, Publisher};
use certum_types::{LedgerId, Published, TxSignature};
use certum_verification::verification_link;

use crate::assembler::{onchain_name, BrandSubmission, MetadataAssembler};
use crate::reconcile::{reconcile_anchor, MintStatus};
use crate::IssuanceError;

#[derive(Clone, Debug)]
pub struct IssuerConfig {
    pub publish_timeout: Duration,
    pub lookup_timeout: Duration,
    pub anchor: AnchorConfig,
    /// Origin of the verification front end, for deep links.
    pub verify_base_url: String,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            publish_timeout: Duration::from_secs(60),
            lookup_timeout: Duration::from_secs(30),
            anchor: AnchorConfig::default(),
            verify_base_url: "http://localhost:5173".to_string(),
        }
    }
}

/// A certificate that now exists on the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuedCertificate {
    pub ledger_id: LedgerId,
    pub signature: TxSignature,
    pub metadata: Published,
    pub image: Option<Published>,
    pub idempotency_key: IdempotencyKey,
    /// QR payload: the deep link that verifies this certificate.
    pub verification_link: String,
}

pub struct Issuer<S: ContentStore, R: LedgerRpc> {
    publisher: Publisher<S>,
    anchor: LedgerAnchor<R>,
    lookup: LedgerLookup<R>,
    verify_base_url: String,
}

impl<S: ContentStore, R: LedgerRpc> Issuer<S, R> {
    pub fn new(store: Arc<S>, rpc: Arc<R>, config: IssuerConfig) -> Self {
        Self {
            publisher: Publisher::new(store, config.publish_timeout),
            anchor: LedgerAnchor::new(rpc.clone(), config.anchor),
            lookup: LedgerLookup::new(rpc, config.lookup_timeout),
            verify_base_url: config.verify_base_url,
        }
    }

    /// Publish and anchor one certificate, signed by `signer`.
    pub async fn issue(
        &self,
        submission: &BrandSubmission,
        signer: &dyn TransactionSigner,
    ) -> Result<IssuedCertificate, IssuanceError> {
        MetadataAssembler::validate(submission)?;
        if signer.identity().is_none() {
            return Err(IssuanceError::SignerUnavailable);
        }
        info!(name = %submission.name, serial = %submission.serial, "issuing certificate");

        let image = match &submission.image {
            Some(asset) => Some((self.publisher.publish_image(asset).await?, asset.mime_type())),
            None => None,
        };
        let document = MetadataAssembler::assemble(
            submission,
            image.as_ref().map(|(published, mime)| (published, *mime)),
        )?;
        let metadata = self.publisher.publish_metadata(&document).await?;

        let request = AnchorRequest {
            metadata_uri: metadata.uri.clone(),
            display_name: onchain_name(&submission.name),
            serial: submission.serial.trim().to_string(),
        };
        let anchored = self
            .anchor
            .anchor(&request, signer)
            .await
            .map_err(|source| match source {
                AnchorError::SignerUnavailable => IssuanceError::SignerUnavailable,
                source => {
                    if source.is_ambiguous() {
                        warn!(metadata_uri = %metadata.uri, error = %source, "issuance outcome unknown, reconcile before retrying");
                    }
                    IssuanceError::Anchor {
                        metadata_uri: metadata.uri.clone(),
                        source,
                    }
                }
            })?;

        let link = verification_link(&self.verify_base_url, &anchored.ledger_id);
        info!(ledger_id = %anchored.ledger_id, link = %link, "certificate issued");
        Ok(IssuedCertificate {
            ledger_id: anchored.ledger_id,
            signature: anchored.signature,
            metadata,
            image: image.map(|(published, _)| published),
            idempotency_key: anchored.idempotency_key,
            verification_link: link,
        })
    }

    /// Read-only check of what an issuance error left on the ledger.
    pub async fn reconcile(&self, error: &IssuanceError) -> MintStatus {
        match error {
            IssuanceError::Anchor {
                metadata_uri,
                source,
            } => reconcile_anchor(&self.lookup, source, metadata_uri).await,
            _ => MintStatus::NotMinted,
        }
    }
}
