//! Metadata Reconciler: ledger record plus off-chain document to
//! certificate details.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use certum_store::{fetch_metadata, ContentStore};
use certum_types::{CertificateDetails, LedgerRecord, MetadataDocument, TraitName};

use crate::MetadataError;

/// Loads the metadata document a record points at.
///
/// Never fails: when the document cannot be loaded the details fall back
/// to the on-ledger name and the declared trait defaults, and are flagged
/// `degraded`.
pub struct MetadataReconciler<S: ContentStore> {
    store: Arc<S>,
    timeout: Duration,
}

impl<S: ContentStore> MetadataReconciler<S> {
    pub fn new(store: Arc<S>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub async fn reconcile(&self, record: &LedgerRecord) -> CertificateDetails {
        match self.load(record).await {
            Ok(document) => from_document(record, &document),
            Err(error) => {
                warn!(ledger_id = %record.ledger_id, %error, "metadata unavailable, using defaults");
                degraded(record, &error)
            }
        }
    }

    async fn load(&self, record: &LedgerRecord) -> Result<MetadataDocument, MetadataError> {
        if let Some(embedded) = &record.embedded_metadata {
            match serde_json::from_str::<MetadataDocument>(embedded) {
                Ok(document) => return Ok(document),
                Err(e) => debug!(error = %e, "embedded metadata unusable, fetching"),
            }
        }
        if record.metadata_uri.trim().is_empty() {
            return Err(MetadataError::MissingUri);
        }
        Ok(fetch_metadata(self.store.as_ref(), &record.metadata_uri, self.timeout).await?)
    }
}

fn from_document(record: &LedgerRecord, document: &MetadataDocument) -> CertificateDetails {
    let name = if document.name.trim().is_empty() {
        record.name.clone()
    } else {
        document.name.clone()
    };
    CertificateDetails {
        ledger_id: record.ledger_id.clone(),
        name,
        description: Some(document.description.clone()).filter(|d| !d.is_empty()),
        image: document.image_reference.clone(),
        serial: document.trait_or_default(TraitName::Serial),
        category: document.trait_or_default(TraitName::Category),
        issuing_authority: record.issuing_authority.clone(),
        metadata_uri: record.metadata_uri.clone(),
        mutable: record.mutable,
        degraded: false,
        degraded_reason: None,
    }
}

fn degraded(record: &LedgerRecord, error: &MetadataError) -> CertificateDetails {
    CertificateDetails {
        ledger_id: record.ledger_id.clone(),
        name: record.name.clone(),
        description: None,
        image: None,
        serial: TraitName::Serial.default_value().to_string(),
        category: TraitName::Category.default_value().to_string(),
        issuing_authority: record.issuing_authority.clone(),
        metadata_uri: record.metadata_uri.clone(),
        mutable: record.mutable,
        degraded: true,
        degraded_reason: Some(error.to_string()),
    }
}
