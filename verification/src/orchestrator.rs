//! The verification pipeline, end to end.

use std::time::Instant;
use tracing::{debug, info};

use certum_ledger::{LedgerLookup, LedgerRpc, LookupError};
use certum_store::ContentStore;
use certum_types::{Cluster, Timestamp, Verdict, VerificationRequest, VerificationStatus};
use certum_utils::format_millis;

use crate::classifier::{ClassifierEvent, VerificationClassifier};
use crate::reconciler::MetadataReconciler;
use crate::resolver::IdentifierResolver;

/// Runs resolution, lookup, reconciliation and classification for one
/// request at a time. Holds no per-request state, so one instance serves
/// any number of concurrent verifications.
pub struct Verifier<R: LedgerRpc, S: ContentStore> {
    resolver: IdentifierResolver,
    lookup: LedgerLookup<R>,
    reconciler: MetadataReconciler<S>,
    cluster: Cluster,
}

impl<R: LedgerRpc, S: ContentStore> Verifier<R, S> {
    pub fn new(
        resolver: IdentifierResolver,
        lookup: LedgerLookup<R>,
        reconciler: MetadataReconciler<S>,
        cluster: Cluster,
    ) -> Self {
        Self {
            resolver,
            lookup,
            reconciler,
            cluster,
        }
    }

    pub fn resolver(&self) -> &IdentifierResolver {
        &self.resolver
    }

    pub fn cluster(&self) -> Cluster {
        self.cluster
    }

    /// Verify `raw_input`. Always yields a verdict.
    pub async fn verify(&self, raw_input: &str) -> Verdict {
        let started = Instant::now();
        let mut request = VerificationRequest {
            raw_input: raw_input.to_string(),
            resolved_identifier: None,
            timestamp: Timestamp::now(),
        };
        let mut classifier = VerificationClassifier::new();

        let event = match self.resolver.resolve(raw_input) {
            Err(e) => {
                debug!(error = %e, "input rejected before lookup");
                ClassifierEvent::InvalidFormat
            }
            Ok(id) => {
                request.resolved_identifier = Some(id.clone());
                match self.lookup.lookup(&id).await {
                    Ok(record) => {
                        let details = self.reconciler.reconcile(&record).await;
                        ClassifierEvent::Found(Box::new(details))
                    }
                    Err(LookupError::NotFound(id)) => ClassifierEvent::NotFound {
                        id,
                        cluster: self.cluster,
                    },
                    Err(LookupError::RecordMissing { id, cause }) => {
                        ClassifierEvent::RecordMissing { id, cause }
                    }
                    Err(LookupError::Retryable { id, cause }) => ClassifierEvent::LookupFailed {
                        id,
                        cause: cause.to_string(),
                    },
                }
            }
        };

        // A fresh classifier is always pending, so the first event lands.
        let status = classifier
            .apply(event)
            .unwrap_or(VerificationStatus::Suspicious);
        let (_, certificate, diagnostic) = classifier.into_parts();

        let explorer_url = match (&request.resolved_identifier, status) {
            (Some(id), VerificationStatus::Genuine | VerificationStatus::Suspicious) => {
                Some(self.cluster.explorer_url(id.as_str()))
            }
            _ => None,
        };

        info!(
            status = %status,
            ledger_id = request.resolved_identifier.as_ref().map(|id| id.as_str()).unwrap_or("-"),
            degraded = certificate.as_ref().map(|c| c.degraded).unwrap_or(false),
            elapsed = %format_millis(started.elapsed()),
            "verification complete"
        );

        Verdict {
            request,
            status,
            certificate,
            diagnostic,
            explorer_url,
        }
    }
}
