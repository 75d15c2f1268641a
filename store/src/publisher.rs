//! Time-bounded publishing and reading of certificate content.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use certum_types::{MetadataDocument, Published};

use crate::{ContentStore, FetchError, ImageAsset, PublishError};

/// Publishes certificate assets and metadata documents, bounding each call
/// with a timeout so a hung store turns into a retryable error.
pub struct Publisher<S: ContentStore> {
    store: Arc<S>,
    timeout: Duration,
}

impl<S: ContentStore> Publisher<S> {
    pub fn new(store: Arc<S>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Publish the raw product image.
    pub async fn publish_image(&self, image: &ImageAsset) -> Result<Published, PublishError> {
        let asset = format!("image {}", image.file_name);
        let started = Instant::now();
        let call = self
            .store
            .publish_bytes(image.bytes.clone(), &image.file_name);
        let published = self.bounded(&asset, started, call).await?;
        info!(
            cid = %published.cid,
            bytes = image.bytes.len(),
            mime = image.mime_type(),
            "published product image"
        );
        Ok(published)
    }

    /// Publish a metadata document. Documents with duplicate trait types are
    /// refused before reaching the store.
    pub async fn publish_metadata(
        &self,
        document: &MetadataDocument,
    ) -> Result<Published, PublishError> {
        document
            .validate()
            .map_err(|e| PublishError::InvalidDocument(e.to_string()))?;
        let value = serde_json::to_value(document)
            .map_err(|e| PublishError::InvalidDocument(e.to_string()))?;

        let name = metadata_file_name(&document.name);
        let started = Instant::now();
        let call = self.store.publish_json(&value, &name);
        let published = self.bounded(&name, started, call).await?;
        info!(cid = %published.cid, name = %name, "published metadata document");
        Ok(published)
    }

    async fn bounded<F>(
        &self,
        asset: &str,
        started: Instant,
        call: F,
    ) -> Result<Published, PublishError>
    where
        F: std::future::Future<Output = Result<Published, crate::StoreError>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(published)) => {
                debug!(asset, elapsed_ms = started.elapsed().as_millis() as u64, "publish complete");
                Ok(published)
            }
            Ok(Err(source)) => {
                warn!(asset, error = %source, "publish failed");
                Err(PublishError::Store {
                    asset: asset.to_string(),
                    source,
                })
            }
            Err(_) => {
                warn!(asset, timeout_ms = self.timeout.as_millis() as u64, "publish timed out");
                Err(PublishError::Timeout {
                    asset: asset.to_string(),
                    elapsed: started.elapsed(),
                })
            }
        }
    }
}

/// Pin name for a metadata document: whitespace runs become `-`.
pub fn metadata_file_name(product_name: &str) -> String {
    let slug = product_name.split_whitespace().collect::<Vec<_>>().join("-");
    format!("{slug}-metadata.json")
}

/// Fetch and parse the metadata document behind `uri` within `timeout`.
pub async fn fetch_metadata<S: ContentStore + ?Sized>(
    store: &S,
    uri: &str,
    timeout: Duration,
) -> Result<MetadataDocument, FetchError> {
    let bytes = tokio::time::timeout(timeout, store.fetch(uri))
        .await
        .map_err(|_| FetchError::Timeout(timeout))??;
    serde_json::from_slice(&bytes).map_err(|e| FetchError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_collapses_whitespace() {
        assert_eq!(
            metadata_file_name("Solana  Headphones\tV1"),
            "Solana-Headphones-V1-metadata.json"
        );
        assert_eq!(metadata_file_name("Widget"), "Widget-metadata.json");
    }
}
