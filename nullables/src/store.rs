//! Nullable content store: an in-memory, content-addressed blob map.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use certum_crypto::{encode_base58, sha256};
use certum_store::{ContentStore, StoreError};
use certum_types::{ContentId, Published};

/// One recorded call against a [`NullContentStore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreCall {
    PublishBytes { file_name: String },
    PublishJson { name: String },
    Fetch { uri: String },
}

/// An in-memory content-addressed store for testing.
///
/// Identifiers are CIDv0-shaped (`Qm...`, base58 of a SHA-256 multihash),
/// so identical content always yields the identical identifier.
pub struct NullContentStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    calls: Mutex<Vec<StoreCall>>,
    publish_failure: Mutex<Option<StoreError>>,
    fetch_failure: Mutex<Option<StoreError>>,
    delay: Mutex<Option<Duration>>,
}

impl NullContentStore {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            publish_failure: Mutex::new(None),
            fetch_failure: Mutex::new(None),
            delay: Mutex::new(None),
        }
    }

    /// Content identifier the store assigns to `bytes`.
    pub fn content_id(bytes: &[u8]) -> ContentId {
        let digest = sha256(&[bytes]);
        let mut multihash = Vec::with_capacity(34);
        multihash.extend_from_slice(&[0x12, 0x20]);
        multihash.extend_from_slice(&digest);
        ContentId::new(encode_base58(&multihash))
    }

    /// Store bytes directly, bypassing the call log.
    pub fn insert(&self, bytes: Vec<u8>) -> Published {
        let cid = Self::content_id(&bytes);
        self.objects
            .lock()
            .unwrap()
            .insert(cid.as_str().to_string(), bytes);
        published(cid)
    }

    /// Store a JSON document directly, bypassing the call log.
    pub fn insert_json(&self, document: &serde_json::Value) -> Published {
        self.insert(document.to_string().into_bytes())
    }

    /// Fail every publish call with `error` until cleared.
    pub fn fail_publishes(&self, error: StoreError) {
        *self.publish_failure.lock().unwrap() = Some(error);
    }

    /// Fail every fetch call with `error` until cleared.
    pub fn fail_fetches(&self, error: StoreError) {
        *self.fetch_failure.lock().unwrap() = Some(error);
    }

    /// Stall every call by `delay` before answering.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn clear_failures(&self) {
        *self.publish_failure.lock().unwrap() = None;
        *self.fetch_failure.lock().unwrap() = None;
        *self.delay.lock().unwrap() = None;
    }

    /// All calls, in order.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn publish_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| !matches!(c, StoreCall::Fetch { .. }))
            .count()
    }

    pub fn fetch_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, StoreCall::Fetch { .. }))
            .count()
    }

    /// Number of distinct objects held.
    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().unwrap().push(call);
    }

    async fn stall(&self) {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn publish_fault(&self) -> Option<StoreError> {
        self.publish_failure.lock().unwrap().clone()
    }
}

impl Default for NullContentStore {
    fn default() -> Self {
        Self::new()
    }
}

fn published(cid: ContentId) -> Published {
    let uri = format!("ipfs://{cid}");
    Published { cid, uri }
}

/// The CID named by `ipfs://<cid>` or `<gateway>/ipfs/<cid>`.
fn cid_from_uri(uri: &str) -> Option<&str> {
    if let Some(cid) = uri.strip_prefix("ipfs://") {
        return Some(cid);
    }
    uri.rsplit_once("/ipfs/").map(|(_, cid)| cid)
}

#[async_trait]
impl ContentStore for NullContentStore {
    async fn publish_bytes(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> Result<Published, StoreError> {
        self.record(StoreCall::PublishBytes {
            file_name: file_name.to_string(),
        });
        self.stall().await;
        if let Some(error) = self.publish_fault() {
            return Err(error);
        }
        Ok(self.insert(bytes))
    }

    async fn publish_json(
        &self,
        document: &serde_json::Value,
        name: &str,
    ) -> Result<Published, StoreError> {
        self.record(StoreCall::PublishJson {
            name: name.to_string(),
        });
        self.stall().await;
        if let Some(error) = self.publish_fault() {
            return Err(error);
        }
        Ok(self.insert_json(document))
    }

    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, StoreError> {
        self.record(StoreCall::Fetch {
            uri: uri.to_string(),
        });
        self.stall().await;
        let failure = self.fetch_failure.lock().unwrap().clone();
        if let Some(error) = failure {
            return Err(error);
        }
        let cid = cid_from_uri(uri).ok_or_else(|| StoreError::UnsupportedUri(uri.to_string()))?;
        self.objects
            .lock()
            .unwrap()
            .get(cid)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(uri.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn identical_content_gets_identical_id() {
        let store = NullContentStore::new();
        let a = store.publish_bytes(b"png".to_vec(), "a.png").await.unwrap();
        let b = store.publish_bytes(b"png".to_vec(), "b.png").await.unwrap();
        assert_eq!(a.cid, b.cid);
        assert_eq!(store.object_count(), 1);
        assert_eq!(store.publish_count(), 2);
    }

    #[tokio::test]
    async fn fetch_accepts_gateway_and_ipfs_uris() {
        let store = NullContentStore::new();
        let published = store.insert(b"doc".to_vec());
        assert!(published.cid.as_str().starts_with("Qm"));
        let gateway = format!("https://gateway.pinata.cloud/ipfs/{}", published.cid);
        assert_eq!(store.fetch(&published.uri).await.unwrap(), b"doc");
        assert_eq!(store.fetch(&gateway).await.unwrap(), b"doc");
        assert_eq!(store.fetch_count(), 2);
    }

    #[tokio::test]
    async fn scripted_failures_apply_until_cleared() {
        let store = NullContentStore::new();
        store.fail_publishes(StoreError::Transport("down".into()));
        assert!(store.publish_bytes(vec![1], "x").await.is_err());
        store.clear_failures();
        assert!(store.publish_bytes(vec![1], "x").await.is_ok());
    }

    #[tokio::test]
    async fn unknown_content_is_not_found() {
        let store = NullContentStore::new();
        let err = store.fetch("ipfs://QmMissing").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        let err = store.fetch("ftp://elsewhere").await.unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedUri(_)));
    }
}
