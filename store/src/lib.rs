//! Content-addressed publishing for certum.
//!
//! Every content store backend (Pinata/IPFS over HTTP, in-memory for
//! testing) implements [`ContentStore`]. The rest of the codebase goes
//! through [`Publisher`] for writes and [`fetch_metadata`] for reads, both
//! of which bound every call with a timeout.

pub mod asset;
pub mod error;
pub mod pinata;
pub mod publisher;

use async_trait::async_trait;

use certum_types::Published;

pub use asset::ImageAsset;
pub use error::{FetchError, PublishError, StoreError};
pub use pinata::{PinataConfig, PinataStore};
pub use publisher::{fetch_metadata, metadata_file_name, Publisher};

/// A content-addressed store: content goes in, a content identifier comes out.
///
/// Publishing byte-identical content twice must yield identifiers that
/// resolve to byte-identical content.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Publish raw bytes (an image or other asset).
    async fn publish_bytes(&self, bytes: Vec<u8>, file_name: &str)
        -> Result<Published, StoreError>;

    /// Publish a JSON document.
    async fn publish_json(
        &self,
        document: &serde_json::Value,
        name: &str,
    ) -> Result<Published, StoreError>;

    /// Fetch the bytes behind a URI returned by a publish call (or any
    /// other URI the backend knows how to resolve).
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, StoreError>;
}
