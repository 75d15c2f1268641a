//! Pinata pinning API client with IPFS gateway reads.
//!
//! - `POST {api}/pinning/pinFileToIPFS` (multipart) publishes raw bytes.
//! - `POST {api}/pinning/pinJSONToIPFS` publishes a JSON document.
//! - Reads go through the configured gateway: `ipfs://<cid>` becomes
//!   `{gateway}/ipfs/<cid>`; plain http(s) URIs are fetched directly.
//!
//! Both pinning calls return `{ "IpfsHash": "<cid>", ... }`.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use certum_types::{ContentId, Published};

use crate::{ContentStore, StoreError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`PinataStore`].
#[derive(Clone, Debug)]
pub struct PinataConfig {
    /// Pinning API base URL, e.g. `https://api.pinata.cloud`.
    pub api_url: String,
    /// Gateway base URL, e.g. `https://gateway.pinata.cloud`.
    pub gateway_url: String,
    /// Bearer JWT. Publishing fails without one; fetching does not need it.
    pub jwt: Option<String>,
    pub timeout: Duration,
}

impl Default for PinataConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.pinata.cloud".to_string(),
            gateway_url: "https://gateway.pinata.cloud".to_string(),
            jwt: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Response body of both pinning endpoints.
#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
    #[serde(rename = "PinSize", default)]
    pin_size: u64,
}

/// [`ContentStore`] backed by Pinata and an IPFS gateway.
#[derive(Clone)]
pub struct PinataStore {
    http: reqwest::Client,
    config: PinataConfig,
}

impl PinataStore {
    pub fn new(config: PinataConfig) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| StoreError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    /// The gateway URI under which `cid` is retrievable.
    pub fn gateway_uri(&self, cid: &ContentId) -> String {
        format!(
            "{}/ipfs/{}",
            self.config.gateway_url.trim_end_matches('/'),
            cid
        )
    }

    /// Map a stored URI onto something fetchable over HTTP.
    pub fn resolve_uri(&self, uri: &str) -> Result<String, StoreError> {
        let trimmed = uri.trim();
        if let Some(rest) = trimmed.strip_prefix("ipfs://") {
            let rest = rest.trim_start_matches("ipfs/");
            if rest.is_empty() {
                return Err(StoreError::UnsupportedUri(uri.to_string()));
            }
            return Ok(format!(
                "{}/ipfs/{}",
                self.config.gateway_url.trim_end_matches('/'),
                rest
            ));
        }
        if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
            return Ok(trimmed.to_string());
        }
        Err(StoreError::UnsupportedUri(uri.to_string()))
    }

    fn jwt(&self) -> Result<&str, StoreError> {
        self.config
            .jwt
            .as_deref()
            .filter(|jwt| !jwt.trim().is_empty())
            .ok_or(StoreError::MissingCredentials)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url.trim_end_matches('/'), path)
    }

    async fn read_pin_response(&self, response: reqwest::Response) -> Result<Published, StoreError> {
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(StoreError::Unauthorized(status.as_u16()));
        }
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("").to_string());
            return Err(StoreError::Http {
                status: status.as_u16(),
                detail,
            });
        }

        let pin: PinResponse = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("failed to parse pin response: {e}")))?;
        if pin.ipfs_hash.is_empty() {
            return Err(StoreError::InvalidResponse("empty IpfsHash".into()));
        }

        let cid = ContentId::new(pin.ipfs_hash);
        debug!(cid = %cid, size = pin.pin_size, "pinned content");
        Ok(Published {
            uri: self.gateway_uri(&cid),
            cid,
        })
    }
}

fn map_send_error(e: reqwest::Error) -> StoreError {
    if e.is_timeout() {
        StoreError::Timeout(e.to_string())
    } else if e.is_connect() {
        StoreError::Transport(format!("connection failed: {e}"))
    } else {
        StoreError::Transport(e.to_string())
    }
}

#[async_trait]
impl ContentStore for PinataStore {
    async fn publish_bytes(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> Result<Published, StoreError> {
        let jwt = self.jwt()?;
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let metadata = serde_json::json!({ "name": file_name }).to_string();
        let form = Form::new()
            .part("file", part)
            .text("pinataMetadata", metadata);

        let response = self
            .http
            .post(self.endpoint("/pinning/pinFileToIPFS"))
            .bearer_auth(jwt)
            .multipart(form)
            .send()
            .await
            .map_err(map_send_error)?;
        self.read_pin_response(response).await
    }

    async fn publish_json(
        &self,
        document: &serde_json::Value,
        name: &str,
    ) -> Result<Published, StoreError> {
        let jwt = self.jwt()?;
        let body = serde_json::json!({
            "pinataContent": document,
            "pinataMetadata": { "name": name },
        });

        let response = self
            .http
            .post(self.endpoint("/pinning/pinJSONToIPFS"))
            .bearer_auth(jwt)
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;
        self.read_pin_response(response).await
    }

    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, StoreError> {
        let url = self.resolve_uri(uri)?;
        let response = self.http.get(&url).send().await.map_err(map_send_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(uri.to_string()));
        }
        if !status.is_success() {
            return Err(StoreError::Http {
                status: status.as_u16(),
                detail: format!("GET {url}"),
            });
        }

        let bytes = response.bytes().await.map_err(map_send_error)?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(jwt: Option<&str>) -> PinataStore {
        PinataStore::new(PinataConfig {
            jwt: jwt.map(str::to_string),
            ..PinataConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn resolves_ipfs_scheme_through_gateway() {
        let s = store(None);
        assert_eq!(
            s.resolve_uri("ipfs://QmHash/meta.json").unwrap(),
            "https://gateway.pinata.cloud/ipfs/QmHash/meta.json"
        );
        assert_eq!(
            s.resolve_uri("ipfs://ipfs/QmHash").unwrap(),
            "https://gateway.pinata.cloud/ipfs/QmHash"
        );
    }

    #[test]
    fn passes_http_uris_through() {
        let s = store(None);
        assert_eq!(
            s.resolve_uri("https://arweave.net/abc").unwrap(),
            "https://arweave.net/abc"
        );
    }

    #[test]
    fn rejects_unknown_schemes() {
        let s = store(None);
        assert!(matches!(
            s.resolve_uri("ftp://host/file"),
            Err(StoreError::UnsupportedUri(_))
        ));
        assert!(matches!(
            s.resolve_uri("ipfs://"),
            Err(StoreError::UnsupportedUri(_))
        ));
    }

    #[test]
    fn gateway_uri_trims_trailing_slash() {
        let s = PinataStore::new(PinataConfig {
            gateway_url: "https://gw.example/".into(),
            ..PinataConfig::default()
        })
        .unwrap();
        assert_eq!(
            s.gateway_uri(&ContentId::new("Qm1")),
            "https://gw.example/ipfs/Qm1"
        );
    }

    #[tokio::test]
    async fn publishing_without_jwt_fails_before_any_request() {
        let s = store(None);
        let err = s.publish_bytes(vec![1, 2, 3], "a.png").await.unwrap_err();
        assert_eq!(err, StoreError::MissingCredentials);

        let blank = store(Some("  "));
        let err = blank
            .publish_json(&serde_json::json!({}), "m.json")
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::MissingCredentials);
    }
}
