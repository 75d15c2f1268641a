//! Content identifiers returned by the content-addressed store.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Address under which a published document or asset is retrievable
/// (an IPFS CID for the Pinata-backed store).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The result of a successful publish: the content identifier plus the
/// URI that resolves to the published bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Published {
    pub cid: ContentId,
    pub uri: String,
}
