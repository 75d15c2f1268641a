//! Raw product image assets.

/// An image supplied by a brand, published before the metadata document
/// that references it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageAsset {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

impl ImageAsset {
    pub fn new(bytes: Vec<u8>, file_name: impl Into<String>) -> Self {
        Self {
            bytes,
            file_name: file_name.into(),
        }
    }

    /// MIME type sniffed from the leading magic bytes; `image/png` when the
    /// format is not recognised.
    pub fn mime_type(&self) -> &'static str {
        let b = self.bytes.as_slice();
        if b.starts_with(&[0x89, b'P', b'N', b'G']) {
            "image/png"
        } else if b.starts_with(&[0xFF, 0xD8, 0xFF]) {
            "image/jpeg"
        } else if b.starts_with(b"GIF87a") || b.starts_with(b"GIF89a") {
            "image/gif"
        } else if b.len() >= 12 && &b[..4] == b"RIFF" && &b[8..12] == b"WEBP" {
            "image/webp"
        } else {
            "image/png"
        }
    }
}
