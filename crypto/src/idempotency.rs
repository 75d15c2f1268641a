//! Deterministic issuance idempotency keys.
//!
//! The same authority issuing the same serial always yields the same key, so
//! a signer bridge (or an operator reconciling an ambiguous mint) can tell a
//! retry from a new certificate.

use serde::{Deserialize, Serialize};
use std::fmt;

use certum_types::LedgerId;

use crate::hash::blake2b_256_multi;

/// `hex(Blake2b-256(authority ‖ 0x00 ‖ serial))`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    pub fn derive(authority: &LedgerId, serial: &str) -> Self {
        let digest = blake2b_256_multi(&[
            authority.as_str().as_bytes(),
            &[0u8],
            serial.trim().as_bytes(),
        ]);
        Self(hex::encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_same_key() {
        let brand = LedgerId::new("BrandWallet111");
        assert_eq!(
            IdempotencyKey::derive(&brand, "W-1"),
            IdempotencyKey::derive(&brand, " W-1 ")
        );
    }

    #[test]
    fn separator_prevents_ambiguous_concatenation() {
        let a = IdempotencyKey::derive(&LedgerId::new("ab"), "c");
        let b = IdempotencyKey::derive(&LedgerId::new("a"), "bc");
        assert_ne!(a, b);
    }

    #[test]
    fn key_is_64_hex_chars() {
        let key = IdempotencyKey::derive(&LedgerId::new("x"), "y");
        assert_eq!(key.as_str().len(), 64);
        assert!(key.as_str().bytes().all(|c| c.is_ascii_hexdigit()));
    }
}
