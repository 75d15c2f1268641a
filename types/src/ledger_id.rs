//! Ledger identifier and transaction signature types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The address of a minted certificate token on the ledger.
///
/// On Solana this is the base58-encoded mint public key. The type itself
/// performs no validation; grammar checks live in
/// `certum_crypto::IdentifierGrammar` and run before one of these is built
/// from untrusted input.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerId(String);

impl LedgerId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first eight characters, used in human-facing diagnostics.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for LedgerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A submitted transaction's signature, as reported by the signer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxSignature(String);

impl TxSignature {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_truncates_to_eight_chars() {
        let id = LedgerId::new("6yHknownMintAddress");
        assert_eq!(id.short(), "6yHknown");
    }

    #[test]
    fn short_keeps_short_ids_whole() {
        let id = LedgerId::new("abc");
        assert_eq!(id.short(), "abc");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = LedgerId::new("6yHknown");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"6yHknown\"");
    }
}
