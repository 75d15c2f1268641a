//! Ledger identifier grammar.
//!
//! Solana addresses are base58 encodings of 32-byte public keys, 32 to 44
//! characters long. Other deployments (and test ledgers) may use a plain
//! alphanumeric grammar; the grammar is therefore a value, not a constant.

use serde::{Deserialize, Serialize};

use certum_types::LedgerId;

use crate::base58::{decode_base58_fixed, encode_base58};
use crate::keys::PublicKey;

/// Character set an identifier is drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alphabet {
    /// Base58; the decoded value must be exactly 32 bytes.
    Base58,
    /// ASCII letters and digits.
    Alphanumeric,
}

/// The fixed-alphabet, bounded-length grammar of a ledger identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierGrammar {
    pub alphabet: Alphabet,
    pub min_len: usize,
    pub max_len: usize,
}

impl IdentifierGrammar {
    /// Solana address grammar: base58 of a 32-byte key.
    pub fn solana() -> Self {
        Self {
            alphabet: Alphabet::Base58,
            min_len: 32,
            max_len: 44,
        }
    }

    /// ASCII alphanumeric identifiers of `min_len..=max_len` characters.
    pub fn alphanumeric(min_len: usize, max_len: usize) -> Self {
        Self {
            alphabet: Alphabet::Alphanumeric,
            min_len,
            max_len,
        }
    }

    /// Whether `candidate` is a well-formed identifier under this grammar.
    pub fn matches(&self, candidate: &str) -> bool {
        let len = candidate.len();
        if len < self.min_len || len > self.max_len {
            return false;
        }
        match self.alphabet {
            Alphabet::Base58 => decode_base58_fixed::<32>(candidate).is_some(),
            Alphabet::Alphanumeric => candidate.bytes().all(|c| c.is_ascii_alphanumeric()),
        }
    }

    /// Validate and wrap `candidate`.
    pub fn parse(&self, candidate: &str) -> Option<LedgerId> {
        self.matches(candidate).then(|| LedgerId::new(candidate))
    }
}

impl Default for IdentifierGrammar {
    fn default() -> Self {
        Self::solana()
    }
}

/// The ledger identifier naming an Ed25519 public key.
pub fn ledger_id_from_public_key(public_key: &PublicKey) -> LedgerId {
    LedgerId::new(encode_base58(public_key.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::generate_keypair;

    #[test]
    fn solana_grammar_accepts_derived_ids() {
        let kp = generate_keypair();
        let id = ledger_id_from_public_key(&kp.public);
        assert!(IdentifierGrammar::solana().matches(id.as_str()));
    }

    #[test]
    fn solana_grammar_accepts_known_program_ids() {
        let grammar = IdentifierGrammar::solana();
        assert!(grammar.matches("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s"));
        assert!(grammar.matches("11111111111111111111111111111111"));
    }

    #[test]
    fn solana_grammar_rejects_bad_input() {
        let grammar = IdentifierGrammar::solana();
        assert!(!grammar.matches(""));
        assert!(!grammar.matches("not a real id!!"));
        assert!(!grammar.matches("0OIl0OIl0OIl0OIl0OIl0OIl0OIl0OIl"));
        // Right alphabet and length, but decodes to more than 32 bytes.
        assert!(!grammar.matches(&"z".repeat(44)));
    }

    #[test]
    fn alphanumeric_grammar_bounds_length() {
        let grammar = IdentifierGrammar::alphanumeric(4, 8);
        assert!(grammar.matches("6yHknown"));
        assert!(!grammar.matches("6yH"));
        assert!(!grammar.matches("6yHknown1"));
        assert!(!grammar.matches("6yH-nown"));
    }

    #[test]
    fn parse_wraps_valid_ids() {
        let grammar = IdentifierGrammar::alphanumeric(1, 64);
        assert_eq!(grammar.parse("abc"), Some(LedgerId::new("abc")));
        assert_eq!(grammar.parse("a b"), None);
    }
}
