use proptest::prelude::*;

use certum_crypto::{decode_base58, encode_base58, IdentifierGrammar};

proptest! {
    /// Any 32-byte key encodes to an identifier the Solana grammar accepts.
    #[test]
    fn encoded_keys_match_solana_grammar(bytes in prop::array::uniform32(0u8..)) {
        let encoded = encode_base58(&bytes);
        prop_assert!(IdentifierGrammar::solana().matches(&encoded));
        prop_assert_eq!(decode_base58(&encoded).unwrap(), bytes.to_vec());
    }

    /// Strings containing a character outside the alphabet never match.
    #[test]
    fn foreign_characters_never_match(
        prefix in "[1-9A-HJ-NP-Za-km-z]{16,20}",
        bad in "[0OIl!/ ?=]",
        suffix in "[1-9A-HJ-NP-Za-km-z]{16,20}",
    ) {
        let candidate = format!("{prefix}{bad}{suffix}");
        prop_assert!(!IdentifierGrammar::solana().matches(&candidate));
    }
}
