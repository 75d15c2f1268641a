#![no_main]

use certum_ledger::TokenMetadata;
use libfuzzer_sys::fuzz_target;

// Decoding arbitrary account data never panics; anything that decodes
// re-encodes to a prefix-compatible layout that decodes to the same fields.
fuzz_target!(|data: &[u8]| {
    if let Ok(metadata) = TokenMetadata::decode(data) {
        let encoded = metadata.encode();
        let again = TokenMetadata::decode(&encoded).expect("re-encoded metadata must decode");
        assert_eq!(again.mint, metadata.mint);
        assert_eq!(again.update_authority, metadata.update_authority);
        assert_eq!(again.name, metadata.name);
        assert_eq!(again.uri, metadata.uri);
    }
});
