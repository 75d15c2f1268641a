#![no_main]

use certum_crypto::base58::{decode_base58, encode_base58};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes encode and decode back unchanged.
    let encoded = encode_base58(data);
    assert_eq!(decode_base58(&encoded).as_deref(), Some(data));

    // Arbitrary text never panics the decoder.
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = decode_base58(text);
    }
});
