#![no_main]

use certum_crypto::IdentifierGrammar;
use certum_verification::IdentifierResolver;
use libfuzzer_sys::fuzz_target;

// Resolution of arbitrary scanned input must never panic, and whatever it
// extracts must satisfy the grammar and resolve to itself.
fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    for grammar in [IdentifierGrammar::solana(), IdentifierGrammar::alphanumeric(4, 64)] {
        let resolver = IdentifierResolver::with_grammar(grammar.clone());
        if let Ok(id) = resolver.resolve(input) {
            assert!(grammar.matches(id.as_str()));
            assert_eq!(resolver.resolve(id.as_str()).ok(), Some(id));
        }
    }
});
