use proptest::prelude::*;

use certum_ledger::TokenMetadata;

proptest! {
    #[test]
    fn decode_never_panics_on_arbitrary_bytes(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = TokenMetadata::decode(&data);
    }

    #[test]
    fn encoded_records_decode_to_the_same_fields(
        name in "[A-Za-z0-9 ]{1,32}",
        symbol in "[A-Z]{1,10}",
        uri in "ipfs://Qm[A-Za-z0-9]{10,60}",
        mutable in any::<bool>(),
    ) {
        let meta = TokenMetadata {
            update_authority: [1; 32],
            mint: [2; 32],
            name,
            symbol,
            uri,
            seller_fee_basis_points: 0,
            creators: Vec::new(),
            primary_sale_happened: false,
            is_mutable: mutable,
        };
        let decoded = TokenMetadata::decode(&meta.encode()).unwrap();
        prop_assert_eq!(decoded.mint, meta.mint);
        prop_assert_eq!(decoded.uri, meta.uri);
        prop_assert_eq!(decoded.is_mutable, mutable);
    }
}
