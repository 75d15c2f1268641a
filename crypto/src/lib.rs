//! Cryptographic primitives for certum.
//!
//! - **Base58** encoding for ledger identifiers and signatures
//! - **Ed25519** key pairs and signing (used by test signers and mint keys)
//! - **Blake2b** for content digests and issuance idempotency keys
//! - **SHA-256** program-derived address derivation for token-metadata accounts
//! - Ledger identifier grammar validation

pub mod base58;
pub mod hash;
pub mod identifier;
pub mod idempotency;
pub mod keys;
pub mod pda;
pub mod sign;

pub use base58::{decode_base58, encode_base58};
pub use hash::{blake2b_256, blake2b_256_multi, sha256};
pub use identifier::{ledger_id_from_public_key, Alphabet, IdentifierGrammar};
pub use idempotency::IdempotencyKey;
pub use keys::{generate_keypair, keypair_from_seed, KeyPair, PrivateKey, PublicKey, Signature};
pub use pda::{find_program_address, is_on_curve, metadata_account, PdaError, METADATA_PROGRAM_ID};
pub use sign::{sign_message, verify_signature};
