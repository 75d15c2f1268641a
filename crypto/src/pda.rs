//! Program-derived addresses.
//!
//! A program-derived address is `SHA-256(seeds ‖ bump ‖ program_id ‖
//! "ProgramDerivedAddress")` for the highest `bump` in `255..=0` whose
//! digest is *not* a valid Ed25519 point, so no private key can exist for
//! it. Certificate token records live at the token-metadata PDA of the
//! mint: seeds `["metadata", METADATA_PROGRAM_ID, mint]`.

use ed25519_dalek::VerifyingKey;
use thiserror::Error;

use crate::hash::sha256;

/// `metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s`, the token-metadata program.
pub const METADATA_PROGRAM_ID: [u8; 32] = [
    0x0b, 0x70, 0x65, 0xb1, 0xe3, 0xd1, 0x7c, 0x45, 0x38, 0x9d, 0x52, 0x7f, 0x6b, 0x04, 0xc3,
    0xcd, 0x58, 0xb8, 0x6c, 0x73, 0x1a, 0xa0, 0xfd, 0xb5, 0x49, 0xb6, 0xd1, 0xbc, 0x03, 0xf8,
    0x29, 0x46,
];

const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";
const MAX_SEED_LEN: usize = 32;
const MAX_SEEDS: usize = 16;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PdaError {
    #[error("seed longer than {MAX_SEED_LEN} bytes")]
    SeedTooLong,
    #[error("more than {MAX_SEEDS} seeds")]
    TooManySeeds,
    #[error("no viable bump seed found")]
    NoViableBump,
}

/// Whether `bytes` decompress to a point on the Ed25519 curve.
pub fn is_on_curve(bytes: &[u8; 32]) -> bool {
    VerifyingKey::from_bytes(bytes).is_ok()
}

/// Find the canonical program-derived address and its bump seed.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &[u8; 32],
) -> Result<([u8; 32], u8), PdaError> {
    if seeds.len() >= MAX_SEEDS {
        return Err(PdaError::TooManySeeds);
    }
    if seeds.iter().any(|s| s.len() > MAX_SEED_LEN) {
        return Err(PdaError::SeedTooLong);
    }

    for bump in (0..=u8::MAX).rev() {
        let bump_seed = [bump];
        let mut parts: Vec<&[u8]> = Vec::with_capacity(seeds.len() + 3);
        parts.extend_from_slice(seeds);
        parts.push(&bump_seed);
        parts.push(program_id);
        parts.push(PDA_MARKER);

        let candidate = sha256(&parts);
        if !is_on_curve(&candidate) {
            return Ok((candidate, bump));
        }
    }
    Err(PdaError::NoViableBump)
}

/// The token-metadata account address for `mint`.
pub fn metadata_account(mint: &[u8; 32]) -> Result<[u8; 32], PdaError> {
    find_program_address(
        &[b"metadata", &METADATA_PROGRAM_ID, mint],
        &METADATA_PROGRAM_ID,
    )
    .map(|(address, _)| address)
}
