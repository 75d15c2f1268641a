//! Decoding of token-metadata accounts.
//!
//! Layout (Borsh, little-endian):
//!
//! ```text
//! key: u8 (= 4, MetadataV1)
//! update_authority: [u8; 32]
//! mint: [u8; 32]
//! name: u32 len + bytes      (NUL padded to 32)
//! symbol: u32 len + bytes    (NUL padded to 10)
//! uri: u32 len + bytes       (NUL padded to 200)
//! seller_fee_basis_points: u16
//! creators: Option<Vec<{ address: [u8; 32], verified: bool, share: u8 }>>
//! primary_sale_happened: bool
//! is_mutable: bool
//! ```
//!
//! Trailing fields added by later program versions are ignored.

use thiserror::Error;

pub const METADATA_V1_KEY: u8 = 4;
pub const MAX_NAME_LEN: usize = 32;
pub const MAX_SYMBOL_LEN: usize = 10;
pub const MAX_URI_LEN: usize = 200;
const CREATOR_LEN: usize = 34;
const MAX_CREATORS: u32 = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenMetadataError {
    #[error("account data truncated at offset {0}")]
    Truncated(usize),

    #[error("unexpected account key {0}, expected MetadataV1")]
    UnexpectedKey(u8),

    #[error("{field} is not valid UTF-8")]
    InvalidUtf8 { field: &'static str },

    #[error("{field} length {len} exceeds limit")]
    FieldTooLong { field: &'static str, len: usize },

    #[error("invalid {field} flag {value}")]
    InvalidFlag { field: &'static str, value: u8 },
}

/// A decoded token-metadata account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenMetadata {
    pub update_authority: [u8; 32],
    pub mint: [u8; 32],
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub seller_fee_basis_points: u16,
    pub creators: Vec<[u8; 32]>,
    pub primary_sale_happened: bool,
    pub is_mutable: bool,
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], TokenMetadataError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or(TokenMetadataError::Truncated(self.pos))?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, TokenMetadataError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, TokenMetadataError> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32, TokenMetadataError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn key(&mut self) -> Result<[u8; 32], TokenMetadataError> {
        let mut out = [0u8; 32];
        out.copy_from_slice(self.take(32)?);
        Ok(out)
    }

    fn bool(&mut self, field: &'static str) -> Result<bool, TokenMetadataError> {
        match self.u8()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(TokenMetadataError::InvalidFlag { field, value }),
        }
    }

    /// Length-prefixed string with its NUL padding stripped.
    fn string(&mut self, field: &'static str, limit: usize) -> Result<String, TokenMetadataError> {
        let len = self.u32()? as usize;
        // On-chain padding can exceed the logical limit by a little; anything
        // wildly larger is not a metadata account.
        if len > limit * 4 {
            return Err(TokenMetadataError::FieldTooLong { field, len });
        }
        let raw = self.take(len)?;
        let s = std::str::from_utf8(raw).map_err(|_| TokenMetadataError::InvalidUtf8 { field })?;
        Ok(s.trim_end_matches('\0').to_string())
    }
}

impl TokenMetadata {
    /// Decode raw account data.
    pub fn decode(data: &[u8]) -> Result<Self, TokenMetadataError> {
        let mut r = Reader { data, pos: 0 };

        let key = r.u8()?;
        if key != METADATA_V1_KEY {
            return Err(TokenMetadataError::UnexpectedKey(key));
        }
        let update_authority = r.key()?;
        let mint = r.key()?;
        let name = r.string("name", MAX_NAME_LEN)?;
        let symbol = r.string("symbol", MAX_SYMBOL_LEN)?;
        let uri = r.string("uri", MAX_URI_LEN)?;
        let seller_fee_basis_points = r.u16()?;

        let mut creators = Vec::new();
        if r.bool("creators")? {
            let count = r.u32()?;
            if count > MAX_CREATORS {
                return Err(TokenMetadataError::FieldTooLong {
                    field: "creators",
                    len: count as usize,
                });
            }
            for _ in 0..count {
                let entry = r.take(CREATOR_LEN)?;
                let mut address = [0u8; 32];
                address.copy_from_slice(&entry[..32]);
                creators.push(address);
            }
        }

        let primary_sale_happened = r.bool("primary_sale_happened")?;
        let is_mutable = r.bool("is_mutable")?;

        Ok(Self {
            update_authority,
            mint,
            name,
            symbol,
            uri,
            seller_fee_basis_points,
            creators,
            primary_sale_happened,
            is_mutable,
        })
    }

    /// Encode in the on-chain layout, padding strings the way the program
    /// does. Used to build fixture accounts.
    pub fn encode(&self) -> Vec<u8> {
        fn put_padded(out: &mut Vec<u8>, s: &str, width: usize) {
            let mut bytes = s.as_bytes().to_vec();
            if bytes.len() < width {
                bytes.resize(width, 0);
            }
            out.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
            out.extend_from_slice(&bytes);
        }

        let mut out = Vec::with_capacity(1 + 64 + 4 * 3 + 242 + 2 + 1 + 2);
        out.push(METADATA_V1_KEY);
        out.extend_from_slice(&self.update_authority);
        out.extend_from_slice(&self.mint);
        put_padded(&mut out, &self.name, MAX_NAME_LEN);
        put_padded(&mut out, &self.symbol, MAX_SYMBOL_LEN);
        put_padded(&mut out, &self.uri, MAX_URI_LEN);
        out.extend_from_slice(&self.seller_fee_basis_points.to_le_bytes());
        if self.creators.is_empty() {
            out.push(0);
        } else {
            out.push(1);
            out.extend_from_slice(&(self.creators.len() as u32).to_le_bytes());
            for creator in &self.creators {
                out.extend_from_slice(creator);
                out.push(1); // verified
                out.push((100 / self.creators.len()) as u8);
            }
        }
        out.push(self.primary_sale_happened as u8);
        out.push(self.is_mutable as u8);
        out
    }
}
