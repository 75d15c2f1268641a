//! Base58 encoding with the Bitcoin/Solana alphabet.
//!
//! Alphabet: `123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz`
//! (no `0`, `O`, `I` or `l`). Leading zero bytes map to leading `1`s.

/// Base58 alphabet (58 chars, avoids visually ambiguous 0/O and I/l).
pub const BASE58_ALPHABET: &[u8; 58] =
    b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Reverse lookup table: ASCII byte → digit value (0xFF = invalid).
const BASE58_DECODE: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let alpha = BASE58_ALPHABET;
    let mut i = 0;
    while i < 58 {
        table[alpha[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Encode bytes as a base58 string.
pub fn encode_base58(bytes: &[u8]) -> String {
    let zeros = bytes.iter().take_while(|&&b| b == 0).count();

    // Little-endian base58 digits of the big-endian input number.
    let mut digits: Vec<u8> = Vec::with_capacity(bytes.len() * 138 / 100 + 1);
    for &byte in &bytes[zeros..] {
        let mut carry = byte as u32;
        for digit in digits.iter_mut() {
            carry += (*digit as u32) << 8;
            *digit = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    let mut result = String::with_capacity(zeros + digits.len());
    result.extend(std::iter::repeat('1').take(zeros));
    result.extend(digits.iter().rev().map(|&d| BASE58_ALPHABET[d as usize] as char));
    result
}

/// Decode a base58 string. Returns `None` on characters outside the alphabet.
pub fn decode_base58(s: &str) -> Option<Vec<u8>> {
    let zeros = s.bytes().take_while(|&c| c == b'1').count();

    let mut bytes: Vec<u8> = Vec::with_capacity(s.len());
    for c in s.bytes().skip(zeros) {
        if c >= 128 {
            return None;
        }
        let val = BASE58_DECODE[c as usize];
        if val == 0xFF {
            return None;
        }
        let mut carry = val as u32;
        for byte in bytes.iter_mut() {
            carry += (*byte as u32) * 58;
            *byte = (carry & 0xFF) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            bytes.push((carry & 0xFF) as u8);
            carry >>= 8;
        }
    }

    let mut result = vec![0u8; zeros];
    result.extend(bytes.iter().rev());
    Some(result)
}

/// Decode into a fixed-size array; `None` on bad characters or wrong length.
pub fn decode_base58_fixed<const N: usize>(s: &str) -> Option<[u8; N]> {
    decode_base58(s)?.try_into().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vectors() {
        assert_eq!(encode_base58(b""), "");
        assert_eq!(encode_base58(&[0]), "1");
        assert_eq!(encode_base58(&[0, 0, 1]), "112");
        assert_eq!(encode_base58(b"hello world"), "StV1DL6CwTryKyV");
    }

    #[test]
    fn system_program_is_all_ones() {
        assert_eq!(encode_base58(&[0u8; 32]), "1".repeat(32));
        assert_eq!(decode_base58_fixed::<32>(&"1".repeat(32)), Some([0u8; 32]));
    }

    #[test]
    fn decode_rejects_ambiguous_chars() {
        assert!(decode_base58("0abc").is_none());
        assert!(decode_base58("Oabc").is_none());
        assert!(decode_base58("Iabc").is_none());
        assert!(decode_base58("labc").is_none());
        assert!(decode_base58("ab c").is_none());
    }

    #[test]
    fn decode_inverts_encode() {
        let data = [7u8, 0, 255, 19, 42, 0, 0, 3];
        assert_eq!(decode_base58(&encode_base58(&data)).unwrap(), data);
    }

    #[test]
    fn fixed_decode_checks_length() {
        let encoded = encode_base58(&[9u8; 31]);
        assert!(decode_base58_fixed::<32>(&encoded).is_none());
        assert!(decode_base58_fixed::<31>(&encoded).is_some());
    }
}
