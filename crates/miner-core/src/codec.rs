//! Hex encoding and decoding for fingerprints and nonces.

use alloc::string::String;

use crate::error::EncodingFault;

/// Lowercase hex digits, indexed by nibble value.
pub(crate) const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Decode exactly `out.len()` bytes from the front of `hex`.
///
/// The input must be non-empty, of even length, and at least
/// `2 * out.len()` characters long. Characters past the decoded prefix are
/// not inspected. Both cases of `a-f` are accepted.
pub fn decode_into(hex: &str, out: &mut [u8]) -> Result<(), EncodingFault> {
    let src = hex.as_bytes();
    if src.is_empty() {
        return Err(EncodingFault::Empty);
    }
    if src.len() % 2 != 0 {
        return Err(EncodingFault::OddLength(src.len()));
    }

    let needed = out.len() * 2;
    if src.len() < needed {
        return Err(EncodingFault::WrongLength {
            expected: needed,
            actual: src.len(),
        });
    }

    hex::decode_to_slice(&src[..needed], out).map_err(|err| match err {
        hex::FromHexError::InvalidHexCharacter { c, index } => {
            EncodingFault::InvalidCharacter { c, index }
        }
        _ => EncodingFault::WrongLength {
            expected: needed,
            actual: src.len(),
        },
    })
}

/// Reject anything but `[0-9a-f]`.
///
/// Fingerprints and nonces are hashed as text, so an uppercase digit
/// would change the digest without changing the decoded bytes.
pub fn ensure_lowercase(hex: &str) -> Result<(), EncodingFault> {
    match hex
        .char_indices()
        .find(|&(_, c)| !matches!(c, '0'..='9' | 'a'..='f'))
    {
        Some((index, c)) => Err(EncodingFault::InvalidCharacter { c, index }),
        None => Ok(()),
    }
}

/// Decode the first `N` bytes of `hex` into an array.
pub fn decode_array<const N: usize>(hex: &str) -> Result<[u8; N], EncodingFault> {
    let mut out = [0u8; N];
    decode_into(hex, &mut out)?;
    Ok(out)
}

/// Decode a string that must be exactly `2 * N` characters long.
pub fn decode_exact<const N: usize>(hex: &str) -> Result<[u8; N], EncodingFault> {
    if hex.len() != N * 2 {
        return Err(EncodingFault::WrongLength {
            expected: N * 2,
            actual: hex.len(),
        });
    }
    decode_array(hex)
}

/// Lowercase hex encoding.
pub fn encode(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Write lowercase hex for `bytes` into `out` without allocating.
///
/// Writes as many whole bytes as fit and returns the number of characters
/// written.
#[inline]
pub fn encode_into(bytes: &[u8], out: &mut [u8]) -> usize {
    let mut written = 0;
    for (byte, pair) in bytes.iter().zip(out.chunks_exact_mut(2)) {
        pair[0] = HEX_DIGITS[(byte >> 4) as usize];
        pair[1] = HEX_DIGITS[(byte & 0x0F) as usize];
        written += 2;
    }
    written
}
