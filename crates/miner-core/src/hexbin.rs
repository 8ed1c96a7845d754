//! Expanded-binary ("hexbin") encoding.
//!
//! Each byte is first written as two lowercase hex characters, and each of
//! those characters' ASCII codes is then written in binary as `'0'`/`'1'`
//! characters with the leading zero bits stripped. This is not a bit
//! expansion of the byte itself: `0x0a` becomes `"110000"` (for `'0'`,
//! 0x30) followed by `"1100001"` (for `'a'`, 0x61).
//!
//! Digits `0`-`9` expand to 6 characters and `a`-`f` to 7, so the encoded
//! length depends on the data. A 28-byte digest expands to 336..=392
//! characters; [`HEXBIN_CAPACITY`] allows 16 per byte.

use alloc::string::String;
use core::fmt;

use crate::codec::HEX_DIGITS;
use crate::hash::DIGEST_LEN;

/// Upper bound on the expansion of one byte.
pub const MAX_EXPANSION_PER_BYTE: usize = 16;

/// Buffer capacity for the expansion of a digest.
pub const HEXBIN_CAPACITY: usize = DIGEST_LEN * MAX_EXPANSION_PER_BYTE;

#[derive(Clone, Copy)]
struct Expansion {
    bits: [u8; 8],
    len: usize,
}

const fn expand_const(c: u8) -> Expansion {
    let mut bits = [0u8; 8];
    let width = 8 - c.leading_zeros() as usize;
    let mut i = 0;
    while i < width {
        bits[i] = b'0' + ((c >> (width - 1 - i)) & 1);
        i += 1;
    }
    Expansion { bits, len: width }
}

const fn nibble_table() -> [Expansion; 16] {
    let mut table = [Expansion { bits: [0; 8], len: 0 }; 16];
    let mut n = 0;
    while n < 16 {
        table[n] = expand_const(HEX_DIGITS[n]);
        n += 1;
    }
    table
}

/// Expansion of each nibble's hex character, indexed by nibble value.
static NIBBLES: [Expansion; 16] = nibble_table();

/// Write the binary form of `c` with leading zeros stripped.
///
/// Returns the number of characters written; zero for `c == 0`.
pub fn expand_char(c: u8, out: &mut [u8; 8]) -> usize {
    let expansion = expand_const(c);
    out[..expansion.len].copy_from_slice(&expansion.bits[..expansion.len]);
    expansion.len
}

/// Fixed-capacity buffer holding the expansion of one digest.
#[derive(Clone)]
pub struct HexBin {
    buf: [u8; HEXBIN_CAPACITY],
    len: usize,
}

impl HexBin {
    /// An empty buffer.
    pub const fn new() -> Self {
        HexBin {
            buf: [0u8; HEXBIN_CAPACITY],
            len: 0,
        }
    }

    /// Expand `digest`, replacing the previous contents.
    #[inline]
    pub fn encode(&mut self, digest: &[u8; DIGEST_LEN]) {
        let mut pos = 0;
        for byte in digest {
            for nibble in [byte >> 4, byte & 0x0F] {
                let e = &NIBBLES[nibble as usize];
                self.buf[pos..pos + e.len].copy_from_slice(&e.bits[..e.len]);
                pos += e.len;
            }
        }
        self.len = pos;
    }

    /// Build a buffer holding the expansion of `digest`.
    pub fn from_digest(digest: &[u8; DIGEST_LEN]) -> Self {
        let mut hexbin = Self::new();
        hexbin.encode(digest);
        hexbin
    }

    /// The encoded characters.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// The encoded characters as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ever holds b'0' and b'1'.
        core::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }

    /// Number of encoded characters.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been encoded.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for HexBin {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HexBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HexBin").field(&self.as_str()).finish()
    }
}

/// Expand an arbitrary byte string.
pub fn expand(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * MAX_EXPANSION_PER_BYTE);
    for byte in bytes {
        for nibble in [byte >> 4, byte & 0x0F] {
            let e = &NIBBLES[nibble as usize];
            for &bit in &e.bits[..e.len] {
                out.push(bit as char);
            }
        }
    }
    out
}
