//! The fixed 144-character buffer that gets hashed every attempt.
//!
//! Layout: `address (56) | nonce (32) | block hash (56)`, all ASCII hex.
//! Only the nonce field changes between attempts.

use core::fmt;

use crate::codec::{decode_exact, encode_into, ensure_lowercase};
use crate::error::{EncodingFault, MinerError};
use crate::hash::{sha224, DIGEST_LEN};
use crate::nonce::{Nonce, NONCE_HEX_LEN};

/// Length of a hex fingerprint.
pub const FINGERPRINT_HEX_LEN: usize = DIGEST_LEN * 2;

/// Total length of the hashed input.
pub const MINING_INPUT_LEN: usize = FINGERPRINT_HEX_LEN + NONCE_HEX_LEN + FINGERPRINT_HEX_LEN;

const NONCE_OFFSET: usize = FINGERPRINT_HEX_LEN;
const BLOCK_OFFSET: usize = NONCE_OFFSET + NONCE_HEX_LEN;

/// Decode a 56-character lowercase fingerprint, naming `field` in any error.
pub fn parse_fingerprint(field: &'static str, hex: &str) -> Result<[u8; DIGEST_LEN], MinerError> {
    let bytes = decode_exact::<DIGEST_LEN>(hex).map_err(|fault| MinerError::encoding(field, fault))?;
    ensure_lowercase(hex).map_err(|fault| MinerError::encoding(field, fault))?;
    Ok(bytes)
}

/// A nonce rendered as 32 hex characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NonceHex([u8; NONCE_HEX_LEN]);

impl NonceHex {
    /// Validate a nonce string received from elsewhere. Must be lowercase.
    pub fn parse(hex: &str) -> Result<Self, MinerError> {
        if hex.len() != NONCE_HEX_LEN {
            return Err(MinerError::encoding(
                "nonce",
                EncodingFault::WrongLength {
                    expected: NONCE_HEX_LEN,
                    actual: hex.len(),
                },
            ));
        }
        ensure_lowercase(hex).map_err(|fault| MinerError::encoding("nonce", fault))?;
        let mut buf = [0u8; NONCE_HEX_LEN];
        buf.copy_from_slice(hex.as_bytes());
        Ok(NonceHex(buf))
    }

    /// The 32 ASCII hex bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The nonce as a string slice.
    pub fn as_str(&self) -> &str {
        // Constructed only from ASCII hex.
        core::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for NonceHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for NonceHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NonceHex").field(&self.as_str()).finish()
    }
}

/// The mining input buffer.
#[derive(Clone)]
pub struct MiningInput {
    buf: [u8; MINING_INPUT_LEN],
}

impl MiningInput {
    /// Lay out the fixed fields. The nonce field starts as all `'0'`.
    ///
    /// The address is validated as a lowercase fingerprint and copied as is;
    /// the block hash is rendered from raw bytes.
    pub fn new(address_hex: &str, block_hash: &[u8; DIGEST_LEN]) -> Result<Self, MinerError> {
        parse_fingerprint("address", address_hex)?;

        let mut buf = [b'0'; MINING_INPUT_LEN];
        buf[..NONCE_OFFSET].copy_from_slice(address_hex.as_bytes());
        encode_into(block_hash, &mut buf[BLOCK_OFFSET..]);
        Ok(MiningInput { buf })
    }

    /// Render `nonce` into the nonce field.
    #[inline]
    pub fn set_nonce(&mut self, nonce: &Nonce) {
        encode_into(nonce, &mut self.buf[NONCE_OFFSET..BLOCK_OFFSET]);
    }

    /// Copy an already-rendered nonce into the nonce field.
    pub fn set_nonce_hex(&mut self, nonce: &NonceHex) {
        self.buf[NONCE_OFFSET..BLOCK_OFFSET].copy_from_slice(nonce.as_bytes());
    }

    /// The current nonce field.
    pub fn nonce_hex(&self) -> NonceHex {
        let mut out = [0u8; NONCE_HEX_LEN];
        out.copy_from_slice(&self.buf[NONCE_OFFSET..BLOCK_OFFSET]);
        NonceHex(out)
    }

    /// SHA-224 of the whole buffer.
    #[inline]
    pub fn digest(&self) -> [u8; DIGEST_LEN] {
        sha224(&self.buf)
    }

    /// The full 144-byte buffer as hashed.
    pub fn as_bytes(&self) -> &[u8; MINING_INPUT_LEN] {
        &self.buf
    }
}

impl fmt::Debug for MiningInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = core::str::from_utf8(&self.buf).unwrap_or_default();
        f.debug_tuple("MiningInput").field(&text).finish()
    }
}
