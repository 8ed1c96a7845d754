//! SHA-224 mining digest and the MD5 mixing function used for nonces.

use md5::Md5;
use sha2::{Digest, Sha224};

/// Length of a SHA-224 digest; fingerprints are digests of this size.
pub const DIGEST_LEN: usize = 28;

/// Length of the 128-bit mixing function's output; nonces are this size.
pub const MIX_LEN: usize = 16;

/// SHA-224 of `data`. This is the proof-of-work hash.
#[inline]
pub fn sha224(data: &[u8]) -> [u8; DIGEST_LEN] {
    let hash = Sha224::digest(data);
    let mut result = [0u8; DIGEST_LEN];
    result.copy_from_slice(&hash);
    result
}

/// MD5 over the concatenation of `parts`.
///
/// Only used to derive and advance nonces, never as a security boundary.
pub fn mix128(parts: &[&[u8]]) -> [u8; MIX_LEN] {
    let mut hasher = Md5::new();
    for part in parts {
        hasher.update(part);
    }
    let mut result = [0u8; MIX_LEN];
    result.copy_from_slice(&hasher.finalize());
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha224_known_vector() {
        let expected =
            hex::decode("23097d223405d8228642a477bda255b32aadbce4bda0b3f7e36c9da7").unwrap();
        assert_eq!(sha224(b"abc").as_slice(), expected.as_slice());
    }

    #[test]
    fn test_mix128_known_vector() {
        let expected = hex::decode("d41d8cd98f00b204e9800998ecf8427e").unwrap();
        assert_eq!(mix128(&[]).as_slice(), expected.as_slice());
    }

    #[test]
    fn test_mix128_concatenates_parts() {
        assert_eq!(mix128(&[&b"ab"[..], &b"c"[..]]), mix128(&[&b"abc"[..]]));
        // MD5("abc")
        let expected = hex::decode("900150983cd24fb0d6963f7d28e17f72").unwrap();
        assert_eq!(mix128(&[&b"a"[..], &b""[..], &b"bc"[..]]).as_slice(), expected.as_slice());
    }
}
