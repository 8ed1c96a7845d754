//! Checking a submitted nonce without searching.

use crate::error::{ArgumentFault, MinerError};
use crate::hash::DIGEST_LEN;
use crate::hexbin::HexBin;
use crate::input::{parse_fingerprint, MiningInput, NonceHex};
use crate::search::{general_scan, MAX_DIFFICULTY};

/// Recompute the digest a miner hashed for `nonce_hex`.
pub fn mining_digest(
    address_hex: &str,
    nonce_hex: &str,
    block_hash_hex: &str,
) -> Result<[u8; DIGEST_LEN], MinerError> {
    let block_hash = parse_fingerprint("block hash", block_hash_hex)?;
    digest_for(address_hex, nonce_hex, &block_hash)
}

fn digest_for(
    address_hex: &str,
    nonce_hex: &str,
    block_hash: &[u8; DIGEST_LEN],
) -> Result<[u8; DIGEST_LEN], MinerError> {
    let nonce = NonceHex::parse(nonce_hex)?;
    let mut input = MiningInput::new(address_hex, block_hash)?;
    input.set_nonce_hex(&nonce);
    Ok(input.digest())
}

/// The highest difficulty `nonce_hex` satisfies, capped at [`MAX_DIFFICULTY`].
///
/// That is the length of the longest prefix of the block hash's expansion
/// found anywhere in the digest's expansion.
pub fn achieved_difficulty(
    address_hex: &str,
    nonce_hex: &str,
    block_hash_hex: &str,
) -> Result<usize, MinerError> {
    let block_hash = parse_fingerprint("block hash", block_hash_hex)?;
    let digest = digest_for(address_hex, nonce_hex, &block_hash)?;

    let target = HexBin::from_digest(&block_hash);
    let haystack = HexBin::from_digest(&digest);
    let found = |k: usize| general_scan(haystack.as_bytes(), &target.as_bytes()[..k]).is_some();

    // Every prefix of a found prefix is also found, so bisect on length.
    let (mut lo, mut hi) = (0, MAX_DIFFICULTY);
    while lo < hi {
        let mid = (lo + hi + 1) / 2;
        if found(mid) {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    Ok(lo)
}

/// Whether `nonce_hex` meets `difficulty`.
pub fn verify(
    address_hex: &str,
    nonce_hex: &str,
    block_hash_hex: &str,
    difficulty: usize,
) -> Result<bool, MinerError> {
    if difficulty > MAX_DIFFICULTY {
        return Err(ArgumentFault::DifficultyOutOfRange {
            difficulty,
            max: MAX_DIFFICULTY,
        }
        .into());
    }
    Ok(achieved_difficulty(address_hex, nonce_hex, block_hash_hex)? >= difficulty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use crate::hash::sha224;

    const ADDRESS: &str = "1f2e3d4c5b6a79881f2e3d4c5b6a79881f2e3d4c5b6a79881f2e3d4c";
    const BLOCK: &str = "00000000000000000000000000000000000000000000000000000000";
    const NONCE: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_digest_is_sha224_of_concatenation() {
        let mut text = alloc::string::String::new();
        text.push_str(ADDRESS);
        text.push_str(NONCE);
        text.push_str(BLOCK);
        assert_eq!(
            mining_digest(ADDRESS, NONCE, BLOCK).unwrap(),
            sha224(text.as_bytes())
        );
    }

    #[test]
    fn test_uppercase_block_hash_is_rejected() {
        let upper = "ABCDEF0123456789ABCDEF0123456789ABCDEF0123456789ABCDEF01";
        let lower = "abcdef0123456789abcdef0123456789abcdef0123456789abcdef01";
        assert!(mining_digest(ADDRESS, NONCE, lower).is_ok());
        assert!(matches!(
            mining_digest(ADDRESS, NONCE, upper),
            Err(MinerError::InvalidEncoding {
                field: "block hash",
                fault: crate::error::EncodingFault::InvalidCharacter { c: 'A', index: 0 }
            })
        ));
        assert!(matches!(
            verify(ADDRESS, NONCE, upper, 0),
            Err(MinerError::InvalidEncoding { field: "block hash", .. })
        ));
    }

    #[test]
    fn test_achieved_difficulty_matches_definition() {
        let level = achieved_difficulty(ADDRESS, NONCE, BLOCK).unwrap();
        let digest = mining_digest(ADDRESS, NONCE, BLOCK).unwrap();
        let haystack = crate::hexbin::expand(&digest);
        let target = crate::hexbin::expand(&codec::decode_exact::<DIGEST_LEN>(BLOCK).unwrap());

        assert!(haystack.contains(&target[..level]));
        assert!(verify(ADDRESS, NONCE, BLOCK, level).unwrap());
        if level < MAX_DIFFICULTY {
            assert!(!haystack.contains(&target[..level + 1]));
            assert!(!verify(ADDRESS, NONCE, BLOCK, level + 1).unwrap());
        }
    }

    #[test]
    fn test_verify_rejects_bad_input() {
        assert!(matches!(
            verify(ADDRESS, "xyz", BLOCK, 1),
            Err(MinerError::InvalidEncoding { field: "nonce", .. })
        ));
        assert!(matches!(
            verify(ADDRESS, NONCE, BLOCK, MAX_DIFFICULTY + 1),
            Err(MinerError::InvalidArgument(_))
        ));
    }
}
